//! Column compaction

use crate::grid::Grid;

/// Return a copy of the grid with every column settled
pub fn compact(grid: &Grid) -> Grid {
    let mut settled = grid.clone();
    compact_in_place(&mut settled);
    settled
}

/// Settle every column in place, returning how many cells fell
pub fn compact_in_place(grid: &mut Grid) -> usize {
    (0..grid.width()).map(|col| grid.compact_column(col)).sum()
}
