//! The falling pair and its movement rules
//!
//! Every controller operation is a pure function of `(grid, piece)`. A move
//! that would collide returns the piece unchanged; a rotation that cannot
//! find room returns `None`.

use crate::color::Color;
use crate::grid::Grid;
use crate::kick::wall_kicks;
use serde::{Deserialize, Serialize};

/// Row of the pivot when a piece spawns; the satellite sits above it on row 0
pub const SPAWN_ROW: i32 = 1;

/// The two arrangements a pair can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layout {
    /// Satellite directly above the pivot
    #[default]
    Vertical,
    /// Satellite directly right of the pivot
    Horizontal,
}

impl Layout {
    /// The other layout
    pub fn toggled(&self) -> Layout {
        match self {
            Layout::Vertical => Layout::Horizontal,
            Layout::Horizontal => Layout::Vertical,
        }
    }

    /// Rotation index: 0 for vertical, 1 for horizontal
    pub fn index(&self) -> u8 {
        match self {
            Layout::Vertical => 0,
            Layout::Horizontal => 1,
        }
    }

    /// (row, col) offsets of pivot and satellite relative to the anchor
    pub fn offsets(&self) -> [(i32, i32); 2] {
        match self {
            Layout::Vertical => [(0, 0), (-1, 0)],
            Layout::Horizontal => [(0, 0), (0, 1)],
        }
    }
}

/// An active falling pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Pivot color first, satellite second
    pub colors: [Color; 2],
    pub layout: Layout,
    /// Pivot position
    pub row: i32,
    pub col: i32,
}

impl Piece {
    pub fn new(colors: [Color; 2], layout: Layout, row: i32, col: i32) -> Self {
        Self {
            colors,
            layout,
            row,
            col,
        }
    }

    /// A vertical pair at the spawn position of `grid`
    pub fn spawn(colors: [Color; 2], grid: &Grid) -> Self {
        Self::new(colors, Layout::Vertical, SPAWN_ROW, grid.spawn_col() as i32)
    }

    /// Absolute (row, col) of pivot and satellite
    pub fn positions(&self) -> [(i32, i32); 2] {
        self.layout
            .offsets()
            .map(|(dr, dc)| (self.row + dr, self.col + dc))
    }

    /// Absolute (row, col, color) of pivot and satellite
    pub fn cells(&self) -> [(i32, i32, Color); 2] {
        let [(r0, c0), (r1, c1)] = self.positions();
        [(r0, c0, self.colors[0]), (r1, c1, self.colors[1])]
    }

    fn shifted(&self, d_row: i32, d_col: i32) -> Piece {
        Piece {
            row: self.row + d_row,
            col: self.col + d_col,
            ..*self
        }
    }
}

fn try_shift(grid: &Grid, piece: Piece, d_row: i32, d_col: i32) -> Piece {
    let moved = piece.shifted(d_row, d_col);
    if grid.can_place(&moved) { moved } else { piece }
}

/// Shift one column left, or stay put when blocked
pub fn move_left(grid: &Grid, piece: Piece) -> Piece {
    try_shift(grid, piece, 0, -1)
}

/// Shift one column right, or stay put when blocked
pub fn move_right(grid: &Grid, piece: Piece) -> Piece {
    try_shift(grid, piece, 0, 1)
}

/// Shift one row down, or stay put when blocked
pub fn move_down(grid: &Grid, piece: Piece) -> Piece {
    try_shift(grid, piece, 1, 0)
}

/// Toggle the layout, trying the wall kicks in order
pub fn rotate(grid: &Grid, piece: Piece) -> Option<Piece> {
    let rotated = Piece {
        layout: piece.layout.toggled(),
        ..piece
    };

    wall_kicks(piece.layout)
        .iter()
        .map(|&kick| rotated.shifted(0, kick))
        .find(|candidate| grid.can_place(candidate))
}

/// Whether the piece is resting on something
pub fn is_grounded(grid: &Grid, piece: Piece) -> bool {
    move_down(grid, piece) == piece
}

/// Move down as far as possible and return the landing pose and distance
pub fn hard_drop(grid: &Grid, piece: Piece) -> (Piece, u32) {
    let mut current = piece;
    let mut distance = 0;
    loop {
        let next = move_down(grid, current);
        if next == current {
            return (current, distance);
        }
        current = next;
        distance += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, DEFAULT_HEIGHT};

    fn pair() -> [Color; 2] {
        [Color::Red, Color::Green]
    }

    #[test]
    fn test_spawn_position() {
        let grid = Grid::default();
        let piece = Piece::spawn(pair(), &grid);
        assert_eq!(piece.positions(), [(1, 2), (0, 2)]);
        assert!(grid.can_place(&piece));
    }

    #[test]
    fn test_move_blocked_is_noop() {
        let grid = Grid::default();
        let mut piece = Piece::spawn(pair(), &grid);
        for _ in 0..10 {
            piece = move_left(&grid, piece);
        }
        assert_eq!(piece.col, 0);
        assert_eq!(move_left(&grid, piece), piece);

        let moved = move_right(&grid, piece);
        assert_eq!(moved.col, 1);
    }

    #[test]
    fn test_move_down_and_hard_drop() {
        let grid = Grid::default();
        let piece = Piece::spawn(pair(), &grid);
        let lower = move_down(&grid, piece);
        assert_eq!(lower.row, piece.row + 1);
        assert!(!is_grounded(&grid, piece));

        let (landed, distance) = hard_drop(&grid, piece);
        assert_eq!(landed.row, DEFAULT_HEIGHT as i32 - 1);
        assert_eq!(distance, DEFAULT_HEIGHT as u32 - 2);
        assert!(is_grounded(&grid, landed));
    }

    #[test]
    fn test_hard_drop_lands_on_stack() {
        let mut grid = Grid::default();
        grid.set(11, 2, Cell::Garbage);
        grid.set(10, 2, Cell::Garbage);
        let (landed, _) = hard_drop(&grid, Piece::spawn(pair(), &grid));
        assert_eq!(landed.positions(), [(9, 2), (8, 2)]);
    }

    #[test]
    fn test_rotation_reversibility() {
        let grid = Grid::default();
        let piece = Piece::new(pair(), Layout::Vertical, 6, 2);
        let once = rotate(&grid, piece).unwrap();
        assert_eq!(once.layout, Layout::Horizontal);
        assert_eq!((once.row, once.col), (6, 2));

        let twice = rotate(&grid, once).unwrap();
        assert_eq!(twice, piece);
    }

    #[test]
    fn test_rotation_kicks_off_right_wall() {
        let grid = Grid::default();
        let piece = Piece::new(pair(), Layout::Vertical, 6, 5);
        let rotated = rotate(&grid, piece).unwrap();
        assert_eq!(rotated.layout, Layout::Horizontal);
        assert_eq!(rotated.col, 4);
        assert_eq!(rotated.positions(), [(6, 4), (6, 5)]);
    }

    #[test]
    fn test_wall_kick_is_deterministic() {
        let mut grid = Grid::default();
        // Neighbors on both sides block 0, -1, +1 and -2; only +2 fits
        grid.set(6, 3, Cell::Garbage);
        grid.set(6, 1, Cell::Garbage);
        let piece = Piece::new(pair(), Layout::Vertical, 6, 2);

        let first = rotate(&grid, piece).unwrap();
        for _ in 0..5 {
            assert_eq!(rotate(&grid, piece), Some(first));
        }
        assert_eq!(first.col, 4);
    }

    #[test]
    fn test_rotation_fails_when_boxed_in() {
        let mut grid = Grid::new(2, 4);
        grid.set(3, 1, Cell::Garbage);
        grid.set(2, 1, Cell::Garbage);
        let piece = Piece::new(pair(), Layout::Vertical, 3, 0);
        assert_eq!(rotate(&grid, piece), None);

        // Horizontal at the top row cannot become vertical: satellite would leave the grid
        let top = Piece::new(pair(), Layout::Horizontal, 0, 0);
        assert_eq!(rotate(&Grid::new(2, 4), top), None);
    }
}
