//! Garbage injection
//!
//! Garbage is always applied by the receiving player to their own grid.
//! Each row drops one garbage cell onto every column; cells that do not fit
//! under the top of a column are lost as overflow.

use crate::grid::{Cell, Grid};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What an injection actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Injection {
    /// Rows requested
    pub rows: u32,
    /// Garbage cells written
    pub placed: usize,
    /// Garbage cells that found no room
    pub overflow: usize,
}

/// Return a copy of `grid` with `rows` rows of garbage dropped on top
pub fn inject_garbage(grid: &Grid, rows: u32) -> (Grid, Injection) {
    let mut out = grid.clone();
    let mut injection = Injection {
        rows,
        ..Default::default()
    };
    if rows == 0 {
        return (out, injection);
    }

    let height = out.height();
    for col in 0..out.width() {
        out.compact_column(col);
        let free = height - out.column_height(col);
        let fits = free.min(rows as usize);
        // Stack directly on the settled column
        for k in 0..fits {
            let row = (free - 1 - k) as i32;
            out.set(row, col as i32, Cell::Garbage);
        }
        injection.placed += fits;
        injection.overflow += rows as usize - fits;
    }

    debug!(
        rows,
        placed = injection.placed,
        overflow = injection.overflow,
        "garbage injected"
    );
    (out, injection)
}
