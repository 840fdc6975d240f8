//! Connected-group detection
//!
//! Groups are found with an explicit work stack, so traversal depth never
//! depends on board size. Seeds are scanned in row-major order, which makes
//! the output order deterministic.

use crate::color::Color;
use crate::grid::Grid;

/// A connected set of same-colored cells at or above the clear threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub color: Color,
    /// Flat cell indices, ascending
    pub cells: Vec<usize>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// (row, col) coordinates of the group's cells
    pub fn positions(&self, grid: &Grid) -> Vec<(usize, usize)> {
        self.cells.iter().map(|&idx| grid.position(idx)).collect()
    }
}

/// Find every same-color group of at least `threshold` cells
pub fn find_matches(grid: &Grid, threshold: usize) -> Vec<MatchGroup> {
    assert!(threshold > 0, "match threshold must be positive");

    let mut visited = vec![false; grid.len()];
    let mut stack = Vec::new();
    let mut groups = Vec::new();

    for seed in 0..grid.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        // Empty and garbage cells never seed a group
        let Some(color) = grid.cell_at(seed).color() else {
            continue;
        };

        let mut members = Vec::new();
        stack.push(seed);
        while let Some(idx) = stack.pop() {
            members.push(idx);
            for next in grid.neighbors(idx) {
                if !visited[next] && grid.cell_at(next).color() == Some(color) {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        if members.len() >= threshold {
            members.sort_unstable();
            groups.push(MatchGroup {
                color,
                cells: members,
            });
        }
    }

    groups
}
