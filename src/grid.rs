//! Grid representation and placement predicates
//!
//! Cells are stored flat in row-major order (`row * width + col`).
//! Row 0 is the top of the board; the highest row index is the bottom.

use crate::color::Color;
use crate::config::EngineConfig;
use crate::piece::{Piece, SPAWN_ROW};
use std::fmt;

/// Reference board dimensions
pub const DEFAULT_WIDTH: usize = 6;
pub const DEFAULT_HEIGHT: usize = 12;

/// A cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Inert filler; never matches, clears only next to a clearing group
    Garbage,
    Colored(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_garbage(&self) -> bool {
        matches!(self, Cell::Garbage)
    }

    /// The matchable color of this cell, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Colored(color) => Some(*color),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Garbage => '#',
            Cell::Colored(color) => color.symbol(),
        }
    }

    pub fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Garbage),
            _ => Color::from_symbol(c).map(Cell::Colored),
        }
    }
}

/// A player's board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    spawn_col: usize,
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Grid {
    /// Create an empty grid; pieces spawn in the center-left column
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width >= 2 && height >= 2,
            "grid must be at least 2x2, got {width}x{height}"
        );
        Self {
            width,
            height,
            spawn_col: (width - 1) / 2,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Create an empty grid sized and configured by the engine config
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.width, config.height).with_spawn_col(config.spawn_col)
    }

    pub fn with_spawn_col(mut self, spawn_col: usize) -> Self {
        assert!(
            spawn_col < self.width,
            "spawn column {spawn_col} outside grid of width {}",
            self.width
        );
        self.spawn_col = spawn_col;
        self
    }

    /// Parse a grid from text rows, top row first
    ///
    /// `.` is empty, `#` is garbage, `R G B Y P` are colors.
    pub fn from_rows(rows: &[&str]) -> Result<Self, String> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width < 2 || height < 2 {
            return Err(format!("grid must be at least 2x2, got {width}x{height}"));
        }

        let mut grid = Self::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(format!(
                    "row {row} has {} cells, expected {width}",
                    line.chars().count()
                ));
            }
            for (col, c) in line.chars().enumerate() {
                let cell = Cell::from_symbol(c)
                    .ok_or_else(|| format!("unknown cell symbol {c:?} at row {row}, col {col}"))?;
                grid.cells[row * width + col] = cell;
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn spawn_col(&self) -> usize {
        self.spawn_col
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Flat index for (row, col), None if out of bounds
    #[inline]
    pub fn index(&self, row: i32, col: i32) -> Option<usize> {
        if !self.in_bounds(row, col) {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// (row, col) for a flat index
    #[inline]
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Get the cell at (row, col), None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Get the cell at a flat index
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Write a single cell
    ///
    /// Panics when (row, col) is out of bounds.
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) {
        let Some(idx) = self.index(row, col) else {
            panic!(
                "set out of bounds: ({row}, {col}) on {}x{} grid",
                self.width, self.height
            );
        };
        self.cells[idx] = cell;
    }

    /// Empty a single cell
    pub fn clear(&mut self, row: i32, col: i32) {
        self.set(row, col, Cell::Empty);
    }

    /// Empty a single cell by flat index
    pub(crate) fn clear_at(&mut self, index: usize) {
        self.cells[index] = Cell::Empty;
    }

    /// Orthogonal neighbors of a flat index (up, down, left, right)
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> {
        let (row, col) = self.position(index);
        let w = self.width;
        [
            (row > 0).then(|| index - w),
            (row + 1 < self.height).then(|| index + w),
            (col > 0).then(|| index - 1),
            (col + 1 < w).then(|| index + 1),
        ]
        .into_iter()
        .flatten()
    }

    /// Check every cell of the piece lands in bounds on an empty cell
    pub fn can_place(&self, piece: &Piece) -> bool {
        piece
            .positions()
            .iter()
            .all(|&(row, col)| matches!(self.get(row, col), Some(Cell::Empty)))
    }

    /// Return a copy of the grid with the piece written into it
    ///
    /// Callers must check `can_place` first.
    pub fn place(&self, piece: &Piece) -> Grid {
        debug_assert!(self.can_place(piece), "place called on blocked piece {piece:?}");
        let mut grid = self.clone();
        for (row, col, color) in piece.cells() {
            grid.set(row, col, Cell::Colored(color));
        }
        grid
    }

    /// Game over check: the spawn cell is occupied
    pub fn is_top_row_blocked(&self) -> bool {
        !matches!(self.get(SPAWN_ROW, self.spawn_col as i32), Some(Cell::Empty))
    }

    /// Drop every cell of one column to the bottom, keeping their order
    ///
    /// Returns how many cells moved.
    pub fn compact_column(&mut self, col: usize) -> usize {
        assert!(col < self.width, "column {col} out of bounds");
        let w = self.width;
        let mut moved = 0;
        let mut write_row = self.height;

        for read_row in (0..self.height).rev() {
            let cell = self.cells[read_row * w + col];
            if cell.is_empty() {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                self.cells[write_row * w + col] = cell;
                self.cells[read_row * w + col] = Cell::Empty;
                moved += 1;
            }
        }
        moved
    }

    /// Rows from the bottom up to the highest occupied cell of a column
    pub fn column_height(&self, col: usize) -> usize {
        (0..self.height)
            .find(|&row| !self.cells[row * self.width + col].is_empty())
            .map_or(0, |top| self.height - top)
    }

    pub fn column_heights(&self) -> Vec<usize> {
        (0..self.width).map(|col| self.column_height(col)).collect()
    }

    /// Number of non-empty cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.cells.chunks(self.width).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in line {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Layout;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::default();
        assert!(grid.is_empty());
        assert_eq!(grid.len(), DEFAULT_WIDTH * DEFAULT_HEIGHT);
        assert_eq!(grid.spawn_col(), 2);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::default();
        grid.set(5, 3, Cell::Colored(Color::Red));
        assert_eq!(grid.get(5, 3), Some(Cell::Colored(Color::Red)));
        assert_eq!(grid.cell_at(5 * DEFAULT_WIDTH + 3), Cell::Colored(Color::Red));
        grid.clear(5, 3);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = Grid::default();
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(DEFAULT_HEIGHT as i32, 0), None);
        assert_eq!(grid.get(0, DEFAULT_WIDTH as i32), None);
        assert!(!grid.in_bounds(0, DEFAULT_WIDTH as i32));
    }

    #[test]
    #[should_panic]
    fn test_set_out_of_bounds_panics() {
        let mut grid = Grid::default();
        grid.set(DEFAULT_HEIGHT as i32, 0, Cell::Garbage);
    }

    #[test]
    fn test_neighbors_respect_edges() {
        let grid = Grid::default();
        let corner: Vec<_> = grid.neighbors(0).collect();
        assert_eq!(corner, vec![DEFAULT_WIDTH, 1]);

        let middle = grid.index(5, 3).unwrap();
        assert_eq!(grid.neighbors(middle).count(), 4);
    }

    #[test]
    fn test_can_place_and_place() {
        let mut grid = Grid::default();
        let piece = Piece::new([Color::Red, Color::Blue], Layout::Horizontal, 11, 4);
        assert!(grid.can_place(&piece));

        let placed = grid.place(&piece);
        assert_eq!(placed.get(11, 4), Some(Cell::Colored(Color::Red)));
        assert_eq!(placed.get(11, 5), Some(Cell::Colored(Color::Blue)));
        // Source grid untouched
        assert!(grid.is_empty());

        // Satellite off the right edge
        let off_edge = Piece::new([Color::Red, Color::Blue], Layout::Horizontal, 11, 5);
        assert!(!grid.can_place(&off_edge));

        // Occupied cell
        grid.set(11, 4, Cell::Garbage);
        assert!(!grid.can_place(&piece));
    }

    #[test]
    fn test_top_row_blocked() {
        let mut grid = Grid::default();
        assert!(!grid.is_top_row_blocked());
        grid.set(0, 2, Cell::Garbage);
        assert!(!grid.is_top_row_blocked());
        grid.set(SPAWN_ROW, 2, Cell::Garbage);
        assert!(grid.is_top_row_blocked());
    }

    #[test]
    fn test_compact_column_keeps_order() {
        let mut grid = Grid::from_rows(&["R.", "..", "G.", "..", "B."]).unwrap();
        let moved = grid.compact_column(0);
        // B already rests on the floor
        assert_eq!(moved, 2);
        assert_eq!(grid.to_string(), "..\n..\nR.\nG.\nB.");
        assert_eq!(grid.compact_column(0), 0);
    }

    #[test]
    fn test_column_heights() {
        let grid = Grid::from_rows(&["...", "R..", "R.#", "RG#"]).unwrap();
        assert_eq!(grid.column_heights(), vec![3, 1, 2]);
        assert_eq!(grid.occupied_count(), 6);
    }

    #[test]
    fn test_text_roundtrip() {
        let rows = ["..P", "#RY"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_string(), rows.join("\n"));
        assert!(Grid::from_rows(&["..", "x."]).is_err());
        assert!(Grid::from_rows(&["..", "..."]).is_err());
    }
}
