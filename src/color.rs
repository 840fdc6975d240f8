//! Tile colors
//!
//! The palette is fixed; the engine config picks how many of them are dealt.

use serde::{Deserialize, Serialize};

/// Number of colors in the full palette
pub const PALETTE_MAX: usize = 5;

/// The tile colors, in palette order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

static PALETTE: [Color; PALETTE_MAX] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Purple,
];

impl Color {
    /// Get all colors in palette order
    pub fn all() -> [Color; PALETTE_MAX] {
        PALETTE
    }

    /// The first `size` colors of the palette
    ///
    /// Panics if `size` is zero or larger than the palette.
    pub fn palette(size: usize) -> &'static [Color] {
        assert!(
            (1..=PALETTE_MAX).contains(&size),
            "palette size {size} out of range 1..={PALETTE_MAX}"
        );
        &PALETTE[..size]
    }

    /// Single-letter symbol used by the text board format
    pub fn symbol(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
        }
    }

    pub fn from_symbol(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            'Y' => Some(Color::Yellow),
            'P' => Some(Color::Purple),
            _ => None,
        }
    }
}
