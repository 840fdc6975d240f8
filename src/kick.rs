//! Wall kick data
//!
//! When a rotation collides, these column offsets are tried in order.
//! The first entry is always the unmodified anchor.

use crate::piece::Layout;

/// Column offsets to try when rotating out of `from`
///
/// Leaving vertical, the satellite swings right, so a left kick is tried first.
/// Leaving horizontal, the pair shifts toward the satellite side first.
pub fn wall_kicks(from: Layout) -> [i32; 5] {
    match from {
        Layout::Vertical => [0, -1, 1, -2, 2],
        Layout::Horizontal => [0, 1, -1, 2, -2],
    }
}
