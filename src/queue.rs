//! Seeded pair generator
//!
//! Both players of a match can share a seed and receive identical pair
//! sequences. A few pairs are kept buffered for preview.

use crate::color::Color;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Pairs kept ready for preview
const PREVIEW_DEPTH: usize = 3;

/// The pair randomizer
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: ChaCha8Rng,
    palette: &'static [Color],
    /// Preview queue for upcoming pairs
    queue: VecDeque<[Color; 2]>,
}

impl PieceQueue {
    /// Create a queue dealing from the first `palette_size` colors
    pub fn with_seed(seed: u64, palette_size: usize) -> Self {
        let mut queue = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            palette: Color::palette(palette_size),
            queue: VecDeque::with_capacity(PREVIEW_DEPTH + 1),
        };
        queue.refill();
        queue
    }

    /// Get the next pair (pivot, satellite)
    pub fn next_pair(&mut self) -> [Color; 2] {
        self.refill();
        let pair = self.queue.pop_front().unwrap_or_else(|| self.deal());
        self.refill();
        pair
    }

    /// Preview the next N pairs without removing them
    pub fn preview(&self, count: usize) -> impl Iterator<Item = &[Color; 2]> {
        self.queue.iter().take(count)
    }

    fn deal(&mut self) -> [Color; 2] {
        // palette is never empty, so choose always yields
        let mut pick = || *self.palette.choose(&mut self.rng).unwrap_or(&Color::Red);
        [pick(), pick()]
    }

    fn refill(&mut self) {
        while self.queue.len() < PREVIEW_DEPTH {
            let pair = self.deal();
            self.queue.push_back(pair);
        }
    }
}
