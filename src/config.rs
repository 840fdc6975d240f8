//! Engine configuration
//!
//! Everything the engine reads at initialization: dimensions, palette,
//! threshold, scoring curve, and evaluator weights.

use crate::ai::AiWeights;
use crate::color::PALETTE_MAX;
use crate::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::score::ScoringRules;
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
    /// How many palette colors pieces are dealt from
    pub palette_size: usize,
    /// Minimum connected group size that clears
    pub match_threshold: usize,
    /// Column pieces spawn in
    pub spawn_col: usize,
    pub scoring: ScoringRules,
    pub ai: AiWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette_size: 4,
            match_threshold: 4,
            spawn_col: (DEFAULT_WIDTH - 1) / 2,
            scoring: ScoringRules::default(),
            ai: AiWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Check that the values describe a playable board
    pub fn validate(&self) -> Result<(), String> {
        if self.width < 2 || self.height < 3 {
            return Err(format!(
                "grid must be at least 2x3, got {}x{}",
                self.width, self.height
            ));
        }
        if !(1..=PALETTE_MAX).contains(&self.palette_size) {
            return Err(format!(
                "palette_size {} out of range 1..={PALETTE_MAX}",
                self.palette_size
            ));
        }
        if self.match_threshold < 2 {
            return Err(format!(
                "match_threshold must be at least 2, got {}",
                self.match_threshold
            ));
        }
        if self.spawn_col >= self.width {
            return Err(format!(
                "spawn_col {} outside grid of width {}",
                self.spawn_col, self.width
            ));
        }
        if self.scoring.chain_growth < 2 {
            return Err("scoring.chain_growth must be at least 2".to_string());
        }
        if self.scoring.base_points == 0 || self.scoring.points_per_garbage_row == 0 {
            return Err("scoring points must be positive".to_string());
        }
        Ok(())
    }
}
