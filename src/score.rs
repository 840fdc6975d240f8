//! Chain scoring and garbage conversion
//!
//! One formula everywhere: each clear pass scores
//! `base_points * colored_cells_cleared * chain_growth^depth`, and the
//! garbage sent is the total score divided by the per-row cost, rounded up.

use serde::{Deserialize, Serialize};

/// Tunable scoring curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Points per colored cell before the chain multiplier
    pub base_points: u64,
    /// Multiplier base; must be at least 2 so deeper chains always pay more
    pub chain_growth: u64,
    /// Score needed to send one garbage row
    pub points_per_garbage_row: u64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: 10,
            chain_growth: 2,
            points_per_garbage_row: 120,
        }
    }
}

impl ScoringRules {
    /// Multiplier for the pass at `depth` (1 for the first clear)
    pub fn chain_multiplier(&self, depth: u32) -> u64 {
        self.chain_growth.saturating_pow(depth)
    }

    /// Score for one clear pass
    pub fn pass_score(&self, depth: u32, colored_cells: usize) -> u64 {
        self.base_points
            .saturating_mul(colored_cells as u64)
            .saturating_mul(self.chain_multiplier(depth))
    }

    /// Garbage rows earned by a chain's total score
    pub fn garbage_rows(&self, total_score: u64) -> u32 {
        let rows = total_score.div_ceil(self.points_per_garbage_row.max(1));
        u32::try_from(rows).unwrap_or(u32::MAX)
    }
}

/// Running totals for one player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Locks that cleared at least one group
    pub chains: u32,
    /// Deepest cascade so far
    pub best_chain: u32,
    /// Cells removed by clears, garbage included
    pub cells_cleared: u64,
    /// Garbage rows sent after offsetting
    pub garbage_sent: u32,
    /// Garbage rows that landed on this player's grid
    pub garbage_received: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved chain
    /// Returns the action name for display
    pub fn add_chain(&mut self, depth: u32, points: u64, cells_cleared: usize) -> String {
        if depth == 0 {
            return String::new();
        }
        self.points = self.points.saturating_add(points);
        self.chains += 1;
        self.best_chain = self.best_chain.max(depth);
        self.cells_cleared += cells_cleared as u64;

        match depth {
            1 => "Clear".to_string(),
            n => format!("{n}-Chain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_strictly_grows() {
        let rules = ScoringRules::default();
        for depth in 1..20 {
            assert!(rules.chain_multiplier(depth + 1) > rules.chain_multiplier(depth));
        }
    }

    #[test]
    fn test_pass_score() {
        let rules = ScoringRules::default();
        assert_eq!(rules.pass_score(1, 4), 80);
        assert_eq!(rules.pass_score(2, 4), 160);
        assert_eq!(rules.pass_score(3, 5), 400);
        assert_eq!(rules.pass_score(1, 0), 0);
    }

    #[test]
    fn test_pass_score_saturates() {
        let rules = ScoringRules::default();
        assert_eq!(rules.pass_score(200, 4), u64::MAX);
    }

    #[test]
    fn test_garbage_rows_round_up() {
        let rules = ScoringRules::default();
        assert_eq!(rules.garbage_rows(0), 0);
        assert_eq!(rules.garbage_rows(1), 1);
        assert_eq!(rules.garbage_rows(120), 1);
        assert_eq!(rules.garbage_rows(121), 2);
        assert_eq!(rules.garbage_rows(240), 2);
    }

    #[test]
    fn test_add_chain() {
        let mut score = Score::new();
        assert_eq!(score.add_chain(1, 80, 4), "Clear");
        assert_eq!(score.add_chain(3, 1000, 12), "3-Chain");
        assert_eq!(score.points, 1080);
        assert_eq!(score.chains, 2);
        assert_eq!(score.best_chain, 3);
        assert_eq!(score.cells_cleared, 16);
    }

    #[test]
    fn test_no_clear_leaves_score_alone() {
        let mut score = Score::new();
        assert!(score.add_chain(0, 0, 0).is_empty());
        assert_eq!(score, Score::new());
    }
}
