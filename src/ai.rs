//! Greedy move selection for the computer opponent
//!
//! Looks one piece ahead: every reachable column is hard-dropped, locked,
//! and resolved, and the resulting board is scored with
//! `cascade * depth - max_height * tallest - height_variance * variance`.
//! The first candidate with the best score wins, so enumeration order is the
//! tie-break.

use crate::chain::{ChainResult, lock_and_resolve};
use crate::config::EngineConfig;
use crate::grid::Grid;
use crate::piece::{Piece, hard_drop, move_left, move_right, rotate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Heuristic weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiWeights {
    /// Reward per cascade pass
    pub cascade: f64,
    /// Penalty per row of the tallest column
    pub max_height: f64,
    /// Penalty per unit of column height variance
    pub height_variance: f64,
    /// Also try the rotated layout (after every unrotated candidate)
    pub explore_rotation: bool,
}

impl Default for AiWeights {
    fn default() -> Self {
        Self {
            cascade: 10.0,
            max_height: 1.0,
            height_variance: 0.5,
            explore_rotation: false,
        }
    }
}

/// A scored placement
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Where the piece comes to rest
    pub landing: Piece,
    pub result: ChainResult,
    pub score: f64,
}

/// Every reachable pose, in evaluation order
///
/// Slides fully left, then records each column while stepping right until
/// blocked. With rotation exploration on, the rotated layout's poses follow.
pub fn candidates(grid: &Grid, piece: Piece, explore_rotation: bool) -> Vec<Piece> {
    let mut poses = sweep(grid, piece);
    if explore_rotation {
        if let Some(rotated) = rotate(grid, piece) {
            poses.extend(sweep(grid, rotated));
        }
    }
    poses
}

fn sweep(grid: &Grid, piece: Piece) -> Vec<Piece> {
    let mut current = piece;
    loop {
        let next = move_left(grid, current);
        if next == current {
            break;
        }
        current = next;
    }

    let mut poses = vec![current];
    loop {
        let next = move_right(grid, current);
        if next == current {
            return poses;
        }
        poses.push(next);
        current = next;
    }
}

/// Population variance of the column heights
pub fn height_variance(heights: &[usize]) -> f64 {
    if heights.is_empty() {
        return 0.0;
    }
    let n = heights.len() as f64;
    let mean = heights.iter().sum::<usize>() as f64 / n;
    heights
        .iter()
        .map(|&h| (h as f64 - mean).powi(2))
        .sum::<f64>()
        / n
}

/// Heuristic value of a resolved board
pub fn board_score(grid: &Grid, cascade_depth: u32, weights: &AiWeights) -> f64 {
    if grid.is_top_row_blocked() {
        return f64::NEG_INFINITY;
    }
    let heights = grid.column_heights();
    let tallest = heights.iter().copied().max().unwrap_or(0);
    weights.cascade * cascade_depth as f64
        - weights.max_height * tallest as f64
        - weights.height_variance * height_variance(&heights)
}

/// Drop `pose` straight down, lock it, and score the outcome
pub fn evaluate(grid: &Grid, pose: Piece, config: &EngineConfig) -> Evaluation {
    let (landing, _) = hard_drop(grid, pose);
    let result = lock_and_resolve(grid, &landing, config);
    let score = board_score(&result.grid, result.cascade_depth, &config.ai);
    Evaluation {
        landing,
        result,
        score,
    }
}

/// Pick the landing pose the opponent wants for `piece`
///
/// Returns `piece` itself when it has nowhere to go.
pub fn choose_move(grid: &Grid, piece: Piece, config: &EngineConfig) -> Piece {
    let mut best: Option<Evaluation> = None;

    for pose in candidates(grid, piece, config.ai.explore_rotation) {
        let evaluation = evaluate(grid, pose, config);
        // Strictly greater: ties keep the earlier candidate
        let better = best
            .as_ref()
            .is_none_or(|current| evaluation.score > current.score);
        if better {
            best = Some(evaluation);
        }
    }

    match best {
        Some(evaluation) => {
            debug!(
                col = evaluation.landing.col,
                layout = ?evaluation.landing.layout,
                depth = evaluation.result.cascade_depth,
                score = evaluation.score,
                "opponent move chosen"
            );
            evaluation.landing
        }
        None => piece,
    }
}
