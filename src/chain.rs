//! Cascading chain resolution
//!
//! Runs `Matching -> Clearing -> Settling` until no group qualifies. Every
//! pass removes at least `match_threshold` cells, so the loop is bounded by
//! the number of cells on the board.

use crate::config::EngineConfig;
use crate::gravity::{compact, compact_in_place};
use crate::grid::Grid;
use crate::matcher::{MatchGroup, find_matches};
use crate::piece::Piece;
use crate::score::ScoringRules;
use tracing::debug;

/// Resolver state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainPhase {
    Matching,
    Clearing(Vec<MatchGroup>),
    Settling,
    Stable,
}

/// What one clear pass removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    /// Cascade depth of this pass, starting at 1
    pub depth: u32,
    pub groups: Vec<MatchGroup>,
    pub colored_cleared: usize,
    pub garbage_cleared: usize,
    pub score: u64,
}

/// Outcome of resolving one lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainResult {
    /// Settled grid after the last pass
    pub grid: Grid,
    /// Number of clear passes
    pub cascade_depth: u32,
    pub steps: Vec<ChainStep>,
    /// Sum of pass scores
    pub score: u64,
    /// Garbage rows earned before any offsetting
    pub garbage_rows: u32,
}

impl ChainResult {
    /// Cells removed over all passes, garbage included
    pub fn cells_cleared(&self) -> usize {
        self.steps
            .iter()
            .map(|step| step.colored_cleared + step.garbage_cleared)
            .sum()
    }
}

/// Resolve every cascade on `grid`
///
/// The grid is taken as is; callers that just wrote a piece should settle it
/// first (see [`lock_and_resolve`]).
pub fn resolve_chain(grid: Grid, config: &EngineConfig) -> ChainResult {
    let mut grid = grid;
    let mut depth = 0;
    let mut steps = Vec::new();
    let mut phase = ChainPhase::Matching;

    loop {
        phase = match phase {
            ChainPhase::Matching => {
                let groups = find_matches(&grid, config.match_threshold);
                if groups.is_empty() {
                    ChainPhase::Stable
                } else {
                    ChainPhase::Clearing(groups)
                }
            }
            ChainPhase::Clearing(groups) => {
                depth += 1;
                let step = clear_groups(&mut grid, groups, depth, &config.scoring);
                debug!(
                    depth,
                    groups = step.groups.len(),
                    colored = step.colored_cleared,
                    garbage = step.garbage_cleared,
                    score = step.score,
                    "chain pass"
                );
                steps.push(step);
                ChainPhase::Settling
            }
            ChainPhase::Settling => {
                compact_in_place(&mut grid);
                ChainPhase::Matching
            }
            ChainPhase::Stable => break,
        };
    }

    let score = steps
        .iter()
        .fold(0u64, |total, step| total.saturating_add(step.score));
    ChainResult {
        grid,
        cascade_depth: depth,
        steps,
        score,
        garbage_rows: config.scoring.garbage_rows(score),
    }
}

/// Write the piece, let it settle, and resolve the chain it triggers
pub fn lock_and_resolve(grid: &Grid, piece: &Piece, config: &EngineConfig) -> ChainResult {
    resolve_chain(compact(&grid.place(piece)), config)
}

/// Remove every group cell plus garbage touching any of them, all at once
fn clear_groups(
    grid: &mut Grid,
    groups: Vec<MatchGroup>,
    depth: u32,
    rules: &ScoringRules,
) -> ChainStep {
    let mut doomed = vec![false; grid.len()];
    let mut colored_cleared = 0;

    for &idx in groups.iter().flat_map(|group| group.cells.iter()) {
        if !doomed[idx] {
            doomed[idx] = true;
            colored_cleared += 1;
        }
    }

    let mut garbage = Vec::new();
    for &idx in groups.iter().flat_map(|group| group.cells.iter()) {
        for next in grid.neighbors(idx) {
            if !doomed[next] && grid.cell_at(next).is_garbage() {
                doomed[next] = true;
                garbage.push(next);
            }
        }
    }

    for (idx, _) in doomed.iter().enumerate().filter(|(_, doomed)| **doomed) {
        grid.clear_at(idx);
    }

    ChainStep {
        depth,
        score: rules.pass_score(depth, colored_cleared),
        garbage_cleared: garbage.len(),
        groups,
        colored_cleared,
    }
}
