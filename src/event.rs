//! Commands into the engine and events out of it

use crate::piece::Piece;
use serde::{Deserialize, Serialize};

/// Which side of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// 0 for player one, 1 for player two
    pub fn index(&self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn all() -> [PlayerId; 2] {
        [PlayerId::One, PlayerId::Two]
    }
}

/// Piece-affecting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// One row down; a no-op when grounded
    SoftDrop,
    /// Drop to the floor and lock
    HardDrop,
    Rotate,
    /// Fix the piece into the grid where it is
    Lock,
}

/// A command addressed to one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub player: PlayerId,
    pub command: Command,
}

/// Everything the engine reports back to the host
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PieceMoved {
        player: PlayerId,
        piece: Piece,
    },
    RotationRejected {
        player: PlayerId,
    },
    ChainResolved {
        player: PlayerId,
        cascade_depth: u32,
        score_delta: u64,
        /// Net rows after offsetting the player's own pending garbage
        garbage_rows_for_opponent: u32,
    },
    PieceSpawned {
        player: PlayerId,
        piece: Piece,
    },
    GarbageInjected {
        player: PlayerId,
        rows: u32,
        overflow: usize,
    },
    GameOver {
        player: PlayerId,
    },
}

impl Event {
    /// The player the event is about
    pub fn player(&self) -> PlayerId {
        match self {
            Event::PieceMoved { player, .. }
            | Event::RotationRejected { player }
            | Event::ChainResolved { player, .. }
            | Event::PieceSpawned { player, .. }
            | Event::GarbageInjected { player, .. }
            | Event::GameOver { player } => *player,
        }
    }
}
