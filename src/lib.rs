//! CHAINRS - A Rusty falling-pair chain puzzle engine
//!
//! Two boards, colored pairs falling into them, and cascades of four-or-more
//! groups that clear, settle, and clear again. The engine is pure data in and
//! out: hosts send [`event::Command`]s and get [`event::Event`]s back. Nothing
//! here draws, plays sound, or reads the keyboard.
//!
//! Leaves first: [`grid`] stores cells, [`piece`] moves pairs around it,
//! [`gravity`] and [`matcher`] are the two halves of [`chain`] resolution,
//! [`ai`] scores placements, and [`player`] and [`versus`] tie them into a
//! match.

pub mod ai;
pub mod chain;
pub mod color;
pub mod config;
pub mod event;
pub mod garbage;
pub mod gravity;
pub mod grid;
pub mod kick;
pub mod matcher;
pub mod piece;
pub mod player;
pub mod queue;
pub mod score;
pub mod settings;
pub mod versus;

pub use config::EngineConfig;
pub use event::{Command, Event, Input, PlayerId};
pub use grid::{Cell, Grid};
pub use piece::{Layout, Piece};
pub use player::PlayerBoard;
pub use versus::{Match, MatchOutcome};
