// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Colhex: a deterministic match engine for a hexagonal territory-capture game.
//!
//! Two to six players each own a color. A player's pulse grows from one of
//! its cells and captures every cell it reaches along the grid's six axes;
//! the match ends when the clock runs out or only one player holds any
//! territory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Simulation / CLI (sim, physics)   │
//! ├─────────────────────────────────────┤
//! │   Match state machine + clock       │
//! ├─────────────────────────────────────┤
//! │   Contact resolver, scoring         │
//! ├─────────────────────────────────────┤
//! │   Hex grid, player registry         │
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine is single-threaded and never measures time itself: the
//! caller delivers clock ticks, frames, touches and contacts.

pub mod error;
pub mod game;
pub mod physics;
pub mod render;
pub mod sim;

pub use error::{MatchError, MatchResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Cell, CellId, Color, HexGrid, Match, MatchConfig, MatchEvent, Participant, Phase, Player,
    PlayerRegistry, Point, Standing,
};
