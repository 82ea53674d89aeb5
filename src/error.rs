//! Error types for the match engine.

use thiserror::Error;

use crate::game::{CellId, Color};

/// Errors raised by the match engine.
///
/// Only `DuplicateColor` and the configuration variants are expected at
/// runtime; the rest flag a caller that broke the engine's call discipline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A color was registered twice.
    #[error("color {0} is already registered")]
    DuplicateColor(Color),

    /// An operation would corrupt the score/ownership bookkeeping.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A grid lookup fell outside the grid.
    #[error("coordinate ({col}, {row}) is outside the grid")]
    OutOfRangeCoordinate {
        /// Requested column.
        col: u16,
        /// Requested row.
        row: u16,
    },

    /// A cell id that the grid never issued.
    #[error("unknown cell id {0}")]
    UnknownCell(CellId),

    /// A color that is not part of the match.
    #[error("color {0} is not registered")]
    UnknownPlayer(Color),

    /// Fewer participants than the game allows.
    #[error("too few players: {0} (minimum 2)")]
    TooFewPlayers(usize),

    /// More participants than the game allows.
    #[error("too many players: {0} (maximum 6)")]
    TooManyPlayers(usize),

    /// Grid dimensions or geometry that cannot be built.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Not enough neutral cells for every player's starting territory.
    #[error("grid has {available} cells but {required} are needed for the starting scatter")]
    GridTooSmall {
        /// Cells on the grid.
        available: usize,
        /// Cells needed by the scatter.
        required: usize,
    },
}

impl MatchError {
    /// Build an invariant violation from anything printable.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}

/// Result type for match engine operations.
pub type MatchResult<T> = Result<T, MatchError>;
