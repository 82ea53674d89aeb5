//! Game layer for Colhex.
//!
//! Implements the match rules:
//! - Hex grid with per-cell ownership
//! - Players keyed by color, with score mirroring territory
//! - Contact resolution along the six hex axes
//! - Elimination tracking and final ranking
//! - The phase state machine and its one-second clock

mod clock;
mod color;
mod config;
mod contact;
mod grid;
mod invariants;
mod player;
mod policy;
mod registry;
mod scoring;
mod state;

pub use clock::{
    ACTIVATION_TICK, ClockCue, FINISH_TICK, LEAD_IN_TICK, MatchClock, TERMINAL_TICK,
};
pub use color::{Color, ParseColorError};
pub use config::{MatchConfig, Participant};
pub use contact::{
    AXIS_STEP_DEG, AXIS_TOLERANCE_DEG, ContactOutcome, Rejection, contact_angle, is_on_axis,
    is_valid_axis, resolve_contact,
};
pub use grid::{Cell, CellId, Coord, HEX_HEIGHT_WIDTH_RATIO, HexGrid, Point, ROW_STRIDE_FACTOR};
pub use invariants::{BoardViolation, assert_invariants, check_invariants};
pub use player::{Player, Pulse};
pub use policy::{CROWDED_COMPUTER_COUNT, Cadence, ComputerPolicy, RandomOwnedCell};
pub use registry::{MAX_PLAYERS, MIN_PLAYERS, PlayerRegistry};
pub use scoring::{Scoreboard, Standing, final_ranking};
pub use state::{Match, MatchEvent, Phase};
