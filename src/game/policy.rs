//! Computer-controlled players.

use rand::Rng;
use rand::RngCore;

use crate::game::{CellId, Color, PlayerRegistry};

/// Delay added to every computer's cadence once this many share the board.
pub const CROWDED_COMPUTER_COUNT: usize = 4;

/// Chooses where a computer player moves its pulse next.
pub trait ComputerPolicy: std::fmt::Debug {
    /// Pick a target cell for `color`, or `None` to skip this turn.
    fn choose_cell(
        &mut self,
        color: Color,
        registry: &PlayerRegistry,
        rng: &mut dyn RngCore,
    ) -> Option<CellId>;
}

/// Picks a uniformly random cell the player currently owns.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOwnedCell;

impl ComputerPolicy for RandomOwnedCell {
    fn choose_cell(
        &mut self,
        color: Color,
        registry: &PlayerRegistry,
        rng: &mut dyn RngCore,
    ) -> Option<CellId> {
        registry.choose_random_owned_cell(color, rng)
    }
}

/// When a computer player acts next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    /// Base delay between moves, in seconds.
    pub delay_secs: f64,
    /// Uniform jitter around the base delay, in seconds.
    pub jitter_secs: f64,
}

impl Cadence {
    /// Cadence for a match with `computers` computer players.
    ///
    /// Four or more computers each wait one extra second.
    #[must_use]
    pub fn for_computers(delay_secs: f64, jitter_secs: f64, computers: usize) -> Self {
        let extra = if computers >= CROWDED_COMPUTER_COUNT {
            1.0
        } else {
            0.0
        };
        Self {
            delay_secs: delay_secs + extra,
            jitter_secs,
        }
    }

    /// Sample the wait before the next move. Never negative.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let jitter = if self.jitter_secs > 0.0 {
            rng.gen_range(-self.jitter_secs..=self.jitter_secs)
        } else {
            0.0
        };
        (self.delay_secs + jitter).max(0.0)
    }
}
