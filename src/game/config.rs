//! Match configuration consumed at setup.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};
use crate::game::{Color, MAX_PLAYERS, MIN_PLAYERS};

/// One participating color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Player color.
    pub color: Color,
    /// Whether a computer policy drives this player.
    pub is_computer: bool,
}

impl Participant {
    /// A human-controlled participant.
    #[must_use]
    pub const fn human(color: Color) -> Self {
        Self {
            color,
            is_computer: false,
        }
    }

    /// A computer-controlled participant.
    #[must_use]
    pub const fn computer(color: Color) -> Self {
        Self {
            color,
            is_computer: true,
        }
    }
}

/// Everything a match needs to know before it starts.
///
/// Radii and growth are in hex widths so the same settings work at any
/// board scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Cells on even rows.
    pub columns: u16,
    /// Number of rows.
    pub rows: u16,
    /// Width of one hexagon in board units.
    pub hex_width: f64,
    /// Participating colors.
    pub participants: Vec<Participant>,
    /// Cells each player receives before the countdown.
    pub starting_cells: usize,
    /// Radius of a freshly placed pulse.
    pub pulse_base_radius: f64,
    /// Pulse radius growth per rendered frame.
    pub pulse_growth_per_frame: f64,
    /// Radius of a cell's contact circle.
    pub cell_contact_radius: f64,
    /// Base delay between computer moves, in seconds.
    pub computer_delay_secs: f64,
    /// Uniform jitter around the computer delay, in seconds.
    pub computer_jitter_secs: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            columns: 17,
            rows: 12,
            hex_width: 20.0,
            participants: vec![
                Participant::human(Color::Red),
                Participant::computer(Color::Blue),
            ],
            starting_cells: 12,
            pulse_base_radius: 0.6,
            pulse_growth_per_frame: 0.04,
            cell_contact_radius: 0.5,
            computer_delay_secs: 0.5,
            computer_jitter_secs: 0.45,
        }
    }
}

impl MatchConfig {
    /// Default board with the given participants.
    #[must_use]
    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            ..Self::default()
        }
    }

    /// Check participant count, unique colors and geometry.
    ///
    /// # Errors
    ///
    /// Returns `TooFewPlayers`, `TooManyPlayers`, `DuplicateColor` or
    /// `InvalidGrid`.
    pub fn validate(&self) -> MatchResult<()> {
        let count = self.participants.len();
        if count < MIN_PLAYERS {
            return Err(MatchError::TooFewPlayers(count));
        }
        if count > MAX_PLAYERS {
            return Err(MatchError::TooManyPlayers(count));
        }
        for (i, p) in self.participants.iter().enumerate() {
            if self.participants[..i].iter().any(|q| q.color == p.color) {
                return Err(MatchError::DuplicateColor(p.color));
            }
        }

        if self.starting_cells == 0 {
            return Err(MatchError::InvalidGrid(
                "every player needs at least one starting cell".to_string(),
            ));
        }

        let lengths = [
            ("pulse_base_radius", self.pulse_base_radius),
            ("pulse_growth_per_frame", self.pulse_growth_per_frame),
            ("cell_contact_radius", self.cell_contact_radius),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidGrid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.computer_delay_secs.is_finite() || !self.computer_jitter_secs.is_finite() {
            return Err(MatchError::InvalidGrid(
                "computer cadence must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of computer-controlled participants.
    #[must_use]
    pub fn computer_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_computer).count()
    }
}
