//! Headless match runner.
//!
//! Provides a pure function interface: `(seed, config) -> SimResult`.
//!
//! The runner plays the collaborator's part: it signals ready, renders
//! a fixed number of frames per clock tick, feeds each frame's contacts
//! to the engine in the order they were detected, and stops once the
//! match is finished.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::MatchResult;
use crate::game::{ACTIVATION_TICK, Color, Match, MatchConfig, Participant, Phase, Standing};
use crate::physics::frame_contacts;

/// Frames rendered per clock tick by default.
pub const DEFAULT_FRAMES_PER_TICK: u32 = 60;

/// Configuration for a simulated match.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Match settings. Every participant should be a computer.
    pub match_config: MatchConfig,
    /// Frames rendered between two clock ticks.
    pub frames_per_tick: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::with_colors(&[Color::Red, Color::Blue])
    }
}

impl SimConfig {
    /// Default board with one computer per color.
    #[must_use]
    pub fn with_colors(colors: &[Color]) -> Self {
        Self {
            match_config: MatchConfig::with_participants(
                colors.iter().copied().map(Participant::computer).collect(),
            ),
            frames_per_tick: DEFAULT_FRAMES_PER_TICK,
        }
    }
}

/// Final result of a simulated match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimResult {
    /// The seed used for this match.
    pub seed: u64,
    /// Sole leader, or None if the top score is shared.
    pub winner: Option<Color>,
    /// Final ranking, best first.
    pub ranking: Vec<Standing>,
    /// Seconds of active play.
    pub seconds_played: u32,
    /// Ownership changes during play.
    pub captures: u64,
    /// Whether one player eliminated everyone else before time ran out.
    pub ended_early: bool,
}

impl SimResult {
    /// Build the result of a finished match.
    #[must_use]
    pub fn from_match<R: rand::Rng>(seed: u64, game: &Match<R>) -> Self {
        let ranking = game.ranking().to_vec();
        let winner = match ranking.as_slice() {
            [first, second, ..] if first.score > second.score => Some(first.color),
            [only] => Some(only.color),
            _ => None,
        };
        Self {
            seed,
            winner,
            ranking,
            seconds_played: u32::try_from(ACTIVATION_TICK - game.countdown()).unwrap_or(0),
            captures: game.captures(),
            ended_early: game.ended_early(),
        }
    }
}

/// Start a match seeded with `seed`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn new_match(seed: u64, config: &SimConfig) -> MatchResult<Match<ChaCha8Rng>> {
    Match::new(config.match_config.clone(), ChaCha8Rng::seed_from_u64(seed))
}

/// Advance a match by one clock tick: the frames, then the tick itself.
///
/// Returns false once the match is finished.
pub fn step_tick(game: &mut Match<ChaCha8Rng>, frames_per_tick: u32) -> bool {
    let dt = 1.0 / f64::from(frames_per_tick.max(1));
    for _ in 0..frames_per_tick {
        step_frame(game, dt);
        if game.phase() == Phase::Finished {
            return false;
        }
    }
    game.on_clock_tick();
    game.phase() != Phase::Finished
}

/// Render one frame: resolve the contacts of the pulses as they stand,
/// then grow them and let computers act.
///
/// A pulse placed between frames is seen at its base radius before it grows.
pub fn step_frame(game: &mut Match<ChaCha8Rng>, dt: f64) {
    for contact in frame_contacts(game) {
        game.on_contact(contact.color, contact.pulse_center, contact.cell);
    }
    game.on_frame(dt);
}

/// Play a complete match with the given seed.
///
/// # Determinism
///
/// Given the same seed and configuration, this function always produces
/// the same `SimResult`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run_match(seed: u64, config: &SimConfig) -> MatchResult<SimResult> {
    let mut game = new_match(seed, config)?;
    game.on_ready();
    while step_tick(&mut game, config.frames_per_tick) {}
    Ok(SimResult::from_match(seed, &game))
}
