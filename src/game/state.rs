//! Match state machine.
//!
//! A [`Match`] owns the board, the players and the clock. The surrounding
//! collaborator drives it through the `on_*` entry points and observes it
//! through the accessors and the event queue; nothing in here blocks or
//! measures wall-clock time.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

use crate::error::{MatchError, MatchResult};
use crate::game::{
    ACTIVATION_TICK, Cadence, CellId, ClockCue, Color, ComputerPolicy, ContactOutcome, HexGrid,
    MatchClock, MatchConfig, Point, PlayerRegistry, Pulse, RandomOwnedCell, Scoreboard, Standing,
    TERMINAL_TICK, final_ranking, resolve_contact,
};

/// Phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Board dealt, waiting for the ready signal.
    Setup,
    /// Lead-in cues before play.
    Countdown,
    /// Cells accept contact.
    Active,
    /// Play is over; the ranking is final.
    Ending,
    /// Results are on screen. Terminal.
    Finished,
}

/// Something the presentation layer may want to animate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// The match moved to a new phase.
    PhaseChanged {
        /// Previous phase.
        from: Phase,
        /// New phase.
        to: Phase,
    },
    /// A clock tick carried a cue.
    Cue {
        /// Tick value.
        tick: i32,
        /// Cue to show.
        cue: ClockCue,
    },
    /// A cell changed hands.
    CellCaptured {
        /// Cell id.
        cell: CellId,
        /// Previous owner (None = neutral).
        from: Option<Color>,
        /// New owner.
        to: Color,
    },
    /// A player's score reached zero.
    PlayerEliminated {
        /// Eliminated color.
        color: Color,
    },
    /// The match is over.
    MatchEnded {
        /// Final ranking, best first.
        ranking: Vec<Standing>,
        /// Whether it ended before the clock ran out.
        early: bool,
    },
}

/// A single match.
///
/// Generic over the random source so tests and simulations can seed it.
#[derive(Debug)]
pub struct Match<R: Rng> {
    config: MatchConfig,
    grid: HexGrid,
    registry: PlayerRegistry,
    scoreboard: Scoreboard,
    clock: MatchClock,
    phase: Phase,
    /// Value of the last delivered tick.
    countdown: i32,
    rng: R,
    policies: BTreeMap<Color, Box<dyn ComputerPolicy>>,
    /// Seconds until each computer player moves again.
    computer_timers: BTreeMap<Color, f64>,
    cadence: Cadence,
    events: Vec<MatchEvent>,
    ranking: Vec<Standing>,
    ended_early: bool,
    captures: u64,
}

impl<R: Rng> Match<R> {
    /// Build a match: grid, players and the starting scatter.
    ///
    /// Every computer participant gets the [`RandomOwnedCell`] policy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error (see [`MatchConfig::validate`]),
    /// `InvalidGrid`, or `GridTooSmall` if the starting scatter does not fit.
    pub fn new(config: MatchConfig, rng: R) -> MatchResult<Self> {
        config.validate()?;
        let grid = HexGrid::new(config.columns, config.rows, config.hex_width)?;

        let mut registry = PlayerRegistry::new();
        let mut policies: BTreeMap<Color, Box<dyn ComputerPolicy>> = BTreeMap::new();
        for participant in &config.participants {
            registry.register(participant.color, participant.is_computer)?;
            if participant.is_computer {
                policies.insert(participant.color, Box::new(RandomOwnedCell));
            }
        }

        let cadence = Cadence::for_computers(
            config.computer_delay_secs,
            config.computer_jitter_secs,
            config.computer_count(),
        );

        let mut game = Self {
            scoreboard: Scoreboard::new(registry.len()),
            grid,
            registry,
            clock: MatchClock::new(),
            phase: Phase::Setup,
            countdown: MatchClock::new().next_tick(),
            rng,
            policies,
            computer_timers: BTreeMap::new(),
            cadence,
            events: Vec::new(),
            ranking: Vec::new(),
            ended_early: false,
            captures: 0,
            config,
        };
        game.scatter_starting_cells()?;
        game.scoreboard = Scoreboard::from_registry(&game.registry);
        Ok(game)
    }

    /// Replace the policy driving a computer player.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` if the color is not a computer participant.
    pub fn set_policy(
        &mut self,
        color: Color,
        policy: Box<dyn ComputerPolicy>,
    ) -> MatchResult<()> {
        match self.policies.get_mut(&color) {
            Some(slot) => {
                *slot = policy;
                Ok(())
            }
            None => Err(MatchError::UnknownPlayer(color)),
        }
    }

    /// Deal `starting_cells` random neutral cells to each player in turn.
    fn scatter_starting_cells(&mut self) -> MatchResult<()> {
        let required = self.config.starting_cells * self.registry.len();
        let mut neutral: Vec<CellId> = self
            .grid
            .iter()
            .filter(|c| c.is_neutral())
            .map(|c| c.id)
            .collect();
        if required > neutral.len() {
            return Err(MatchError::GridTooSmall {
                available: neutral.len(),
                required,
            });
        }

        for color in self.registry.colors() {
            for _ in 0..self.config.starting_cells {
                let index = self.rng.gen_range(0..neutral.len());
                let id = neutral.swap_remove(index);
                self.registry.add_cell(color, id)?;
                self.grid.set_owner(id, Some(color))?;
            }
        }
        debug!(
            "dealt {} starting cells to {} players",
            self.config.starting_cells,
            self.registry.len()
        );
        Ok(())
    }

    /// Throw away all progress and deal a fresh board with the same players.
    ///
    /// # Errors
    ///
    /// Returns `GridTooSmall` if the scatter no longer fits.
    pub fn restart(&mut self) -> MatchResult<()> {
        self.grid.reset_all();
        self.registry.clear_territory();
        self.clock = MatchClock::new();
        self.countdown = self.clock.next_tick();
        self.computer_timers.clear();
        self.events.clear();
        self.ranking.clear();
        self.ended_early = false;
        self.captures = 0;
        self.set_phase(Phase::Setup);
        self.scatter_starting_cells()?;
        self.scoreboard = Scoreboard::from_registry(&self.registry);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// The players are ready: start the countdown.
    ///
    /// Returns false (and does nothing) outside [`Phase::Setup`].
    pub fn on_ready(&mut self) -> bool {
        if self.phase != Phase::Setup {
            debug!("ready signal ignored in {:?}", self.phase);
            return false;
        }
        self.clock.start();
        self.set_phase(Phase::Countdown);
        true
    }

    /// One second has passed.
    pub fn on_clock_tick(&mut self) {
        let Some(tick) = self.clock.tick() else {
            debug!("tick ignored: clock not running");
            return;
        };
        self.countdown = tick;

        if let Some(cue) = ClockCue::for_tick(tick) {
            self.events.push(MatchEvent::Cue { tick, cue });
        }

        if tick == ACTIVATION_TICK && self.phase == Phase::Countdown {
            self.grid.activate_all();
            self.arm_computer_timers();
            self.set_phase(Phase::Active);
        } else if tick == TERMINAL_TICK && self.phase == Phase::Active {
            self.end_match(false);
        }
    }

    /// The physics step reports that `color`'s pulse centered at
    /// `pulse_center` touches `cell`.
    ///
    /// Ignored outside [`Phase::Active`]. Inconsistent contacts are logged
    /// and dropped. Returns the outcome when the contact was resolved.
    pub fn on_contact(
        &mut self,
        color: Color,
        pulse_center: Point,
        cell: CellId,
    ) -> Option<ContactOutcome> {
        if self.phase != Phase::Active {
            return None;
        }

        let from = self.grid.cell(cell).and_then(|c| c.owner);
        let outcome = match resolve_contact(
            &mut self.grid,
            &mut self.registry,
            color,
            pulse_center,
            cell,
        ) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("contact from {color} on cell {cell} dropped: {err}");
                return None;
            }
        };

        if outcome.changed_owner() {
            self.captures += 1;
            self.events.push(MatchEvent::CellCaptured {
                cell,
                from,
                to: color,
            });
            if let Some(eliminated) = self.scoreboard.record(color, outcome) {
                info!("{eliminated} has no cells left");
                self.events
                    .push(MatchEvent::PlayerEliminated { color: eliminated });
            }
            if self.scoreboard.has_sole_survivor() {
                self.end_match(true);
            }
        }
        Some(outcome)
    }

    /// A touch on `cell` asks to move `color`'s pulse there.
    ///
    /// Honored once per gesture, during play, on a cell the player owns.
    /// Returns whether the pulse moved.
    pub fn on_touch(&mut self, color: Color, cell: CellId) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let Some(player) = self.registry.get(color) else {
            return false;
        };
        if player.moved_this_gesture {
            return false;
        }
        if !self.place_pulse(color, cell) {
            return false;
        }
        if let Some(player) = self.registry.get_mut(color) {
            player.moved_this_gesture = true;
        }
        true
    }

    /// Every touch of the current gesture has been delivered.
    pub fn on_gesture_end(&mut self) {
        for player in self.registry.iter_mut() {
            player.moved_this_gesture = false;
        }
    }

    /// A frame `dt` seconds long was rendered: grow pulses and let
    /// computer players act.
    pub fn on_frame(&mut self, dt: f64) {
        if self.phase != Phase::Active {
            return;
        }
        let growth = self.config.pulse_growth_per_frame * self.config.hex_width;
        for player in self.registry.iter_mut() {
            if let Some(pulse) = player.pulse.as_mut() {
                pulse.grow(growth);
            }
        }
        if !self.clock.is_paused() {
            self.run_computers(dt);
        }
    }

    /// Stop tick delivery. Returns false if already paused.
    pub fn on_pause(&mut self) -> bool {
        let changed = self.clock.pause();
        if changed {
            info!("match paused at tick {}", self.countdown);
        }
        changed
    }

    /// Restart tick delivery. Returns false if not paused.
    pub fn on_resume(&mut self) -> bool {
        let changed = self.clock.resume();
        if changed {
            info!("match resumed at tick {}", self.countdown);
        }
        changed
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Value of the last delivered tick.
    #[must_use]
    pub const fn countdown(&self) -> i32 {
        self.countdown
    }

    /// The clock.
    #[must_use]
    pub const fn clock(&self) -> &MatchClock {
        &self.clock
    }

    /// The board.
    #[must_use]
    pub const fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// The players.
    #[must_use]
    pub const fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Zero-score bookkeeping.
    #[must_use]
    pub const fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// The configuration the match was built from.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// A player's score.
    #[must_use]
    pub fn score(&self, color: Color) -> Option<u32> {
        self.registry.score(color)
    }

    /// Owner of a cell (None for neutral or unknown cells).
    #[must_use]
    pub fn owner(&self, cell: CellId) -> Option<Color> {
        self.grid.cell(cell).and_then(|c| c.owner)
    }

    /// Pulses currently in play.
    pub fn pulses(&self) -> impl Iterator<Item = (Color, Pulse)> + '_ {
        self.registry
            .iter()
            .filter_map(|p| p.pulse.map(|pulse| (p.color, pulse)))
    }

    /// Radius of a cell's contact circle, in board units.
    #[must_use]
    pub fn cell_contact_radius(&self) -> f64 {
        self.config.cell_contact_radius * self.config.hex_width
    }

    /// Final ranking; empty until the match ends.
    #[must_use]
    pub fn ranking(&self) -> &[Standing] {
        &self.ranking
    }

    /// Whether the match ended because one player was left standing.
    #[must_use]
    pub const fn ended_early(&self) -> bool {
        self.ended_early
    }

    /// Number of ownership changes so far.
    #[must_use]
    pub const fn captures(&self) -> u64 {
        self.captures
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        info!("phase {from:?} -> {to:?}");
        self.events.push(MatchEvent::PhaseChanged { from, to });
    }

    /// Put `color`'s pulse on one of its own active cells.
    fn place_pulse(&mut self, color: Color, cell: CellId) -> bool {
        let Some(target) = self.grid.cell(cell).copied() else {
            return false;
        };
        if !target.active || target.owner != Some(color) {
            return false;
        }
        let radius = self.config.pulse_base_radius * self.config.hex_width;
        let Some(player) = self.registry.get_mut(color) else {
            return false;
        };
        player.pulse = Some(Pulse::new(target.center, cell, radius));
        debug!("{color} pulse placed on cell {cell}");
        true
    }

    fn arm_computer_timers(&mut self) {
        self.computer_timers.clear();
        for &color in self.policies.keys() {
            let wait = self.cadence.sample(&mut self.rng);
            self.computer_timers.insert(color, wait);
        }
    }

    fn run_computers(&mut self, dt: f64) {
        let colors: Vec<Color> = self.policies.keys().copied().collect();
        for color in colors {
            let Some(timer) = self.computer_timers.get_mut(&color) else {
                continue;
            };
            *timer -= dt;
            if *timer > 0.0 {
                continue;
            }
            *timer = self.cadence.sample(&mut self.rng);

            let choice = match self.policies.get_mut(&color) {
                Some(policy) => policy.choose_cell(color, &self.registry, &mut self.rng),
                None => None,
            };
            if let Some(cell) = choice {
                self.place_pulse(color, cell);
            }
        }
    }

    fn end_match(&mut self, early: bool) {
        self.set_phase(Phase::Ending);
        self.clock.stop();
        self.grid.deactivate_all();
        for player in self.registry.iter_mut() {
            player.pulse = None;
            player.moved_this_gesture = false;
        }
        self.computer_timers.clear();
        self.ended_early = early;
        self.ranking = final_ranking(&self.registry);
        if early {
            info!("match won early by {:?}", self.ranking.first().map(|s| s.color));
        }
        self.events.push(MatchEvent::MatchEnded {
            ranking: self.ranking.clone(),
            early,
        });
        self.set_phase(Phase::Finished);
    }
}
