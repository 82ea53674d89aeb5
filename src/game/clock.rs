//! The one-second match clock.

use serde::Serialize;

/// Value of the first tick after the ready signal.
pub const LEAD_IN_TICK: i32 = 35;

/// Tick at which every cell becomes active.
pub const ACTIVATION_TICK: i32 = 30;

/// Tick showing the "finish" cue.
pub const FINISH_TICK: i32 = 0;

/// Tick at which time is up.
pub const TERMINAL_TICK: i32 = -1;

/// Presentation cue attached to a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockCue {
    /// "3".
    Three,
    /// "2".
    Two,
    /// "1".
    One,
    /// Play begins on the next tick.
    Start,
    /// Play ends on the next tick.
    Finish,
}

impl ClockCue {
    /// The cue shown on a given tick, if any.
    #[must_use]
    pub const fn for_tick(tick: i32) -> Option<Self> {
        match tick {
            34 | 3 => Some(Self::Three),
            33 | 2 => Some(Self::Two),
            32 | 1 => Some(Self::One),
            31 => Some(Self::Start),
            FINISH_TICK => Some(Self::Finish),
            _ => None,
        }
    }

    /// Text shown for the cue.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Three => "3",
            Self::Two => "2",
            Self::One => "1",
            Self::Start => "Start",
            Self::Finish => "Finish",
        }
    }
}

/// Countdown from [`LEAD_IN_TICK`] to [`TERMINAL_TICK`].
///
/// The clock does not measure time itself; the collaborator calls
/// [`MatchClock::tick`] once per second. While paused, or before
/// [`MatchClock::start`], ticks are swallowed without consuming a value, so
/// no value is ever skipped or delivered twice across a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchClock {
    next: i32,
    running: bool,
    paused: bool,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchClock {
    /// A stopped clock at the lead-in value.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: LEAD_IN_TICK,
            running: false,
            paused: false,
        }
    }

    /// Begin delivering ticks from the lead-in value.
    ///
    /// A pause requested before the start stays in force until resumed.
    pub fn start(&mut self) {
        self.next = LEAD_IN_TICK;
        self.running = true;
    }

    /// Stop delivering ticks for good.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Suspend tick delivery. Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        !std::mem::replace(&mut self.paused, true)
    }

    /// Restart tick delivery. Returns false if not paused.
    pub fn resume(&mut self) -> bool {
        std::mem::replace(&mut self.paused, false)
    }

    /// Value the next delivered tick will carry.
    #[must_use]
    pub const fn next_tick(&self) -> i32 {
        self.next
    }

    /// Whether ticks are being delivered.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running && !self.paused
    }

    /// Whether the clock is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the clock has been started and not yet stopped.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.running
    }

    /// Seconds of play left, once play has begun.
    #[must_use]
    pub fn seconds_left(&self) -> Option<u32> {
        if self.next >= ACTIVATION_TICK {
            return None;
        }
        u32::try_from(self.next + 1).ok()
    }

    /// Deliver one tick, returning its value.
    ///
    /// Returns `None` while paused or stopped. Delivering
    /// [`TERMINAL_TICK`] stops the clock.
    pub fn tick(&mut self) -> Option<i32> {
        if !self.is_running() {
            return None;
        }
        let value = self.next;
        if value <= TERMINAL_TICK {
            self.running = false;
        } else {
            self.next -= 1;
        }
        Some(value)
    }
}
