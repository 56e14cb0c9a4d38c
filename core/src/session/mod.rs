//! Session state: the single mutable record the timer engine owns.
//!
//! The presentation side only ever sees a [`SessionSnapshot`]; mutation
//! happens exclusively inside the engine in reaction to events.

mod snapshot;

pub use snapshot::{ControlAvailability, SessionSnapshot, format_mmss};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pomodoro work interval, in seconds (20 minutes).
pub const POMODORO_SECS: u32 = 20 * 60;

/// Nominal break lengths. The break phases exist in the model but the
/// default next-phase policy never enters them (see [`crate::engine`]).
pub const SHORT_BREAK_SECS: u32 = 5 * 60;
pub const LONG_BREAK_SECS: u32 = 15 * 60;

/// Remaining-seconds marks that fire advisory cues during a Pomodoro.
pub const FIVE_MINUTE_MARK: u32 = 5 * 60;
pub const ONE_MINUTE_MARK: u32 = 60;

/// The segment type currently being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Full length of this phase in seconds.
    pub fn duration_secs(self) -> u32 {
        match self {
            Phase::Pomodoro => POMODORO_SECS,
            Phase::ShortBreak => SHORT_BREAK_SECS,
            Phase::LongBreak => LONG_BREAK_SECS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Pomodoro => "Pomodoro",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the timer is in its run lifecycle.
///
/// A single enum instead of two booleans, so "running while still
/// counting down" is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Clock stopped; time is not decaying.
    #[default]
    Idle,
    /// Pre-roll: the starting cue is playing, the clock has not begun.
    CountingDown,
    /// Clock armed; time decays one second per tick.
    Running,
}

/// The sole mutable entity of the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    pub remaining_secs: u32,
    pub run_state: RunState,
    /// Incremented exactly once per completed Pomodoro. Survives resets;
    /// only a process restart clears it.
    pub completed_pomodoros: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Pomodoro,
            remaining_secs: Phase::Pomodoro.duration_secs(),
            run_state: RunState::Idle,
            completed_pomodoros: 0,
        }
    }

    /// Back to a full, idle Pomodoro. The completed count survives.
    pub fn restore_fresh(&mut self) {
        self.phase = Phase::Pomodoro;
        self.remaining_secs = Phase::Pomodoro.duration_secs();
        self.run_state = RunState::Idle;
    }

    /// Idle with an untouched phase: the shape Reset has nothing to do with.
    pub fn is_fresh(&self) -> bool {
        self.run_state == RunState::Idle
            && self.phase == Phase::Pomodoro
            && self.remaining_secs == self.phase.duration_secs()
    }
}
