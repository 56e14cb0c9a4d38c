//! Read-only view of the session handed to the presentation layer.

use serde::Serialize;

use super::{Phase, RunState, Session};

/// Which controls the presentation layer should expose right now.
///
/// Guarding intents here is what makes "Start while already running" and
/// "Reset while counting down" unreachable from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlAvailability {
    pub start_shown: bool,
    pub pause_shown: bool,
    pub cancel_shown: bool,
    pub reset_enabled: bool,
}

/// Immutable reflection of [`Session`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub remaining_secs: u32,
    /// `MM:SS`, both fields zero-padded.
    pub time_display: String,
    pub controls: ControlAvailability,
    pub completed_pomodoros: u32,
}

impl SessionSnapshot {
    pub fn of(session: &Session) -> Self {
        Self {
            phase: session.phase,
            remaining_secs: session.remaining_secs,
            time_display: format_mmss(session.remaining_secs),
            controls: ControlAvailability {
                start_shown: session.run_state == RunState::Idle,
                pause_shown: session.run_state == RunState::Running,
                cancel_shown: session.run_state == RunState::CountingDown,
                reset_enabled: session.run_state != RunState::CountingDown
                    && !session.is_fresh(),
            },
            completed_pomodoros: session.completed_pomodoros,
        }
    }
}

/// Format seconds as zero-padded `MM:SS`.
pub fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
