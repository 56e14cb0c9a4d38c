//! Events consumed by the timer engine.

use crate::audio::Cue;

/// User intents forwarded 1:1 from the presentation layer's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    Cancel,
    Reset,
}

/// Everything that can mutate the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Intent(Intent),

    /// One second of wall-clock time elapsed while the ticker was armed.
    Tick,

    /// A cue reached its natural end (never sent for interrupted cues).
    /// `generation` is the engine generation captured when the cue was
    /// requested; a mismatch marks the completion as stale.
    CueFinished { cue: Cue, generation: u64 },
}
