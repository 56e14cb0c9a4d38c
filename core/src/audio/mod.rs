//! Audio cue playback
//!
//! Cues are advisory notifications tied to timer events. They are never
//! load-bearing: a missing file or absent output device degrades to a
//! logged warning, and completion is still reported so the pre-roll can
//! never wedge the state machine.

mod cue;
mod error;
mod service;

pub use cue::Cue;
pub use error::AudioError;
pub use service::{AudioHandle, AudioService};

/// Engine-facing sink for cue playback.
///
/// Starting a new cue implicitly stops the previous one (last-writer-wins,
/// no queueing). `stop` rewinds and suppresses the completion notification
/// of whatever was playing; stopping when idle is a no-op.
pub trait CueSink {
    fn play(&mut self, cue: Cue, generation: u64);
    fn stop(&mut self);
}
