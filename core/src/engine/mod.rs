//! Timer engine
//!
//! This module provides:
//! - **Events**: user intents, clock ticks, and cue completions
//! - **Machine**: the state machine that owns the [`crate::session::Session`]
//!
//! All mutation funnels through [`TimerEngine::handle`]; the three event
//! sources (REPL task, ticker task, audio thread) feed one channel whose
//! single consumer applies events in arrival order, so no locking is needed.

mod event;
mod machine;

#[cfg(test)]
mod machine_tests;

pub use event::{EngineEvent, Intent};
pub use machine::{NextPhasePolicy, TimerEngine, always_pomodoro};
