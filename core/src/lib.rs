pub mod audio;
pub mod config;
pub mod engine;
pub mod media;
pub mod session;
pub mod ticker;

// Re-exports for convenience
pub use audio::{AudioHandle, AudioService, Cue, CueSink};
pub use config::{AppConfig, ConfigError, MediaSettings};
pub use engine::{EngineEvent, Intent, TimerEngine, always_pomodoro};
pub use media::{MediaError, MprisController, PlaybackController};
pub use session::{
    ControlAvailability, Phase, RunState, Session, SessionSnapshot, format_mmss,
};
pub use ticker::{IntervalTicker, TickSource};
