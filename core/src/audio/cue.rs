//! Cue identifiers and their sound files.

use std::fmt;

/// A short audio notification tied to a timer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Pre-roll played between Start and the clock actually running.
    /// The only cue whose completion the engine waits on.
    StartingCountdown,
    FiveMinutesRemaining,
    OneMinuteRemaining,
    TimeIsUp,
}

impl Cue {
    /// Stable identifier used in logs and diagnostics.
    pub fn id(self) -> &'static str {
        match self {
            Cue::StartingCountdown => "starting-countdown",
            Cue::FiveMinutesRemaining => "five-minutes-remaining",
            Cue::OneMinuteRemaining => "one-minute-remaining",
            Cue::TimeIsUp => "time-is-up",
        }
    }

    /// File looked up in the sound directories.
    pub fn file_name(self) -> &'static str {
        match self {
            Cue::StartingCountdown => "starting_countdown.mp3",
            Cue::FiveMinutesRemaining => "5_mins_remaining.mp3",
            Cue::OneMinuteRemaining => "1_min_remaining.mp3",
            Cue::TimeIsUp => "time_is_up.mp3",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_files_line_up() {
        assert_eq!(Cue::StartingCountdown.id(), "starting-countdown");
        assert_eq!(Cue::StartingCountdown.file_name(), "starting_countdown.mp3");
        assert_eq!(Cue::FiveMinutesRemaining.file_name(), "5_mins_remaining.mp3");
        assert_eq!(Cue::OneMinuteRemaining.file_name(), "1_min_remaining.mp3");
        assert_eq!(Cue::TimeIsUp.file_name(), "time_is_up.mp3");
    }
}
