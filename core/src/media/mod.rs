//! External playback synchronization.
//!
//! The timer keeps an external media stream in step with its running
//! state: resume on entering `Running`, pause on leaving it and at phase
//! end. The controller is an optional collaborator with an infallible
//! surface; every failure is logged and swallowed.

use std::process::Command;

use thiserror::Error;
use tracing::{debug, warn};

/// Play/pause control over a synchronized external media stream.
pub trait PlaybackController {
    fn resume(&mut self);
    fn pause(&mut self);
}

/// Errors constructing a playback controller.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid player name {name:?}: only alphanumerics, '.', '_' and '-' are allowed")]
    InvalidPlayerName { name: String },
}

/// Drives a desktop media player over MPRIS by shelling out to `playerctl`.
///
/// The player name is validated here, at the collaborator boundary; the
/// engine never sees or validates player identifiers.
pub struct MprisController {
    player: String,
}

impl MprisController {
    pub fn new(player: &str) -> Result<Self, MediaError> {
        let valid = !player.is_empty()
            && player
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(MediaError::InvalidPlayerName {
                name: player.to_string(),
            });
        }
        Ok(Self {
            player: player.to_string(),
        })
    }

    fn send(&self, action: &'static str) {
        let player = self.player.clone();
        // playerctl blocks until the player answers; keep it off the
        // engine's thread.
        std::thread::spawn(move || {
            match Command::new("playerctl")
                .arg(format!("--player={player}"))
                .arg(action)
                .output()
            {
                Ok(out) if out.status.success() => {
                    debug!(%player, action, "playerctl dispatched");
                }
                Ok(out) => {
                    warn!(%player, action, status = %out.status, "playerctl refused command");
                }
                Err(err) => {
                    warn!(%player, action, error = %err, "playerctl unavailable");
                }
            }
        });
    }
}

impl PlaybackController for MprisController {
    fn resume(&mut self) {
        self.send("play");
    }

    fn pause(&mut self) {
        self.send("pause");
    }
}
