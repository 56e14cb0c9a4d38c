//! Application configuration, confy-backed TOML.
//!
//! Phase durations are deliberately not configurable; only ambient
//! concerns (sounds, volume, media sync) live here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_NAME: &str = "tomata";

fn default_volume() -> u8 {
    100
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),
}

/// External player synchronization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaSettings {
    /// Keep an external player in sync with the timer.
    #[serde(default)]
    pub enabled: bool,

    /// MPRIS player name handed to playerctl.
    #[serde(default)]
    pub player: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Overrides the default user sound directory when set.
    #[serde(default)]
    pub sounds_dir: Option<PathBuf>,

    /// Cue volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default)]
    pub media: MediaSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sounds_dir: None,
            volume: default_volume(),
            media: MediaSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    /// User sound directory: the configured override, else
    /// `<config>/tomata/sounds`.
    pub fn user_sounds_dir(&self) -> PathBuf {
        if let Some(dir) = &self.sounds_dir {
            return dir.clone();
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join("sounds"))
            .unwrap_or_else(|| PathBuf::from("sounds"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_media_off_at_full_volume() {
        let config = AppConfig::default();
        assert_eq!(config.volume, 100);
        assert!(!config.media.enabled);
        assert!(config.media.player.is_empty());
        assert!(config.sounds_dir.is_none());
    }

    #[test]
    fn explicit_sounds_dir_wins() {
        let config = AppConfig {
            sounds_dir: Some(PathBuf::from("/tmp/cues")),
            ..AppConfig::default()
        };
        assert_eq!(config.user_sounds_dir(), PathBuf::from("/tmp/cues"));
    }
}
