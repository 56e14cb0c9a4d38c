//! Error types for cue playback

use std::path::PathBuf;

use thiserror::Error;

/// Errors while resolving or starting a cue. Diagnostic only: the caller
/// logs these and proceeds as though the cue had played.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no sound file named {file} in the sound directories")]
    MissingCue { file: &'static str },

    #[error("failed to open sound file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode sound file {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("failed to create playback sink")]
    Sink(#[source] rodio::PlayError),
}
