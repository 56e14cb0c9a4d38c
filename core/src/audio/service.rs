//! Cue playback service on a dedicated thread.
//!
//! The rodio output stream is not `Send`, so the service owns it on its
//! own thread and takes commands over a channel. Natural completion is
//! detected by polling the sink between receives and reported back into
//! the engine channel as a [`EngineEvent::CueFinished`].

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::engine::EngineEvent;

use super::{AudioError, Cue, CueSink};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum AudioCommand {
    Play { cue: Cue, generation: u64 },
    Stop,
}

/// Command side of the audio service, handed to the engine.
#[derive(Clone)]
pub struct AudioHandle {
    commands: Sender<AudioCommand>,
    events: UnboundedSender<EngineEvent>,
}

impl CueSink for AudioHandle {
    fn play(&mut self, cue: Cue, generation: u64) {
        if self.commands.send(AudioCommand::Play { cue, generation }).is_err() {
            // Service thread is gone. Report completion anyway so a cue
            // the engine is waiting on cannot wedge it.
            warn!(%cue, "audio service unavailable, cue skipped");
            let _ = self
                .events
                .send(EngineEvent::CueFinished { cue, generation });
        }
    }

    fn stop(&mut self) {
        let _ = self.commands.send(AudioCommand::Stop);
    }
}

struct PlayingCue {
    cue: Cue,
    generation: u64,
    sink: Sink,
}

/// Plays cue files through the default output device.
///
/// Sound files are resolved against the user directory first, then the
/// bundled one.
pub struct AudioService {
    commands: Receiver<AudioCommand>,
    events: UnboundedSender<EngineEvent>,
    user_sounds_dir: PathBuf,
    bundled_sounds_dir: PathBuf,
    /// 0-100
    volume: u8,
}

impl AudioService {
    /// Spawn the service on its own thread and return the engine-facing
    /// handle.
    pub fn spawn(
        events: UnboundedSender<EngineEvent>,
        user_sounds_dir: PathBuf,
        bundled_sounds_dir: PathBuf,
        volume: u8,
    ) -> AudioHandle {
        let (tx, rx) = mpsc::channel();
        let service = Self {
            commands: rx,
            events: events.clone(),
            user_sounds_dir,
            bundled_sounds_dir,
            volume: volume.min(100),
        };

        let spawned = std::thread::Builder::new()
            .name("tomata-audio".into())
            .spawn(move || service.run());
        if let Err(err) = spawned {
            warn!(error = %err, "failed to spawn audio thread, cues disabled");
        }

        AudioHandle {
            commands: tx,
            events,
        }
    }

    fn run(self) {
        match OutputStream::try_default() {
            Ok((_stream, handle)) => self.pump(&handle),
            Err(err) => {
                warn!(error = %err, "no audio output device, cues disabled");
                self.pump_silent();
            }
        }
    }

    fn pump(self, output: &OutputStreamHandle) {
        let mut playing: Option<PlayingCue> = None;
        loop {
            match self.commands.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCommand::Play { cue, generation }) => {
                    // Last-writer-wins: a new cue silences the previous one,
                    // and the stopped cue never reports completion.
                    if let Some(prev) = playing.take() {
                        prev.sink.stop();
                    }
                    match self.start_cue(cue, output) {
                        Ok(sink) => {
                            debug!(%cue, "cue playing");
                            playing = Some(PlayingCue {
                                cue,
                                generation,
                                sink,
                            });
                        }
                        Err(err) => {
                            // Cues are advisory: log and report completion
                            // as though it had played.
                            warn!(%cue, error = %err, "cue playback failed");
                            self.notify_finished(cue, generation);
                        }
                    }
                }
                Ok(AudioCommand::Stop) => {
                    if let Some(prev) = playing.take() {
                        prev.sink.stop();
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let finished = playing.as_ref().is_some_and(|p| p.sink.empty());
                    if finished && let Some(done) = playing.take() {
                        debug!(cue = %done.cue, "cue finished");
                        self.notify_finished(done.cue, done.generation);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    /// Degraded loop when no output device exists: every play completes
    /// immediately so the timer keeps working.
    fn pump_silent(self) {
        while let Ok(command) = self.commands.recv() {
            if let AudioCommand::Play { cue, generation } = command {
                self.notify_finished(cue, generation);
            }
        }
    }

    fn start_cue(&self, cue: Cue, output: &OutputStreamHandle) -> Result<Sink, AudioError> {
        let path = self.resolve(cue)?;
        let file = File::open(&path).map_err(|source| AudioError::OpenFile {
            path: path.clone(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: path.clone(),
            source,
        })?;
        let sink = Sink::try_new(output).map_err(AudioError::Sink)?;
        sink.set_volume(f32::from(self.volume) / 100.0);
        sink.append(source);
        Ok(sink)
    }

    fn resolve(&self, cue: Cue) -> Result<PathBuf, AudioError> {
        let user = self.user_sounds_dir.join(cue.file_name());
        if user.exists() {
            return Ok(user);
        }
        let bundled = self.bundled_sounds_dir.join(cue.file_name());
        if bundled.exists() {
            return Ok(bundled);
        }
        Err(AudioError::MissingCue {
            file: cue.file_name(),
        })
    }

    fn notify_finished(&self, cue: Cue, generation: u64) {
        let _ = self
            .events
            .send(EngineEvent::CueFinished { cue, generation });
    }
}
