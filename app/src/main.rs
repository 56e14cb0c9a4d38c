//! tomata: a countdown-based pomodoro timer for the terminal.
//!
//! Wires the timer engine to its real collaborators: a tokio interval
//! ticker, the rodio audio service, and an optional MPRIS playback
//! controller, then hands control to the interactive loop.

mod logging;
mod repl;

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use tomata_core::{
    AppConfig, AudioService, EngineEvent, IntervalTicker, MprisController, PlaybackController,
    SessionSnapshot, TimerEngine,
};

/// Sounds shipped alongside the binary, used when the user directory has
/// no override for a cue.
const BUNDLED_SOUNDS_DIR: &str = "assets/sounds";

#[derive(Parser)]
#[command(version, about = "Countdown-based pomodoro timer with audio cues")]
struct Args {
    /// Directory searched first for cue sound files
    #[arg(long)]
    sounds_dir: Option<PathBuf>,

    /// MPRIS player to keep in sync with the timer (implies media sync)
    #[arg(long)]
    player: Option<String>,

    /// Disable external player synchronization
    #[arg(long)]
    no_media: bool,

    /// Cue volume, 0-100
    #[arg(long)]
    volume: Option<u8>,
}

#[tokio::main]
async fn main() {
    let _log_guard = logging::init();
    let args = Args::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "using default configuration");
            AppConfig::default()
        }
    };
    if let Some(dir) = args.sounds_dir {
        config.sounds_dir = Some(dir);
    }
    if let Some(player) = args.player {
        config.media.player = player;
        config.media.enabled = true;
    }
    if args.no_media {
        config.media.enabled = false;
    }
    if let Some(volume) = args.volume {
        config.volume = volume.min(100);
    }

    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let audio = AudioService::spawn(
        events_tx.clone(),
        config.user_sounds_dir(),
        PathBuf::from(BUNDLED_SOUNDS_DIR),
        config.volume,
    );
    let ticker = IntervalTicker::new(events_tx.clone());
    let engine = TimerEngine::new(Box::new(ticker), Box::new(audio), build_media(&config));

    let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
    let engine_task = tokio::spawn(run_engine(engine, events_rx, snapshot_tx));

    info!("timer ready");
    repl::run(events_tx, snapshot_rx).await;

    engine_task.abort();
    info!("shutting down");
}

fn build_media(config: &AppConfig) -> Option<Box<dyn PlaybackController + Send>> {
    if !config.media.enabled {
        return None;
    }
    match MprisController::new(&config.media.player) {
        Ok(controller) => Some(Box::new(controller)),
        Err(err) => {
            // Bad identifiers stop at this boundary; the timer runs without
            // media sync.
            warn!(error = %err, "media sync disabled");
            None
        }
    }
}

/// Single consumer of all engine events; publishes a fresh snapshot after
/// every applied event.
async fn run_engine(
    mut engine: TimerEngine,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
) {
    while let Some(event) = events.recv().await {
        engine.handle(event);
        let _ = snapshots.send(engine.snapshot());
    }
}
