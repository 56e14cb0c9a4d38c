//! Interactive command loop.
//!
//! Reads one command per line from stdin and forwards intents to the
//! engine. The loop only forwards intents the current snapshot exposes:
//! that disabled-control guard is what keeps "start while running" and
//! "reset while counting down" unreachable, exactly like greying out a
//! button.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;

use tomata_core::{ControlAvailability, EngineEvent, Intent, SessionSnapshot};

/// How long to wait for the engine to apply an intent before redrawing.
const ECHO_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(version, about = "timer commands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the timer (fresh phases play a pre-roll cue first)
    Start,
    /// Pause a running timer, keeping elapsed progress
    Pause,
    /// Cancel the pre-roll countdown
    Cancel,
    /// Reset to a full fresh session
    Reset,
    /// Show the current session
    Status,
    Exit,
}

pub async fn run(
    events: UnboundedSender<EngineEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
) {
    print_status(&snapshots.borrow());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match respond(line, &events, &snapshots).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => println!("{err}"),
        }
    }
}

async fn respond(
    line: &str,
    events: &UnboundedSender<EngineEvent>,
    snapshots: &watch::Receiver<SessionSnapshot>,
) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: invalid quoting")?;
    args.insert(0, "tomata".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let intent = match cli.command {
        Some(Commands::Start) => Some(Intent::Start),
        Some(Commands::Pause) => Some(Intent::Pause),
        Some(Commands::Cancel) => Some(Intent::Cancel),
        Some(Commands::Reset) => Some(Intent::Reset),
        Some(Commands::Status) => {
            print_status(&snapshots.borrow());
            None
        }
        Some(Commands::Exit) => return Ok(true),
        None => None,
    };

    if let Some(intent) = intent {
        if !allowed(intent, &snapshots.borrow().controls) {
            println!("{} is not available right now", name(intent));
            return Ok(false);
        }
        events
            .send(EngineEvent::Intent(intent))
            .map_err(|e| e.to_string())?;

        // Give the engine a beat to apply the intent, then redraw.
        let mut changed = snapshots.clone();
        let _ = tokio::time::timeout(ECHO_TIMEOUT, changed.changed()).await;
        print_status(&changed.borrow());
    }
    Ok(false)
}

fn allowed(intent: Intent, controls: &ControlAvailability) -> bool {
    match intent {
        Intent::Start => controls.start_shown,
        Intent::Pause => controls.pause_shown,
        Intent::Cancel => controls.cancel_shown,
        Intent::Reset => controls.reset_enabled,
    }
}

fn name(intent: Intent) -> &'static str {
    match intent {
        Intent::Start => "start",
        Intent::Pause => "pause",
        Intent::Cancel => "cancel",
        Intent::Reset => "reset",
    }
}

fn print_status(snap: &SessionSnapshot) {
    let mut controls = Vec::new();
    if snap.controls.start_shown {
        controls.push("start");
    }
    if snap.controls.pause_shown {
        controls.push("pause");
    }
    if snap.controls.cancel_shown {
        controls.push("cancel");
    }
    if snap.controls.reset_enabled {
        controls.push("reset");
    }
    println!(
        "{} {}  pomodoros completed: {}  [{}]",
        snap.phase,
        snap.time_display,
        snap.completed_pomodoros,
        controls.join(", ")
    );
}
