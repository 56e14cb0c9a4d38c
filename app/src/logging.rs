//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes to `~/.config/tomata/tomata.log` (or platform equivalent) so log
//! lines do not fight the interactive prompt for stdout. Falls back to
//! stdout-only logging if the log directory is unavailable. Filter with
//! `RUST_LOG` (default `info`).

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Initialize logging. The returned guard must be held for the process
/// lifetime so buffered lines are flushed on shutdown.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let Some(log_dir) = dirs::config_dir().map(|dir| dir.join("tomata")) else {
        init_stdout_only();
        return None;
    };

    if let Err(err) = std::fs::create_dir_all(&log_dir) {
        // Subscriber is not up yet.
        eprintln!(
            "failed to create log directory {}: {err}; logging to stdout",
            log_dir.display()
        );
        init_stdout_only();
        return None;
    }

    let appender = match BasicRollingFileAppender::new(
        log_dir.join("tomata.log"),
        RollingConditionBasic::new().max_size(MAX_LOG_SIZE),
        1,
    ) {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!("failed to open log file: {err}; logging to stdout");
            init_stdout_only();
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .init();
    Some(guard)
}

fn init_stdout_only() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true))
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
