//! Tracing setup for the binary: non-blocking file writer with a stderr fallback.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Log file name inside the logs directory.
pub const LOG_FILE_NAME: &str = "lisan.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Local wall-clock timestamps (`YYYY-MM-DDTHH:MM:SS`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LisanTimer;

impl FormatTime for LisanTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"))
    }
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// What: Install the global subscriber.
///
/// Inputs:
/// - `logs_dir`: Directory receiving `lisan.log`
/// - `default_level`: Level used when `RUST_LOG` is unset
///
/// Details:
/// - Falls back to stderr when the file cannot be opened
/// - Calling it twice is harmless; the second call is ignored
pub fn init(logs_dir: &Path, default_level: &str) {
    let log_path = logs_dir.join(LOG_FILE_NAME);
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter(default_level))
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(LisanTimer)
                .try_init()
                .is_ok();
            if installed {
                let _ = LOG_GUARD.set(guard);
                tracing::info!(path = %log_path.display(), "logging initialized");
            }
        }
        Err(e) => {
            if tracing_subscriber::fmt()
                .with_env_filter(filter(default_level))
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(LisanTimer)
                .try_init()
                .is_ok()
            {
                tracing::warn!(error = %e, path = %log_path.display(), "failed to open log file; using stderr");
            }
        }
    }
}
