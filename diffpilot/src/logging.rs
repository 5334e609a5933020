//! Tracing subscriber setup.
//!
//! The terminal view owns stderr, so it logs to a file. The JSON feed owns
//! stdout and logs to stderr. Verbosity comes from `DIFFPILOT_LOG` using
//! `EnvFilter` syntax and defaults to `info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const FILTER_ENV: &str = "DIFFPILOT_LOG";

/// Returns the default log file path.
///
/// Prefers `$XDG_STATE_HOME/diffpilot/diffpilot.log`; falls back to
/// `~/.local/state/diffpilot/diffpilot.log` when the env var is absent.
pub fn default_log_path() -> PathBuf {
    let base = std::env::var("XDG_STATE_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".local").join("state"))
        })
        .unwrap_or_else(|| PathBuf::from(".local/state"));
    base.join("diffpilot").join("diffpilot.log")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Appends log lines to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns `Err` if the file cannot be opened or a global subscriber is
/// already installed.
pub fn init_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(std::io::Error::other)
}

/// Logs to stderr.
///
/// # Errors
///
/// Returns `Err` if a global subscriber is already installed.
pub fn init_stderr() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(std::io::Error::other)
}
