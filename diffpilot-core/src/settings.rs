//! Resolved runtime settings handed over by the bootstrap layer.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::default_config_path;
use crate::{Error, Result};

/// Default diff command when none is given.
pub const DEFAULT_DIFF_COMMAND: &str = "git diff --color=never";

/// Default refresh interval in seconds.
pub const DEFAULT_INTERVAL_SECS: f64 = 2.0;

/// Everything the pipeline and stream driver need, resolved once at startup
/// and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Shell command producing unified-diff text on stdout.
    pub diff_command: String,
    /// Directory the command runs in; also the project root.
    pub working_directory: PathBuf,
    /// Sleep between two polling ticks.
    pub refresh_interval: Duration,
    /// Presentation hint: dark or light palette.
    pub dark_mode: bool,
    /// Presentation hint: window or page title.
    pub window_title: String,
    /// Path of the file-group configuration, re-read on every run.
    pub config_file: PathBuf,
}

impl Settings {
    /// Builds settings for `working_directory` with defaults for everything
    /// else; the configuration file is looked up at the project root.
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        let working_directory = working_directory.into();
        Self {
            diff_command: DEFAULT_DIFF_COMMAND.to_owned(),
            config_file: default_config_path(&working_directory),
            working_directory,
            refresh_interval: Duration::from_secs_f64(DEFAULT_INTERVAL_SECS),
            dark_mode: true,
            window_title: "DiffPilot".to_owned(),
        }
    }

    /// Sets the refresh interval from fractional seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] unless `secs` is finite and positive.
    pub fn with_interval_secs(mut self, secs: f64) -> Result<Self> {
        self.refresh_interval = interval_from_secs(secs)?;
        Ok(self)
    }
}

/// Converts fractional seconds into a polling interval.
///
/// # Errors
///
/// Returns [`Error::InvalidInterval`] unless `secs` is finite and positive.
pub fn interval_from_secs(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Error::InvalidInterval(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| Error::InvalidInterval(secs))
}
