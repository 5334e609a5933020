//! Command-line flags and their resolution into core [`Settings`].

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use diffpilot_core::settings::{interval_from_secs, Settings, DEFAULT_DIFF_COMMAND};
use diffpilot_core::stream::InitialRender;

/// Live, grouped view of a git diff that refreshes as the working tree changes.
///
/// Files are grouped and ordered by the `diffpilot.toml` file at the project
/// root; every group lists glob patterns, a priority, a title, and tags.
#[derive(Debug, Parser)]
#[command(name = "diffpilot", version)]
pub struct Cli {
    /// Path to the git project
    #[arg(default_value = ".")]
    pub git_project_path: PathBuf,

    /// Refresh interval in seconds, can be fractional
    #[arg(short = 'n', long, default_value_t = 2.0, value_parser = parse_interval)]
    pub interval: f64,

    /// Dark or light palette
    #[arg(long, value_enum, default_value_t = Toggle::On)]
    pub dark_mode: Toggle,

    /// With dark mode: use the 16 ANSI colors, for terminals without truecolor
    #[arg(long)]
    pub ansi: bool,

    /// Command producing the diff, e.g. "git diff --cached" or "git diff main...HEAD"
    #[arg(long, default_value = DEFAULT_DIFF_COMMAND)]
    pub diff_command: String,

    /// Window title
    #[arg(long, default_value = "DiffPilot")]
    pub title: String,

    /// Group configuration file [default: <GIT_PROJECT_PATH>/diffpilot.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print updates as JSON lines on stdout instead of opening the terminal view
    #[arg(long)]
    pub json: bool,

    /// With --json: skip the initial snapshot and only print changes
    #[arg(long, requires = "json")]
    pub changes_only: bool,

    /// Log file for the terminal view [default: $XDG_STATE_HOME/diffpilot/diffpilot.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Cli {
    /// Validates the project path and builds the settings bundle.
    ///
    /// Exits through clap's error reporting when the path does not exist or
    /// is not a git repository.
    pub fn settings(&self) -> Settings {
        let root = &self.git_project_path;
        if !root.exists() {
            fail(format!("path does not exist: {}", root.display()));
        }
        if !root.join(".git").is_dir() {
            fail(format!("not a git repository: {}", root.display()));
        }
        let root = std::path::absolute(root).unwrap_or_else(|_| root.clone());

        let mut settings = Settings::new(root);
        settings.diff_command = self.diff_command.clone();
        settings.dark_mode = self.dark_mode == Toggle::On;
        settings.window_title = self.title.clone();
        if let Some(config) = &self.config {
            settings.config_file = config.clone();
        }
        match settings.with_interval_secs(self.interval) {
            Ok(settings) => settings,
            Err(e) => fail(e.to_string()),
        }
    }

    /// Connect behaviour for the JSON feed.
    pub fn initial_render(&self) -> InitialRender {
        if self.changes_only {
            InitialRender::Deferred
        } else {
            InitialRender::Immediate
        }
    }
}

fn parse_interval(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    interval_from_secs(secs).map_err(|e| e.to_string())?;
    Ok(secs)
}

fn fail(message: String) -> ! {
    Cli::command().error(ErrorKind::ValueValidation, message).exit()
}
