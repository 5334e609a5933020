//! Core library for diffpilot's live diff view.
//!
//! The crate turns the text output of an external diff command into an ordered
//! list of per-file records and keeps a live client up to date:
//! - `runner` executes the diff command in the project directory
//! - `segment` and `parser` split the raw output into per-file [`types::DiffRecord`]s
//! - `config` and `prioritize` order the records by user-defined file groups
//! - `pipeline` ties one refresh together and fingerprints the raw output
//! - `stream` re-runs the pipeline on a timer and pushes only real changes

pub mod config;
pub mod language;
pub mod parser;
pub mod pipeline;
pub mod prioritize;
pub mod runner;
pub mod segment;
pub mod settings;
pub mod stream;
pub mod types;

use std::path::PathBuf;

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail-fast errors surfaced by the core library.
///
/// Degraded-but-expected situations (a block that is not a diff, a project
/// without a configuration file) are not represented here; they are handled
/// locally with `Option` and default values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The diff command exited unsuccessfully.
    #[error("command `{command}` failed with {}: {stderr}", exit_label(*code))]
    CommandFailed {
        /// Shell command string that was run.
        command: String,
        /// Exit code, `None` when the process was terminated by a signal.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// The shell for the diff command could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Shell command string that was run.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML or violates the schema.
    #[error("malformed configuration in {}: {reason}", path.display())]
    MalformedConfiguration {
        /// Configuration file path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
    /// A file group carries a pattern that is not a valid shell glob.
    #[error("file group #{group} has invalid glob `{pattern}`: {source}")]
    InvalidGlob {
        /// Zero-based index of the group in declaration order.
        group: usize,
        /// The offending pattern.
        pattern: String,
        /// Glob compiler error.
        #[source]
        source: globset::Error,
    },
    /// The refresh interval is not a positive, finite number of seconds.
    #[error("refresh interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),
    /// The background worker running a pipeline panicked or was cancelled.
    #[error("pipeline worker failed: {0}")]
    Worker(String),
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_owned(),
    }
}
