//! Runs the external diff command.
//!
//! The working directory is passed straight to the spawned process, so the
//! process-wide current directory is never touched and concurrent runs
//! against different projects need no coordination.

use std::path::Path;
use std::process::{Command, Output};

use crate::{Error, Result};

/// Captured output of a successful command run.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Raw standard output bytes. Empty output is a valid "no changes" result.
    pub stdout: Vec<u8>,
    /// Standard error text; non-empty output here is logged, not fatal.
    pub stderr: String,
}

impl CommandOutput {
    /// Standard output as text, replacing invalid UTF-8 sequences.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Runs `command` through the platform shell inside `working_dir`.
///
/// This call blocks until the command exits; async callers should run it on a
/// blocking worker.
///
/// # Errors
///
/// Returns [`Error::Spawn`] if the shell cannot be started and
/// [`Error::CommandFailed`] if the command exits unsuccessfully. Standard
/// error output alone never makes a run fail.
pub fn run_command(command: &str, working_dir: &Path) -> Result<CommandOutput> {
    let output = shell(command)
        .current_dir(working_dir)
        .output()
        .map_err(|source| Error::Spawn { command: command.to_owned(), source })?;
    classify(command, output)
}

fn classify(command: &str, output: Output) -> Result<CommandOutput> {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();

    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: command.to_owned(),
            code: output.status.code(),
            stderr,
        });
    }
    if !stderr.is_empty() {
        tracing::warn!(command, %stderr, "diff command wrote to stderr");
    }
    Ok(CommandOutput { stdout: output.stdout, stderr })
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
