//! One refresh: run, segment, parse, prioritize, fingerprint.

use std::path::PathBuf;
use std::time::Instant;

use crate::config::Configuration;
use crate::parser::parse_block;
use crate::prioritize::Prioritizer;
use crate::runner::run_command;
use crate::segment::split_blocks;
use crate::settings::Settings;
use crate::types::{DiffRecord, PipelineResult};
use crate::Result;

/// Computes the change-detection fingerprint of raw command output.
pub fn fingerprint(raw: &[u8]) -> String {
    blake3::hash(raw).to_hex().to_string()
}

/// Parses raw diff text into unordered records, dropping blocks that are not
/// diffs.
pub fn parse_records(raw: &str) -> Vec<DiffRecord> {
    let blocks = split_blocks(raw);
    let total = blocks.len();
    let records: Vec<DiffRecord> = blocks
        .iter()
        .filter_map(|block| {
            let record = parse_block(block);
            if record.is_none() {
                let preview = block.lines().next().unwrap_or_default();
                tracing::warn!(%preview, "dropping block without a diff header");
            }
            record
        })
        .collect();
    tracing::debug!(blocks = total, records = records.len(), "segmented diff output");
    records
}

/// The full ingestion pipeline for one project.
///
/// Cheap to clone; every run re-reads the configuration file and re-runs the
/// command, nothing is cached between runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    command: String,
    working_directory: PathBuf,
    config_file: PathBuf,
}

impl Pipeline {
    /// Creates a pipeline from resolved settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            command: settings.diff_command.clone(),
            working_directory: settings.working_directory.clone(),
            config_file: settings.config_file.clone(),
        }
    }

    /// Runs the diff command and structures its output. Blocking.
    ///
    /// # Errors
    ///
    /// Propagates command failures and configuration errors; parse anomalies
    /// are recovered locally and never fail a run.
    pub fn run(&self) -> Result<PipelineResult> {
        let started = Instant::now();
        let output = run_command(&self.command, &self.working_directory)?;
        let config = Configuration::load(&self.config_file)?;
        let prioritizer = Prioritizer::new(&config)?;

        let records = prioritizer.prioritize(parse_records(&output.stdout_text()));
        let result = PipelineResult {
            fingerprint: fingerprint(&output.stdout),
            records,
            tags: config.tags,
        };
        tracing::debug!(
            files = result.records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline run finished"
        );
        Ok(result)
    }
}
