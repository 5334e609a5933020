//! Owned data types produced by one pipeline run.
//!
//! Everything here is rebuilt from scratch on every refresh; records are
//! replaced wholesale, never patched in place. All types are `Send` so they
//! can travel from the blocking worker back to the async stream driver.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::TagStyle;

/// Group title given to records that match no configured file group.
pub const UNGROUPED_TITLE: &str = "Ungrouped";

/// Priority reported for records that match no configured file group.
///
/// A group may use the same value, so ordering relies on
/// [`DiffRecord::grouped`] rather than on this number.
pub const UNGROUPED_PRIORITY: i64 = i64::MAX;

/// How a file changed, as reported by the diff header lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// `new file mode` header present.
    Added,
    /// Default when no unambiguous signal is found.
    #[default]
    Modified,
    /// `deleted file mode` header present.
    Deleted,
}

impl ChangeStatus {
    /// Single-letter badge used by list views.
    pub fn badge(self) -> char {
        match self {
            ChangeStatus::Added => 'A',
            ChangeStatus::Modified => 'M',
            ChangeStatus::Deleted => 'D',
        }
    }
}

/// One changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    pub filename: String,     // repository-relative path from the diff header
    pub language: String,     // highlighting hint, `diff` when unknown
    pub status: ChangeStatus,
    pub content: String,      // diff body with header metadata stripped
    pub priority: i64,        // assigned by the prioritizer, lower sorts first
    pub tags: Vec<String>,    // assigned by the prioritizer
    pub group_title: String,  // assigned by the prioritizer
    pub grouped: bool,        // true once a configured group matched
}

impl DiffRecord {
    /// Returns `true` when the record fell through every configured group.
    pub fn is_ungrouped(&self) -> bool {
        !self.grouped
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// blake3 hex digest of the raw, unsegmented command output.
    pub fingerprint: String,
    /// Records in final display order.
    pub records: Vec<DiffRecord>,
    /// Tag style dictionary from the configuration loaded for this run.
    pub tags: BTreeMap<String, TagStyle>,
}
