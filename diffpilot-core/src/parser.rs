//! Turns one segmented diff block into a [`DiffRecord`].
//!
//! Pure text transforms: no I/O, no allocation beyond the returned record.
//! Priority, tags and group title are left at their ungrouped defaults; the
//! prioritizer fills them in.

use crate::language::language_for;
use crate::segment::DIFF_MARKER;
use crate::types::{ChangeStatus, DiffRecord, UNGROUPED_PRIORITY, UNGROUPED_TITLE};

/// Parses one block, or returns `None` when its first line is not a diff marker.
pub fn parse_block(block: &str) -> Option<DiffRecord> {
    let first_line = block.lines().next()?;
    if !first_line.starts_with(DIFF_MARKER) {
        return None;
    }

    let filename = extract_filename(first_line);
    let language = language_for(&filename).to_owned();
    Some(DiffRecord {
        language,
        status: classify_status(block),
        content: delete_metadata(block).to_owned(),
        filename,
        priority: UNGROUPED_PRIORITY,
        tags: Vec::new(),
        group_title: UNGROUPED_TITLE.to_owned(),
        grouped: false,
    })
}

/// Takes the last whitespace-separated token of the header line and trims
/// leading `b/` prefixes from it.
///
/// Every leading `b/` is removed, so a path that itself begins with `b/`
/// loses that component too. Group globs are written against this form.
pub fn extract_filename(header: &str) -> String {
    header
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .trim_start_matches("b/")
        .to_owned()
}

/// Scans lines in order; the first of `new file mode`, `deleted file mode`
/// or a `@@` hunk header decides the status.
pub fn classify_status(block: &str) -> ChangeStatus {
    for line in block.lines() {
        if line.starts_with("new file mode") {
            return ChangeStatus::Added;
        }
        if line.starts_with("deleted file mode") {
            return ChangeStatus::Deleted;
        }
        if line.starts_with("@@") {
            break;
        }
    }
    ChangeStatus::Modified
}

/// Strips the file-header lines from a block.
///
/// Binary and `Only in` blocks have no hunk structure and are returned as-is.
/// Otherwise the body starts right after the first `+++` line, or at the first
/// `@@` line when no `+++` line exists. A block with neither is returned as-is.
pub fn delete_metadata(block: &str) -> &str {
    let is_special = block
        .lines()
        .any(|line| line.starts_with("Binary files") || line.starts_with("Only in"));
    if is_special {
        return block;
    }

    let mut offset = 0;
    let mut first_hunk = None;
    for line in block.split_inclusive('\n') {
        if line.starts_with("+++") {
            return &block[offset + line.len()..];
        }
        if first_hunk.is_none() && line.starts_with("@@") {
            first_hunk = Some(offset);
        }
        offset += line.len();
    }

    match first_hunk {
        Some(start) => &block[start..],
        None => block,
    }
}
