//! Orders records by the configured file groups.
//!
//! Groups are tried in declaration order and the first group with a matching
//! pattern wins, regardless of its numeric priority. Records are then sorted by
//! `(priority, filename)`, which is a total order, so identical inputs always
//! produce identical output.

use std::borrow::Cow;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::{Configuration, FileGroup};
use crate::types::{DiffRecord, UNGROUPED_PRIORITY, UNGROUPED_TITLE};
use crate::{Error, Result};

struct CompiledGroup {
    matcher: GlobSet,
    priority: i64,
    title: String,
    tags: Vec<String>,
}

/// File groups compiled into glob matchers.
pub struct Prioritizer {
    groups: Vec<CompiledGroup>,
}

impl Prioritizer {
    /// Compiles every group of `config`.
    ///
    /// Patterns use fnmatch semantics: `*` and `?` also match `/`, and
    /// `[...]` / `[!...]` classes are supported. Braces and backslashes are
    /// ordinary characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGlob`] for the first pattern that fails to
    /// compile. No group is ever skipped silently.
    pub fn new(config: &Configuration) -> Result<Self> {
        let groups = config
            .file_groups
            .iter()
            .enumerate()
            .map(|(index, group)| compile_group(index, group))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { groups })
    }

    /// Copies the first matching group's priority, tags and title onto each
    /// record and returns the records in display order.
    pub fn prioritize(&self, records: Vec<DiffRecord>) -> Vec<DiffRecord> {
        let mut records: Vec<DiffRecord> =
            records.into_iter().map(|record| self.assign(record)).collect();
        records.sort_by(|a, b| {
            a.is_ungrouped()
                .cmp(&b.is_ungrouped())
                .then_with(|| a.priority.cmp(&b.priority))
                .then_with(|| a.filename.cmp(&b.filename))
        });
        records
    }

    fn assign(&self, mut record: DiffRecord) -> DiffRecord {
        match self.groups.iter().find(|g| g.matcher.is_match(&record.filename)) {
            Some(group) => {
                record.priority = group.priority;
                record.tags = group.tags.clone();
                record.group_title = group.title.clone();
                record.grouped = true;
            }
            None => {
                record.priority = UNGROUPED_PRIORITY;
                record.tags = Vec::new();
                record.group_title = UNGROUPED_TITLE.to_owned();
                record.grouped = false;
            }
        }
        record
    }
}

fn compile_group(index: usize, group: &FileGroup) -> Result<CompiledGroup> {
    let mut builder = GlobSetBuilder::new();
    for pattern in group.glob.patterns() {
        let glob = GlobBuilder::new(&literal_braces(pattern))
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map_err(|source| Error::InvalidGlob {
                group: index,
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    let matcher = builder.build().map_err(|source| Error::InvalidGlob {
        group: index,
        pattern: group.glob.patterns().join(", "),
        source,
    })?;
    Ok(CompiledGroup {
        matcher,
        priority: group.priority,
        title: group.title.clone(),
        tags: group.tags.clone(),
    })
}

/// Rewrites `{` and `}` outside character classes as one-character classes so
/// globset does not read them as alternation.
fn literal_braces(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}']) {
        return Cow::Borrowed(pattern);
    }
    let mut out = String::with_capacity(pattern.len() + 8);
    // Characters consumed inside the open class, if any.
    let mut class: Option<usize> = None;
    let mut negated = false;
    for c in pattern.chars() {
        match class {
            Some(n) => {
                out.push(c);
                // `]` right after `[` or `[!` is a member, not the end.
                let leading = n == 0 || (n == 1 && negated);
                if c == ']' && !leading {
                    class = None;
                } else {
                    if n == 0 && c == '!' {
                        negated = true;
                    }
                    class = Some(n + 1);
                }
            }
            None => match c {
                '[' => {
                    out.push(c);
                    class = Some(0);
                    negated = false;
                }
                '{' => out.push_str("[{]"),
                '}' => out.push_str("[}]"),
                _ => out.push(c),
            },
        }
    }
    Cow::Owned(out)
}
