//! File-group configuration (`diffpilot.toml`).
//!
//! A [`Configuration`] is an immutable snapshot read fresh on every pipeline
//! run, so edits to the file take effect on the next refresh. A project
//! without the file behaves as if it declared no groups and no tags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the configuration file looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "diffpilot.toml";

/// One or more shell-glob patterns.
///
/// Accepts either `glob = "*.py"` or `glob = ["*.py", "*.pyi"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GlobSpec {
    One(String),
    Many(Vec<String>),
}

impl GlobSpec {
    /// Patterns in declaration order.
    pub fn patterns(&self) -> &[String] {
        match self {
            GlobSpec::One(pattern) => std::slice::from_ref(pattern),
            GlobSpec::Many(patterns) => patterns,
        }
    }
}

/// One prioritization rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileGroup {
    pub glob: GlobSpec,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Presentation style for one tag.
///
/// Colors are passed through untouched; `"#rrggbb"` and color names are
/// what the bundled terminal view understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TagStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// Parsed `diffpilot.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Configuration {
    /// Groups in declaration order; the first match wins.
    #[serde(default)]
    pub file_groups: Vec<FileGroup>,
    /// Tag id to style.
    #[serde(default)]
    pub tags: BTreeMap<String, TagStyle>,
}

impl Configuration {
    /// Parses a configuration from TOML text.
    ///
    /// `path` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedConfiguration`] when the text is not valid TOML
    /// or a group lacks its `glob` field.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::MalformedConfiguration {
            path: path.to_path_buf(),
            reason: e.message().to_owned(),
        })
    }

    /// Loads the configuration at `path`.
    ///
    /// A missing file is not an error: it yields the empty configuration, in
    /// which every file is ungrouped and ordered by filename alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the file exists but cannot be read and
    /// [`Error::MalformedConfiguration`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead { path: path.to_path_buf(), source });
            }
        };
        Self::from_toml(&text, path)
    }
}

/// Default configuration path for a project root.
pub fn default_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_accepts_string_or_list() {
        let text = r#"
            [[file_groups]]
            glob = "*.py"

            [[file_groups]]
            glob = ["*.md", "docs/*"]
            priority = 2
            title = "Docs"
            tags = ["docs"]
        "#;
        let config = Configuration::from_toml(text, Path::new("diffpilot.toml")).unwrap();
        assert_eq!(config.file_groups.len(), 2);
        assert_eq!(config.file_groups[0].glob.patterns(), ["*.py".to_owned()]);
        assert_eq!(config.file_groups[0].priority, 0);
        assert_eq!(config.file_groups[0].title, "");
        assert_eq!(config.file_groups[1].glob.patterns().len(), 2);
        assert_eq!(config.file_groups[1].tags, vec!["docs".to_owned()]);
    }

    #[test]
    fn group_without_glob_is_malformed() {
        let text = "[[file_groups]]\npriority = 1\n";
        let err = Configuration::from_toml(text, Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, Error::MalformedConfiguration { .. }));
    }
}
