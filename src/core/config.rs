//! Document configuration

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::file_system::read_file;
use crate::error::{JsonWrapError, Result};

/// How a document is written back to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Spaces per nesting level
    pub indent: usize,
    /// Write through a temporary file renamed over the target
    pub atomic_commit: bool,
    /// Append a newline after the closing brace
    pub trailing_newline: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            atomic_commit: false,
            trailing_newline: false,
        }
    }
}

impl DocumentConfig {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        serde_json::from_str(&content).map_err(|source| JsonWrapError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_atomic_commit(mut self, atomic: bool) -> Self {
        self.atomic_commit = atomic;
        self
    }

    pub fn with_trailing_newline(mut self, newline: bool) -> Self {
        self.trailing_newline = newline;
        self
    }

    /// Path of `file_name` inside the per-user config directory of an application
    pub fn app_data_path(
        qualifier: &str,
        organization: &str,
        application: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        ProjectDirs::from(qualifier, organization, application)
            .map(|dirs| dirs.config_dir().join(file_name))
            .ok_or_else(|| JsonWrapError::Initialization {
                path: PathBuf::from(application).join(file_name),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine config directory",
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_commit_format() {
        let config = DocumentConfig::default();
        assert_eq!(config.indent, 4);
        assert!(!config.atomic_commit);
        assert!(!config.trailing_newline);
    }

    #[test]
    fn load_fills_missing_fields() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("jsonwrap.json");
        std::fs::write(&path, b"{\"atomic_commit\": true}").unwrap();

        let config = DocumentConfig::load(&path).unwrap();
        assert_eq!(config, DocumentConfig::default().with_atomic_commit(true));
    }

    #[test]
    fn load_rejects_malformed_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("jsonwrap.json");
        std::fs::write(&path, b"{\"indent\": \"four\"}").unwrap();

        assert!(matches!(
            DocumentConfig::load(&path),
            Err(JsonWrapError::Parse { .. })
        ));
    }
}
