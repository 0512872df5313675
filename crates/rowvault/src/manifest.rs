//! Backup manifest: which artifact holds which table.
//!
//! One manifest per backup operation. Tables skipped during the backup have
//! no entry, which is how a restore (or an operator) can tell a skipped
//! table from an empty one. Saved as pretty JSON with an atomic
//! write-then-rename, so a crashed save never leaves a truncated manifest.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Artifact name for a table, with the optional backup suffix applied.
#[must_use]
pub fn artifact_name(table: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{}.{}", table, suffix),
        None => table.to_string(),
    }
}

/// Table-to-artifact mapping for one backup operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    /// When the backup was started.
    pub created_at: DateTime<Utc>,

    /// Caller-supplied suffix keying this backup, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Table name to artifact name, sorted for stable output.
    pub artifacts: BTreeMap<String, String>,
}

impl BackupManifest {
    /// Create an empty manifest for a backup starting now.
    pub fn new(suffix: Option<String>) -> Self {
        Self {
            created_at: Utc::now(),
            suffix,
            artifacts: BTreeMap::new(),
        }
    }

    /// Record the artifact written for `table`.
    pub fn record(&mut self, table: impl Into<String>, artifact: impl Into<String>) {
        self.artifacts.insert(table.into(), artifact.into());
    }

    /// Artifact name for `table`, if the backup produced one.
    #[must_use]
    pub fn artifact_for(&self, table: &str) -> Option<&str> {
        self.artifacts.get(table).map(String::as_str)
    }

    /// Whether the backup produced an artifact for `table`.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.artifacts.contains_key(table)
    }

    /// Number of artifacts in the manifest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the manifest records no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Save as pretty JSON (atomic write: temp file, then rename).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Load a manifest from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_artifact_name_with_and_without_suffix() {
        assert_eq!(artifact_name("people", None), "people");
        assert_eq!(artifact_name("people", Some("v3")), "people.v3");
    }

    #[test]
    fn test_record_and_lookup() {
        let mut manifest = BackupManifest::new(Some("v3".into()));
        assert!(manifest.is_empty());

        manifest.record("people", "people.v3");
        assert!(manifest.contains("people"));
        assert_eq!(manifest.artifact_for("people"), Some("people.v3"));
        assert_eq!(manifest.artifact_for("missing"), None);
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut manifest = BackupManifest::new(None);
        manifest.record("people", "people");
        manifest.record("orders", "orders");

        let file = NamedTempFile::new().unwrap();
        manifest.save(file.path()).unwrap();

        let loaded = BackupManifest::load(file.path()).unwrap();
        assert_eq!(loaded.suffix, None);
        assert_eq!(loaded.artifacts, manifest.artifacts);
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            manifest.created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_save_is_pretty_json() {
        let mut manifest = BackupManifest::new(None);
        manifest.record("people", "people");

        let file = NamedTempFile::new().unwrap();
        manifest.save(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains('\n'));
        assert!(content.contains("\"artifacts\""));
    }
}
