//! Configuration loading and validation.
//!
//! A [`Config`] names the backup directory, the optional artifact suffix,
//! and the table selection for one backup/restore run. Loaded from YAML and
//! validated before use; runners accept it via
//! [`with_config`](crate::backup::BackupRunner::with_config).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Backup/restore run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the text artifacts and the manifest.
    pub backup_dir: PathBuf,

    /// Optional suffix appended to every artifact name, so multiple backups
    /// can coexist in one directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Tables to process. Empty means every registered table.
    #[serde(default)]
    pub include_tables: Vec<String>,

    /// Tables to leave out, applied after `include_tables`.
    #[serde(default)]
    pub exclude_tables: Vec<String>,

    /// File name of the manifest inside `backup_dir` (default:
    /// `manifest.json`).
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
}

fn default_manifest_name() -> String {
    "manifest.json".to_string()
}

impl Config {
    /// Create a configuration for `backup_dir` with defaults everywhere else.
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            suffix: None,
            include_tables: Vec::new(),
            exclude_tables: Vec::new(),
            manifest_name: default_manifest_name(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.backup_dir.as_os_str().is_empty() {
            return Err(VaultError::Config("backup_dir is required".into()));
        }
        if let Some(suffix) = &self.suffix {
            if suffix.is_empty() {
                return Err(VaultError::Config("suffix must not be empty".into()));
            }
            if suffix.contains(['/', '\\']) || suffix.chars().any(char::is_control) {
                return Err(VaultError::Config(format!(
                    "suffix {:?} contains path separators or control characters",
                    suffix
                )));
            }
        }
        if self.manifest_name.is_empty() {
            return Err(VaultError::Config("manifest_name must not be empty".into()));
        }
        for name in self.include_tables.iter().chain(&self.exclude_tables) {
            if name.is_empty() {
                return Err(VaultError::Config(
                    "table names in include/exclude lists must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// Whether `table` falls inside this run's selection.
    #[must_use]
    pub fn table_selected(&self, table: &str) -> bool {
        selection_allows(&self.include_tables, &self.exclude_tables, table)
    }

    /// Path of the manifest file inside the backup directory.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.backup_dir.join(&self.manifest_name)
    }
}

/// Include/exclude policy, shared with the runners: an empty include list
/// selects every table, and exclusion applies second.
pub(crate) fn selection_allows(include: &[String], exclude: &[String], table: &str) -> bool {
    if !include.is_empty() && !include.iter().any(|t| t == table) {
        return false;
    }
    !exclude.iter().any(|t| t == table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config::new("/var/backups/rowvault")
    }

    #[test]
    fn test_from_yaml_minimal() {
        let config = Config::from_yaml("backup_dir: /tmp/backups\n").unwrap();
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/backups"));
        assert_eq!(config.suffix, None);
        assert!(config.include_tables.is_empty());
        assert_eq!(config.manifest_name, "manifest.json");
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = "\
backup_dir: /tmp/backups
suffix: v7
include_tables:
  - people
  - orders
exclude_tables:
  - sessions
manifest_name: run.json
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.suffix.as_deref(), Some("v7"));
        assert_eq!(config.include_tables, vec!["people", "orders"]);
        assert_eq!(config.manifest_path(), PathBuf::from("/tmp/backups/run.json"));
    }

    #[test]
    fn test_missing_backup_dir_rejected() {
        assert!(Config::from_yaml("suffix: v7\n").is_err());
    }

    #[test]
    fn test_bad_suffix_rejected() {
        let mut config = valid_config();
        config.suffix = Some("a/b".into());
        assert!(config.validate().is_err());

        config.suffix = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_selection() {
        let mut config = valid_config();
        assert!(config.table_selected("people"));

        config.include_tables = vec!["people".into(), "orders".into()];
        config.exclude_tables = vec!["orders".into()];
        assert!(config.table_selected("people"));
        assert!(!config.table_selected("orders"));
        assert!(!config.table_selected("sessions"));
    }
}
