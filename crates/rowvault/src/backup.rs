//! Backup and restore runners.
//!
//! A runner walks every registered table, drives the per-table exporter or
//! importer, and records one [`TableOutcome`] per table instead of aborting
//! on the first error. A missing table (export) or missing artifact
//! (restore) is a skip; anything else that goes wrong inside one table is a
//! failure for that table only. Callers read the report to learn which
//! tables need attention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::{self, Config};
use crate::core::registry::SchemaRegistry;
use crate::core::traits::{RowSink, RowSource, TextStore};
use crate::error::{Result, VaultError};
use crate::export::TableExporter;
use crate::import::TableImporter;
use crate::manifest::{artifact_name, BackupManifest};

/// Per-table result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Exported or imported fully.
    Completed,

    /// Nothing to do: table absent from the row store, or no artifact to
    /// restore from.
    Skipped,

    /// The table's export or import aborted; see `detail`.
    Failed,
}

/// Result for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOutcome {
    /// Table name.
    pub table: String,

    /// How the table ended up.
    pub status: OutcomeStatus,

    /// Rows exported or imported.
    pub rows: u64,

    /// Why the table was skipped or failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TableOutcome {
    fn completed(table: &str, rows: u64) -> Self {
        Self {
            table: table.to_string(),
            status: OutcomeStatus::Completed,
            rows,
            detail: None,
        }
    }

    fn skipped(table: &str, detail: String) -> Self {
        Self {
            table: table.to_string(),
            status: OutcomeStatus::Skipped,
            rows: 0,
            detail: Some(detail),
        }
    }

    fn failed(table: &str, detail: String) -> Self {
        Self {
            table: table.to_string(),
            status: OutcomeStatus::Failed,
            rows: 0,
            detail: Some(detail),
        }
    }
}

/// Result of one backup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupReport {
    /// When the backup started.
    pub started_at: DateTime<Utc>,

    /// When the backup completed.
    pub completed_at: DateTime<Utc>,

    /// Tables considered.
    pub tables_total: usize,

    /// Tables exported fully.
    pub tables_completed: usize,

    /// Tables skipped (absent from the row store or deselected).
    pub tables_skipped: usize,

    /// Tables that failed.
    pub tables_failed: usize,

    /// Total rows exported.
    pub rows_exported: u64,

    /// Per-table outcomes, in registry order.
    pub outcomes: Vec<TableOutcome>,

    /// Artifacts produced, keyed by table. Skipped and failed tables have
    /// no entry.
    pub manifest: BackupManifest,
}

impl BackupReport {
    /// Convert to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether every considered table completed or was skipped.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.tables_failed == 0
    }
}

/// Result of one restore run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreReport {
    /// When the restore started.
    pub started_at: DateTime<Utc>,

    /// When the restore completed.
    pub completed_at: DateTime<Utc>,

    /// Tables considered.
    pub tables_total: usize,

    /// Tables imported fully.
    pub tables_completed: usize,

    /// Tables with no artifact to restore from.
    pub tables_skipped: usize,

    /// Tables whose import aborted.
    pub tables_failed: usize,

    /// Total rows imported.
    pub rows_imported: u64,

    /// Per-table outcomes, in registry order.
    pub outcomes: Vec<TableOutcome>,
}

impl RestoreReport {
    /// Convert to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether every considered table completed or was skipped.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.tables_failed == 0
    }
}

/// Table selection shared by the two runners.
#[derive(Debug, Clone, Default)]
struct Selection {
    suffix: Option<String>,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Selection {
    fn from_config(config: &Config) -> Self {
        Self {
            suffix: config.suffix.clone(),
            include: config.include_tables.clone(),
            exclude: config.exclude_tables.clone(),
        }
    }

    fn selected(&self, table: &str) -> bool {
        config::selection_allows(&self.include, &self.exclude, table)
    }
}

/// Exports every registered table into a text store.
pub struct BackupRunner<'a> {
    registry: &'a SchemaRegistry,
    selection: Selection,
}

impl<'a> BackupRunner<'a> {
    /// Create a runner over `registry` with no suffix and every table
    /// selected.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            selection: Selection::default(),
        }
    }

    /// Apply a suffix to every artifact name.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.selection.suffix = Some(suffix.into());
        self
    }

    /// Take the suffix and table selection from a [`Config`].
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.selection = Selection::from_config(config);
        self
    }

    /// Export every selected table from `source` into `store`.
    ///
    /// Per-table errors are recorded in the report, never propagated; a
    /// table absent from the row store is skipped and leaves no artifact.
    pub fn backup_all(&self, source: &dyn RowSource, store: &dyn TextStore) -> BackupReport {
        let started_at = Utc::now();
        let suffix = self.selection.suffix.as_deref();
        let mut manifest = BackupManifest::new(self.selection.suffix.clone());
        let mut outcomes = Vec::new();
        let mut rows_exported: u64 = 0;

        info!("Starting backup of {} tables", self.registry.len());

        for schema in self.registry.iter() {
            let table = schema.name();
            if !self.selection.selected(table) {
                continue;
            }

            // Probe the row store first so a missing table never leaves a
            // stray artifact behind.
            let mut cursor = match source.open_scan(table) {
                Ok(cursor) => cursor,
                Err(VaultError::TableNotFound(_)) => {
                    warn!("{}: not present in row store, skipping", table);
                    outcomes.push(TableOutcome::skipped(
                        table,
                        "table not present in row store".to_string(),
                    ));
                    continue;
                }
                Err(e) => {
                    error!("{}: backup failed - {}", table, e);
                    outcomes.push(TableOutcome::failed(table, e.to_string()));
                    continue;
                }
            };

            let artifact = artifact_name(table, suffix);
            let result = store.open_write(&artifact).and_then(|mut out| {
                TableExporter::new(schema).export(cursor.as_mut(), out.as_mut())
            });
            match result {
                Ok(rows) => {
                    info!("{}: exported {} rows to {}", table, rows, artifact);
                    manifest.record(table, artifact);
                    rows_exported += rows;
                    outcomes.push(TableOutcome::completed(table, rows));
                }
                Err(e) => {
                    error!("{}: backup failed - {}", table, e);
                    outcomes.push(TableOutcome::failed(table, e.to_string()));
                }
            }
        }

        let report = BackupReport {
            started_at,
            completed_at: Utc::now(),
            tables_total: outcomes.len(),
            tables_completed: count(&outcomes, OutcomeStatus::Completed),
            tables_skipped: count(&outcomes, OutcomeStatus::Skipped),
            tables_failed: count(&outcomes, OutcomeStatus::Failed),
            rows_exported,
            outcomes,
            manifest,
        };

        info!(
            "Backup finished: {} completed, {} skipped, {} failed ({} rows)",
            report.tables_completed,
            report.tables_skipped,
            report.tables_failed,
            report.rows_exported
        );
        report
    }
}

/// Imports every registered table from a text store.
pub struct RestoreRunner<'a> {
    registry: &'a SchemaRegistry,
    selection: Selection,
}

impl<'a> RestoreRunner<'a> {
    /// Create a runner over `registry` with no suffix and every table
    /// selected.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            selection: Selection::default(),
        }
    }

    /// Look for artifacts carrying this suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.selection.suffix = Some(suffix.into());
        self
    }

    /// Take the suffix and table selection from a [`Config`].
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.selection = Selection::from_config(config);
        self
    }

    /// Import every selected table from `store` into `sink`.
    ///
    /// A table with no artifact is skipped (nothing to restore). A
    /// malformed artifact fails that table; rows inserted before the bad
    /// line stay in place.
    pub fn restore_all(&self, store: &dyn TextStore, sink: &mut dyn RowSink) -> RestoreReport {
        let started_at = Utc::now();
        let suffix = self.selection.suffix.as_deref();
        let mut outcomes = Vec::new();
        let mut rows_imported: u64 = 0;

        info!("Starting restore of {} tables", self.registry.len());

        for schema in self.registry.iter() {
            let table = schema.name();
            if !self.selection.selected(table) {
                continue;
            }

            let artifact = artifact_name(table, suffix);
            let mut input = match store.open_read(&artifact) {
                Ok(input) => input,
                Err(VaultError::SourceUnavailable(_)) => {
                    warn!("{}: no artifact {}, nothing to restore", table, artifact);
                    outcomes.push(TableOutcome::skipped(
                        table,
                        format!("no artifact {}", artifact),
                    ));
                    continue;
                }
                Err(e) => {
                    error!("{}: restore failed - {}", table, e);
                    outcomes.push(TableOutcome::failed(table, e.to_string()));
                    continue;
                }
            };

            match TableImporter::new(schema).import(input.as_mut(), sink) {
                Ok(rows) => {
                    info!("{}: imported {} rows from {}", table, rows, artifact);
                    rows_imported += rows;
                    outcomes.push(TableOutcome::completed(table, rows));
                }
                Err(e) => {
                    error!("{}: restore failed - {}", table, e);
                    outcomes.push(TableOutcome::failed(table, e.to_string()));
                }
            }
        }

        let report = RestoreReport {
            started_at,
            completed_at: Utc::now(),
            tables_total: outcomes.len(),
            tables_completed: count(&outcomes, OutcomeStatus::Completed),
            tables_skipped: count(&outcomes, OutcomeStatus::Skipped),
            tables_failed: count(&outcomes, OutcomeStatus::Failed),
            rows_imported,
            outcomes,
        };

        info!(
            "Restore finished: {} completed, {} skipped, {} failed ({} rows)",
            report.tables_completed,
            report.tables_skipped,
            report.tables_failed,
            report.rows_imported
        );
        report
    }
}

fn count(outcomes: &[TableOutcome], status: OutcomeStatus) -> usize {
    outcomes.iter().filter(|o| o.status == status).count()
}
