//! # rowvault
//!
//! Typed table backup and restore with schema-evolution-safe text artifacts.
//!
//! Every row of every registered table is serialized with full type
//! fidelity into a portable text format, and can be re-imported into a
//! structurally different schema:
//!
//! - **Exact round trips** - floats travel as IEEE-754 bit patterns, blobs
//!   as base64, so values survive byte-identically
//! - **Name-based reconciliation** - restored columns match by name, never
//!   by position; added columns take their configured defaults, dropped
//!   columns are ignored
//! - **Per-table fault isolation** - a missing table, missing artifact, or
//!   corrupt record affects only that table; runners report a summary
//!   instead of aborting
//!
//! ## Example
//!
//! ```rust,no_run
//! use rowvault::{
//!     BackupRunner, ColumnSpec, Config, FsTextStore, MemStore, SchemaRegistry, SemanticType,
//!     TableSchema,
//! };
//!
//! fn main() -> rowvault::Result<()> {
//!     let mut registry = SchemaRegistry::new();
//!     registry.register(TableSchema::new(
//!         "people",
//!         vec![
//!             ColumnSpec::new("id", SemanticType::I64),
//!             ColumnSpec::new("name", SemanticType::Text),
//!         ],
//!     )?)?;
//!
//!     let config = Config::load("config.yaml")?;
//!     let source = MemStore::new(); // any RowSource implementation
//!     let artifacts = FsTextStore::new(&config.backup_dir)?;
//!
//!     let report = BackupRunner::new(&registry)
//!         .with_config(&config)
//!         .backup_all(&source, &artifacts);
//!     report.manifest.save(config.manifest_path())?;
//!     println!("Backed up {} rows", report.rows_exported);
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod import;
pub mod manifest;
pub mod reconcile;
pub mod stores;

// Re-exports for convenient access
pub use backup::{BackupReport, BackupRunner, OutcomeStatus, RestoreReport, RestoreRunner, TableOutcome};
pub use config::Config;
pub use self::core::{
    ColumnSpec, EnumSpec, GeoAngle, Row, RowCursor, RowSink, RowSource, ScalarCodec,
    SchemaRegistry, SemanticType, TableSchema, TextStore, Value,
};
pub use error::{Result, VaultError};
pub use export::TableExporter;
pub use import::TableImporter;
pub use manifest::BackupManifest;
pub use reconcile::ReconcilePlan;
pub use stores::{FsTextStore, MemStore, MemTextStore};
