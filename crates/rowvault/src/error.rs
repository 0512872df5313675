//! Error types for the backup/restore library.

use thiserror::Error;

/// Main error type for backup and restore operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema descriptor is unusable (bad table or column name, bad shape)
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// Two columns in one schema descriptor share a name
    #[error("Duplicate column name {column:?} in schema for table {table}")]
    DuplicateColumn { table: String, column: String },

    /// Two schema descriptors were registered under the same table name
    #[error("Schema for table {0} is already registered")]
    DuplicateTable(String),

    /// A column default is not representable in the declared column type
    #[error("Invalid default for column {column} in table {table}: {reason}")]
    InvalidDefault {
        table: String,
        column: String,
        reason: String,
    },

    /// A table named by a schema descriptor does not exist in the row store
    #[error("Table {0} not found in row store")]
    TableNotFound(String),

    /// No backup artifact is available for a table during restore
    #[error("Backup source unavailable: {0}")]
    SourceUnavailable(String),

    /// A non-empty token could not be decoded under its column's type
    #[error("Malformed token {token:?} for column {column} ({type_name}): {reason}")]
    MalformedToken {
        column: String,
        type_name: String,
        token: String,
        reason: String,
    },

    /// A record could not be split into fields (framing, not token content)
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A value's kind does not match its column's declared type at encode time
    #[error("Value kind mismatch for column {column}: expected {expected}, got {actual}")]
    KindMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// Row store failure other than a missing table
    #[error("Row store error: {0}")]
    Store(String),

    /// IO error (artifact streams, manifest files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// Create a MalformedToken error for a column.
    pub fn malformed(
        column: impl Into<String>,
        type_name: impl Into<String>,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        VaultError::MalformedToken {
            column: column.into(),
            type_name: type_name.into(),
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create a KindMismatch error for a column.
    pub fn kind_mismatch(
        column: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        VaultError::KindMismatch {
            column: column.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a Store error, for row store failures other than a missing
    /// table. External `RowSource`/`RowSink` implementations wrap their
    /// engine errors with this.
    pub fn store(message: impl Into<String>) -> Self {
        VaultError::Store(message.into())
    }
}

/// Result type alias for backup/restore operations.
pub type Result<T> = std::result::Result<T, VaultError>;
