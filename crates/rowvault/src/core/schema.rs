//! Schema descriptors for backed-up tables.
//!
//! A [`TableSchema`] is the authoritative description of one table: its name
//! and its ordered [`ColumnSpec`]s. Descriptors are validated on
//! construction and read-only afterwards, so every later stage can trust
//! that column names are unique and defaults fit their column types.

use crate::core::value::{SemanticType, Value};
use crate::error::{Result, VaultError};

/// Column metadata: name, semantic type, nullability, and the default
/// applied when a restore source predates the column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Column name. Matching during restore is case-sensitive and exact.
    pub name: String,

    /// Semantic type, fixing the canonical text form.
    pub ty: SemanticType,

    /// Whether the column accepts absent values.
    pub nullable: bool,

    /// Value applied when the restore source has no token for this column.
    pub default: Value,
}

impl ColumnSpec {
    /// Create a nullable column with a `Null` default.
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            default: Value::Null,
        }
    }

    /// Set the restore default.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    /// Mark the column non-nullable. Requires a non-null default.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Ordered description of one table's columns.
///
/// Column order matters only on export (token order in artifact records);
/// restore never relies on position.
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Build a descriptor, validating the table name, column names, and
    /// column defaults.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Result<Self> {
        let name = name.into();
        validate_table_name(&name)?;
        for (idx, col) in columns.iter().enumerate() {
            validate_column_name(&name, &col.name)?;
            if columns[..idx].iter().any(|c| c.name == col.name) {
                return Err(VaultError::DuplicateColumn {
                    table: name,
                    column: col.name.clone(),
                });
            }
            validate_default(&name, col)?;
        }
        Ok(Self { name, columns })
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Column at `idx`.
    ///
    /// # Panics
    ///
    /// Panics when `idx` is out of range; indexes come from this schema's
    /// own iteration or from a [`ReconcilePlan`](crate::reconcile::ReconcilePlan)
    /// built against it.
    #[must_use]
    pub fn column(&self, idx: usize) -> &ColumnSpec {
        &self.columns[idx]
    }

    /// Index of the column named `name` (case-sensitive, exact).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::Schema("empty table name".to_string()));
    }
    if name.contains(['/', '\\']) || name.chars().any(char::is_control) {
        return Err(VaultError::Schema(format!(
            "table name {:?} contains path separators or control characters",
            name
        )));
    }
    Ok(())
}

// Column names appear unquoted on the artifact header line, so the record
// delimiters are off limits.
fn validate_column_name(table: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::Schema(format!(
            "empty column name in table {}",
            table
        )));
    }
    if name.contains([',', '"', '\n', '\r']) {
        return Err(VaultError::Schema(format!(
            "column name {:?} in table {} contains record delimiters",
            name, table
        )));
    }
    Ok(())
}

fn validate_default(table: &str, col: &ColumnSpec) -> Result<()> {
    if col.default.is_null() {
        if !col.nullable {
            return Err(VaultError::InvalidDefault {
                table: table.to_string(),
                column: col.name.clone(),
                reason: "non-nullable column requires a non-null default".to_string(),
            });
        }
        return Ok(());
    }
    if !col.default.fits(&col.ty) {
        return Err(VaultError::InvalidDefault {
            table: table.to_string(),
            column: col.name.clone(),
            reason: format!(
                "default of kind {} does not fit column type {}",
                col.default.kind_name(),
                col.ty
            ),
        });
    }
    Ok(())
}
