//! Table export: header plus one serialized record per row.
//!
//! [`serialize_row`] turns one row into a record line under its schema.
//! [`TableExporter`] drains a [`RowCursor`](crate::core::RowCursor) into a
//! text artifact. Missing-table tolerance lives one level up in the
//! [`BackupRunner`](crate::backup::BackupRunner), which probes the row store
//! before any artifact is created.

use std::io::Write;

use tracing::debug;

use crate::codec::{record, token};
use crate::core::traits::RowCursor;
use crate::core::value::Row;
use crate::core::TableSchema;
use crate::error::{Result, VaultError};

/// Serialize one row into a record line, without the terminator.
///
/// Values must arrive in the schema's column order, one per column.
pub fn serialize_row(schema: &TableSchema, row: &Row) -> Result<String> {
    if row.len() != schema.len() {
        return Err(VaultError::Schema(format!(
            "row for table {} has {} values but the schema has {} columns",
            schema.name(),
            row.len(),
            schema.len()
        )));
    }
    let mut tokens = Vec::with_capacity(row.len());
    for (col, value) in schema.columns().iter().zip(row) {
        tokens.push(token::encode(col, value)?);
    }
    Ok(record::write_record(&tokens))
}

/// Header line for a schema: column names comma-joined, unquoted.
///
/// Schema validation guarantees names are free of delimiters.
pub fn header_line(schema: &TableSchema) -> String {
    schema
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes one table's rows as a text artifact.
pub struct TableExporter<'a> {
    schema: &'a TableSchema,
}

impl<'a> TableExporter<'a> {
    /// Create an exporter for `schema`.
    pub fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    /// Write the header and every row from `cursor` to `out`, flushing on
    /// completion. Returns the number of rows written.
    pub fn export(&self, cursor: &mut dyn RowCursor, out: &mut dyn Write) -> Result<u64> {
        out.write_all(header_line(self.schema).as_bytes())?;
        out.write_all(b"\n")?;

        let mut rows: u64 = 0;
        while let Some(row) = cursor.next_row()? {
            let line = serialize_row(self.schema, &row)?;
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            rows += 1;
        }
        out.flush()?;

        debug!("{}: exported {} rows", self.schema.name(), rows);
        Ok(rows)
    }
}
