//! Table import: parse an artifact, reconcile its layout, insert rows.
//!
//! The importer reads the header with the same quote-aware record parser the
//! data lines use, builds one [`ReconcilePlan`] for the whole artifact, and
//! inserts each reconciled row through the sink. A malformed token aborts
//! that table's import; rows inserted before the bad line stay, since
//! per-row inserts are independent.

use std::io::{BufReader, Read};

use tracing::debug;

use crate::codec::RecordReader;
use crate::core::traits::RowSink;
use crate::core::TableSchema;
use crate::error::Result;
use crate::reconcile::ReconcilePlan;

/// Reads one table's artifact and inserts its rows.
pub struct TableImporter<'a> {
    schema: &'a TableSchema,
}

impl<'a> TableImporter<'a> {
    /// Create an importer targeting `schema`.
    pub fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    /// Import every record from `input` into the sink.
    ///
    /// Returns the number of rows inserted. An empty artifact (not even a
    /// header) imports zero rows.
    pub fn import(&self, input: &mut dyn Read, sink: &mut dyn RowSink) -> Result<u64> {
        let mut reader = RecordReader::new(BufReader::new(input));

        let header = match reader.next_record()? {
            Some(record) => record,
            None => return Ok(0),
        };
        let incoming: Vec<String> = header.into_iter().map(|f| f.text).collect();

        let plan = ReconcilePlan::build(&incoming, self.schema);
        debug!(
            "{}: layout has {} columns, {} matched, {} ignored, {} defaulted",
            self.schema.name(),
            incoming.len(),
            plan.matched(),
            plan.ignored(),
            plan.defaulted().len()
        );

        let mut rows: u64 = 0;
        while let Some(record) = reader.next_record()? {
            let row = plan.apply(self.schema, &record)?;
            sink.insert_row(self.schema.name(), row)?;
            rows += 1;
        }

        debug!("{}: imported {} rows", self.schema.name(), rows);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Row;
    use crate::core::{ColumnSpec, SemanticType, Value};
    use crate::error::VaultError;

    #[derive(Default)]
    struct CollectingSink {
        rows: Vec<Row>,
    }

    impl RowSink for CollectingSink {
        fn insert_row(&mut self, _table: &str, row: Row) -> Result<()> {
            self.rows.push(row);
            Ok(())
        }
    }

    fn make_test_schema() -> TableSchema {
        TableSchema::new(
            "people",
            vec![
                ColumnSpec::new("id", SemanticType::I32),
                ColumnSpec::new("name", SemanticType::Text),
                ColumnSpec::new("verified", SemanticType::Bool).with_default(Value::Bool(false)),
            ],
        )
        .unwrap()
    }

    fn import_str(schema: &TableSchema, artifact: &str) -> Result<(u64, Vec<Row>)> {
        let mut sink = CollectingSink::default();
        let mut input = artifact.as_bytes();
        let rows = TableImporter::new(schema).import(&mut input, &mut sink)?;
        Ok((rows, sink.rows))
    }

    #[test]
    fn test_import_matching_layout() {
        let schema = make_test_schema();
        let (count, rows) =
            import_str(&schema, "id,name,verified\n1,ada,1\n2,grace,0\n").unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            rows[0],
            vec![Value::I32(1), Value::from("ada"), Value::Bool(true)]
        );
        assert_eq!(
            rows[1],
            vec![Value::I32(2), Value::from("grace"), Value::Bool(false)]
        );
    }

    #[test]
    fn test_import_older_layout_applies_defaults() {
        let schema = make_test_schema();
        // Artifact predates the "verified" column.
        let (count, rows) = import_str(&schema, "id,name\n5,kay\n").unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            rows[0],
            vec![Value::I32(5), Value::from("kay"), Value::Bool(false)]
        );
    }

    #[test]
    fn test_import_newer_layout_ignores_unknown_columns() {
        let schema = make_test_schema();
        let (count, rows) =
            import_str(&schema, "id,nickname,name,verified\n7,kn,ken,1\n").unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            rows[0],
            vec![Value::I32(7), Value::from("ken"), Value::Bool(true)]
        );
    }

    #[test]
    fn test_import_empty_artifact_is_zero_rows() {
        let schema = make_test_schema();
        let (count, rows) = import_str(&schema, "").unwrap();
        assert_eq!(count, 0);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_import_header_only_is_zero_rows() {
        let schema = make_test_schema();
        let (count, rows) = import_str(&schema, "id,name,verified\n").unwrap();
        assert_eq!(count, 0);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_token_aborts_but_keeps_earlier_rows() {
        let schema = make_test_schema();
        let mut sink = CollectingSink::default();
        let mut input = "id,name,verified\n1,ada,1\nnope,bad,1\n".as_bytes();

        let err = TableImporter::new(&schema)
            .import(&mut input, &mut sink)
            .unwrap_err();
        assert!(matches!(err, VaultError::MalformedToken { .. }));
        // The first row was inserted before the bad line was reached.
        assert_eq!(sink.rows.len(), 1);
        assert_eq!(sink.rows[0][0], Value::I32(1));
    }

    #[test]
    fn test_quoted_newline_in_field_survives_import() {
        let schema = make_test_schema();
        let (count, rows) =
            import_str(&schema, "id,name,verified\n1,\"two\nlines\",0\n").unwrap();
        assert_eq!(count, 1);
        assert_eq!(rows[0][1], Value::from("two\nlines"));
    }
}
