//! Layout reconciliation between an artifact's advertised columns and the
//! live table schema.
//!
//! An artifact opens with the column names it was written under. The live
//! schema may have gained columns, lost columns, or reordered them since.
//! [`ReconcilePlan::build`] compares the two by exact name and produces a
//! positional plan; [`ReconcilePlan::apply`] then turns each record into a
//! row shaped for the live schema, decoding bound fields, defaulting
//! columns the artifact never knew, and ignoring fields no current column
//! claims.

use std::collections::HashMap;

use crate::codec::{token, Field};
use crate::core::{Row, TableSchema, Value};
use crate::error::Result;

/// Positional mapping from incoming record fields to schema columns.
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    /// For each incoming position, the schema column it feeds.
    bindings: Vec<Option<usize>>,

    /// Schema columns no incoming position feeds; they take their defaults.
    defaulted: Vec<usize>,
}

impl ReconcilePlan {
    /// Build a plan for records advertising `incoming` column names.
    ///
    /// Matching is by exact name. When a name appears more than once in the
    /// layout, the last occurrence wins and earlier ones are ignored.
    pub fn build(incoming: &[String], schema: &TableSchema) -> Self {
        let mut winner: HashMap<usize, usize> = HashMap::new();
        for (pos, name) in incoming.iter().enumerate() {
            if let Some(col) = schema.find(name) {
                winner.insert(col, pos);
            }
        }

        let mut bindings = vec![None; incoming.len()];
        for (&col, &pos) in &winner {
            bindings[pos] = Some(col);
        }
        let defaulted = (0..schema.len())
            .filter(|col| !winner.contains_key(col))
            .collect();

        Self {
            bindings,
            defaulted,
        }
    }

    /// Shape one record into a row for the live schema.
    ///
    /// A record shorter than the advertised layout leaves the unfed bound
    /// columns absent; fields past the layout are ignored.
    pub fn apply(&self, schema: &TableSchema, fields: &[Field]) -> Result<Row> {
        let mut row: Vec<Option<Value>> = vec![None; schema.len()];

        for (pos, field) in fields.iter().enumerate() {
            let Some(col) = self.bindings.get(pos).copied().flatten() else {
                continue;
            };
            row[col] = Some(token::decode(schema.column(col), field)?);
        }
        for &col in &self.defaulted {
            row[col] = Some(schema.column(col).default.clone());
        }

        Ok(row.into_iter().map(|v| v.unwrap_or(Value::Null)).collect())
    }

    /// Number of schema columns fed by the incoming layout.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_some()).count()
    }

    /// Number of incoming positions no schema column claims.
    #[must_use]
    pub fn ignored(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_none()).count()
    }

    /// Schema column indices that fall back to their defaults.
    #[must_use]
    pub fn defaulted(&self) -> &[usize] {
        &self.defaulted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnSpec, SemanticType};

    fn make_test_schema() -> TableSchema {
        TableSchema::new(
            "events",
            vec![
                ColumnSpec::new("id", SemanticType::I32),
                ColumnSpec::new("label", SemanticType::Text).with_default(Value::from("none")),
                ColumnSpec::new("active", SemanticType::Bool),
            ],
        )
        .unwrap()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn present(text: &str) -> Field {
        Field {
            text: text.to_string(),
            quoted: false,
        }
    }

    #[test]
    fn test_identity_layout_binds_everything() {
        let schema = make_test_schema();
        let plan = ReconcilePlan::build(&names(&["id", "label", "active"]), &schema);

        assert_eq!(plan.matched(), 3);
        assert_eq!(plan.ignored(), 0);
        assert!(plan.defaulted().is_empty());

        let row = plan
            .apply(&schema, &[present("7"), present("a"), present("1")])
            .unwrap();
        assert_eq!(
            row,
            vec![Value::I32(7), Value::from("a"), Value::Bool(true)]
        );
    }

    #[test]
    fn test_reordered_layout_follows_names() {
        let schema = make_test_schema();
        let plan = ReconcilePlan::build(&names(&["active", "id", "label"]), &schema);

        let row = plan
            .apply(&schema, &[present("0"), present("3"), present("x")])
            .unwrap();
        assert_eq!(
            row,
            vec![Value::I32(3), Value::from("x"), Value::Bool(false)]
        );
    }

    #[test]
    fn test_unknown_column_ignored_and_missing_defaulted() {
        let schema = make_test_schema();
        // "legacy" was dropped from the schema; "label" was added after the
        // artifact was written.
        let plan = ReconcilePlan::build(&names(&["id", "legacy", "active"]), &schema);

        assert_eq!(plan.matched(), 2);
        assert_eq!(plan.ignored(), 1);
        assert_eq!(plan.defaulted(), [1]);

        let row = plan
            .apply(&schema, &[present("9"), present("junk"), present("1")])
            .unwrap();
        assert_eq!(
            row,
            vec![Value::I32(9), Value::from("none"), Value::Bool(true)]
        );
    }

    #[test]
    fn test_duplicate_name_last_occurrence_wins() {
        let schema = make_test_schema();
        let plan = ReconcilePlan::build(&names(&["id", "id", "label", "active"]), &schema);

        let row = plan
            .apply(
                &schema,
                &[present("1"), present("2"), present("x"), present("0")],
            )
            .unwrap();
        assert_eq!(row[0], Value::I32(2));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let schema = make_test_schema();
        let plan = ReconcilePlan::build(&names(&["ID", "label", "active"]), &schema);

        assert_eq!(plan.ignored(), 1);
        assert!(plan.defaulted().contains(&0));
    }

    #[test]
    fn test_short_record_leaves_trailing_columns_absent() {
        let schema = make_test_schema();
        let plan = ReconcilePlan::build(&names(&["id", "label", "active"]), &schema);

        let row = plan.apply(&schema, &[present("4")]).unwrap();
        assert_eq!(row, vec![Value::I32(4), Value::Null, Value::Null]);
    }

    #[test]
    fn test_extra_fields_past_layout_ignored() {
        let schema = make_test_schema();
        let plan = ReconcilePlan::build(&names(&["id"]), &schema);

        let row = plan
            .apply(&schema, &[present("4"), present("stray"), present("more")])
            .unwrap();
        assert_eq!(row[0], Value::I32(4));
        assert_eq!(row.len(), 3);
    }
}
