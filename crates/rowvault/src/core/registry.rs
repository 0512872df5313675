//! Schema registry for explicit dependency injection.
//!
//! The [`SchemaRegistry`] holds the table schemas active for one
//! backup/restore run. Unlike a global reflection-derived catalog, it is
//! explicitly constructed and injected into the runners, which keeps
//! initialization deterministic and makes test setups trivial.

use std::collections::HashMap;

use crate::core::schema::TableSchema;
use crate::error::{Result, VaultError};

/// Registry of table schemas, iterated in registration order.
///
/// Registration order is the order tables are processed in, so backups are
/// deterministic run to run.
#[derive(Default)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
    by_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table schema.
    ///
    /// Fails when a schema is already registered under the same table name.
    pub fn register(&mut self, schema: TableSchema) -> Result<()> {
        if self.by_name.contains_key(schema.name()) {
            return Err(VaultError::DuplicateTable(schema.name().to_string()));
        }
        self.by_name
            .insert(schema.name().to_string(), self.tables.len());
        self.tables.push(schema);
        Ok(())
    }

    /// Get a schema by table name.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.by_name.get(table).map(|&idx| &self.tables[idx])
    }

    /// Check if a table is registered.
    #[must_use]
    pub fn has(&self, table: &str) -> bool {
        self.by_name.contains_key(table)
    }

    /// Schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    /// Table names in registration order.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(TableSchema::name).collect()
    }

    /// Number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("tables", &self.table_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::ColumnSpec;
    use crate::core::value::SemanticType;

    fn make_test_schema(name: &str) -> TableSchema {
        TableSchema::new(name, vec![ColumnSpec::new("id", SemanticType::I64)])
            .expect("valid schema")
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        assert!(!registry.has("people"));

        registry.register(make_test_schema("people")).unwrap();
        assert!(registry.has("people"));
        assert_eq!(registry.get("people").unwrap().name(), "people");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(make_test_schema("people")).unwrap();

        let err = registry.register(make_test_schema("people")).unwrap_err();
        assert!(matches!(err, VaultError::DuplicateTable(name) if name == "people"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_iteration_follows_registration_order() {
        let mut registry = SchemaRegistry::new();
        registry.register(make_test_schema("zebras")).unwrap();
        registry.register(make_test_schema("apples")).unwrap();
        registry.register(make_test_schema("mangos")).unwrap();

        assert_eq!(registry.table_names(), vec!["zebras", "apples", "mangos"]);
        let iterated: Vec<&str> = registry.iter().map(TableSchema::name).collect();
        assert_eq!(iterated, vec!["zebras", "apples", "mangos"]);
    }
}
