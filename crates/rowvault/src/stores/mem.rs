//! In-memory row store and text store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use crate::core::traits::{RowCursor, RowSink, RowSource, TextStore};
use crate::core::value::Row;
use crate::error::{Result, VaultError};

/// In-memory table store implementing both [`RowSource`] and [`RowSink`].
///
/// Tables must be created before rows can be read or inserted; scanning or
/// inserting into an unknown table reports
/// [`VaultError::TableNotFound`], the same distinguishable condition a real
/// engine adapter would signal.
#[derive(Debug, Default)]
pub struct MemStore {
    tables: BTreeMap<String, Vec<Row>>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table. Creating an existing table clears it.
    pub fn create_table(&mut self, name: impl Into<String>) {
        self.tables.insert(name.into(), Vec::new());
    }

    /// Drop a table and its rows.
    pub fn drop_table(&mut self, name: &str) {
        self.tables.remove(name);
    }

    /// Whether the store has a table named `name`.
    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Rows of `name` in insertion order, or `None` if the table does not
    /// exist.
    #[must_use]
    pub fn rows(&self, name: &str) -> Option<&[Row]> {
        self.tables.get(name).map(Vec::as_slice)
    }
}

impl RowSource for MemStore {
    fn open_scan(&self, table: &str) -> Result<Box<dyn RowCursor + '_>> {
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| VaultError::TableNotFound(table.to_string()))?;
        Ok(Box::new(MemCursor {
            // Snapshot so the cursor stays valid however long it is held.
            rows: rows.clone().into_iter(),
        }))
    }
}

impl RowSink for MemStore {
    fn insert_row(&mut self, table: &str, row: Row) -> Result<()> {
        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| VaultError::TableNotFound(table.to_string()))?;
        rows.push(row);
        Ok(())
    }
}

struct MemCursor {
    rows: std::vec::IntoIter<Row>,
}

impl RowCursor for MemCursor {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.next())
    }
}

/// In-memory [`TextStore`]: named byte buffers.
#[derive(Debug, Default)]
pub struct MemTextStore {
    artifacts: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemTextStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.artifacts.borrow().keys().cloned().collect()
    }

    /// Bytes of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts.borrow().get(name).cloned()
    }

    /// Replace the contents of `name`, used to seed restore tests.
    pub fn put(&self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.artifacts.borrow_mut().insert(name.into(), bytes.into());
    }

    /// Remove an artifact.
    pub fn remove(&self, name: &str) {
        self.artifacts.borrow_mut().remove(name);
    }
}

impl TextStore for MemTextStore {
    fn open_write(&self, name: &str) -> Result<Box<dyn Write + '_>> {
        self.artifacts
            .borrow_mut()
            .insert(name.to_string(), Vec::new());
        Ok(Box::new(MemWriter {
            artifacts: &self.artifacts,
            name: name.to_string(),
        }))
    }

    fn open_read(&self, name: &str) -> Result<Box<dyn Read + '_>> {
        match self.artifacts.borrow().get(name) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(VaultError::SourceUnavailable(name.to_string())),
        }
    }
}

struct MemWriter<'a> {
    artifacts: &'a RefCell<BTreeMap<String, Vec<u8>>>,
    name: String,
}

impl Write for MemWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut artifacts = self.artifacts.borrow_mut();
        artifacts
            .entry(self.name.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    #[test]
    fn test_mem_store_scan_missing_table() {
        let store = MemStore::new();
        // Box<dyn RowCursor> has no Debug impl, so unwrap the error side.
        let err = store.open_scan("nope").err().unwrap();
        assert!(matches!(err, VaultError::TableNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_mem_store_insert_and_scan() {
        let mut store = MemStore::new();
        store.create_table("people");
        store
            .insert_row("people", vec![Value::I32(1), Value::from("ada")])
            .unwrap();
        store
            .insert_row("people", vec![Value::I32(2), Value::from("grace")])
            .unwrap();

        let mut cursor = store.open_scan("people").unwrap();
        assert_eq!(
            cursor.next_row().unwrap(),
            Some(vec![Value::I32(1), Value::from("ada")])
        );
        assert_eq!(
            cursor.next_row().unwrap(),
            Some(vec![Value::I32(2), Value::from("grace")])
        );
        assert_eq!(cursor.next_row().unwrap(), None);
    }

    #[test]
    fn test_mem_store_insert_missing_table() {
        let mut store = MemStore::new();
        let err = store.insert_row("nope", vec![]).unwrap_err();
        assert!(matches!(err, VaultError::TableNotFound(_)));
    }

    #[test]
    fn test_mem_text_store_write_read() {
        let store = MemTextStore::new();
        {
            let mut out = store.open_write("people").unwrap();
            out.write_all(b"id,name\n1,ada\n").unwrap();
            out.flush().unwrap();
        }
        assert_eq!(store.names(), vec!["people"]);

        let mut text = String::new();
        store
            .open_read("people")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "id,name\n1,ada\n");
    }

    #[test]
    fn test_mem_text_store_open_write_truncates() {
        let store = MemTextStore::new();
        store.put("people", "old content");
        store.open_write("people").unwrap();
        assert_eq!(store.get("people"), Some(Vec::new()));
    }

    #[test]
    fn test_mem_text_store_missing_artifact() {
        let store = MemTextStore::new();
        let err = store.open_read("nope").err().unwrap();
        assert!(matches!(err, VaultError::SourceUnavailable(name) if name == "nope"));
    }
}
