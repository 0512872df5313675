//! Collaborator traits for row stores and text artifact stores.
//!
//! This module defines the seams between the codec and its surroundings:
//!
//! - [`RowSource`] / [`RowCursor`]: read rows out of a relational store
//! - [`RowSink`]: insert rows back into a relational store
//! - [`TextStore`]: named text artifacts, one per backed-up table
//!
//! All traits are synchronous; backup and restore process one table at a
//! time on the calling thread. The bundled [`stores`](crate::stores) module
//! provides in-memory and filesystem implementations.

use std::io::{Read, Write};

use crate::core::value::Row;
use crate::error::Result;

/// Read access to the rows of a relational store.
pub trait RowSource {
    /// Open a cursor over every row of `table`, in storage order.
    ///
    /// Returns [`VaultError::TableNotFound`](crate::error::VaultError::TableNotFound)
    /// when the store has no such table; runners treat that as a skip, not a
    /// failure.
    fn open_scan(&self, table: &str) -> Result<Box<dyn RowCursor + '_>>;
}

/// Cursor over the rows of one table.
pub trait RowCursor {
    /// The next row in column order, or `None` once the scan is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

/// Write access to the rows of a relational store.
pub trait RowSink {
    /// Insert one row into `table`.
    ///
    /// Values arrive in the current schema's column order. Inserts are
    /// independent: a failed insert must not undo earlier ones.
    fn insert_row(&mut self, table: &str, row: Row) -> Result<()>;
}

/// Named text artifacts, one per backed-up table.
pub trait TextStore {
    /// Open `name` for writing, replacing any previous artifact.
    fn open_write(&self, name: &str) -> Result<Box<dyn Write + '_>>;

    /// Open `name` for reading.
    ///
    /// Returns [`VaultError::SourceUnavailable`](crate::error::VaultError::SourceUnavailable)
    /// when no such artifact exists; runners treat that as a skip.
    fn open_read(&self, name: &str) -> Result<Box<dyn Read + '_>>;
}
