//! Core abstractions for schema-evolution-safe backup and restore.
//!
//! This module provides the foundational types and traits used throughout
//! the library:
//!
//! - [`value`]: typed field values and semantic column types
//! - [`schema`]: table and column descriptors
//! - [`registry`]: explicit registry of the schemas active for one run
//! - [`traits`]: collaborator seams for row stores and artifact stores
//!
//! The codec itself never talks to a database engine; everything it needs
//! from the outside world arrives through the traits defined here.

pub mod registry;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use registry::SchemaRegistry;
pub use schema::{ColumnSpec, TableSchema};
pub use traits::{RowCursor, RowSink, RowSource, TextStore};
pub use value::{EnumSpec, GeoAngle, Row, ScalarCodec, SemanticType, Value};
