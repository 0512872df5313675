//! Bundled store implementations.
//!
//! [`MemStore`] and [`MemTextStore`] are deterministic in-memory
//! implementations of the collaborator traits, usable both in tests and as
//! reference behavior. [`FsTextStore`] keeps one file per artifact in a
//! directory and is the store real backups run against.

pub mod fs;
pub mod mem;

pub use fs::FsTextStore;
pub use mem::{MemStore, MemTextStore};
