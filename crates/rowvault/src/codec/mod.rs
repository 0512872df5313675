//! Text codec for rows: per-value tokens and record framing.
//!
//! [`token`] turns one typed value into its canonical token and back under
//! a column's declared type. [`record`] joins tokens into lines and splits
//! them again, preserving the presence marker that separates an absent
//! value from a present-but-empty one.

pub mod record;
pub mod token;

pub use record::{write_record, Field, RecordReader};
