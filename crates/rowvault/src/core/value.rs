//! Typed field values and the semantic column types understood by the codec.
//!
//! Every backed-up column carries a [`SemanticType`] that fixes both the
//! in-memory representation ([`Value`]) and the canonical text form used in
//! artifacts. The type set is closed except for [`SemanticType::Custom`],
//! which delegates to a [`ScalarCodec`] registered alongside the column.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A named set of symbolic variants for an enumerated column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    name: String,
    variants: Vec<String>,
}

impl EnumSpec {
    /// Create an enum type from its name and variant names.
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Type name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All variant names, in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Check whether `variant` is a member of this enum.
    #[must_use]
    pub fn contains(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}

/// Codec for a custom scalar type.
///
/// A custom scalar holds a raw payload of up to 64 bits and defines its own
/// canonical text form. Implementations must be exact: `decode(&encode(b))`
/// returns `b` for every payload the type can produce.
pub trait ScalarCodec: fmt::Debug + Send + Sync {
    /// Name of the scalar type, used in diagnostics.
    fn type_name(&self) -> &str;

    /// Canonical text form of a raw payload.
    fn encode(&self, bits: u64) -> String;

    /// Parse the canonical text form back into the raw payload.
    ///
    /// On failure, returns a human-readable reason; callers wrap it into a
    /// [`VaultError::MalformedToken`](crate::error::VaultError::MalformedToken).
    fn decode(&self, token: &str) -> std::result::Result<u64, String>;
}

/// A geographic angle in degrees, stored as the raw bits of an `f64`.
///
/// Reference [`ScalarCodec`] implementation: the canonical text form is the
/// lowercase hex of the bit pattern, the same exactness rule floats use.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoAngle;

impl GeoAngle {
    /// Raw payload for an angle in degrees.
    #[must_use]
    pub fn to_bits(degrees: f64) -> u64 {
        degrees.to_bits()
    }

    /// Angle in degrees for a raw payload.
    #[must_use]
    pub fn from_bits(bits: u64) -> f64 {
        f64::from_bits(bits)
    }
}

impl ScalarCodec for GeoAngle {
    fn type_name(&self) -> &str {
        "geo_angle"
    }

    fn encode(&self, bits: u64) -> String {
        format!("{:x}", bits)
    }

    fn decode(&self, token: &str) -> std::result::Result<u64, String> {
        u64::from_str_radix(token, 16).map_err(|e| format!("not a hex bit pattern: {}", e))
    }
}

/// Semantic column types understood by the codec.
///
/// Each type fixes one canonical text form; see [`codec::token`](crate::codec::token).
#[derive(Debug, Clone)]
pub enum SemanticType {
    /// Boolean (`"1"`/`"0"` in text form).
    Bool,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit IEEE-754 float (hex bit pattern in text form).
    F32,
    /// 64-bit IEEE-754 float (hex bit pattern in text form).
    F64,
    /// Unicode scalar (decimal codepoint in text form; zero means absent).
    Char,
    /// UTF-8 text.
    Text,
    /// Binary blob (base64 in text form).
    Blob,
    /// Millisecond-resolution UTC timestamp (epoch ms in text form).
    DateTime,
    /// Symbolic member of a named enum.
    Enum(Arc<EnumSpec>),
    /// Custom scalar with a registered codec.
    Custom(Arc<dyn ScalarCodec>),
}

impl SemanticType {
    /// Construct an enum column type.
    pub fn enumeration(spec: EnumSpec) -> Self {
        SemanticType::Enum(Arc::new(spec))
    }

    /// Construct a custom scalar column type.
    pub fn custom(codec: impl ScalarCodec + 'static) -> Self {
        SemanticType::Custom(Arc::new(codec))
    }
}

impl PartialEq for SemanticType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SemanticType::Bool, SemanticType::Bool)
            | (SemanticType::I8, SemanticType::I8)
            | (SemanticType::I16, SemanticType::I16)
            | (SemanticType::I32, SemanticType::I32)
            | (SemanticType::I64, SemanticType::I64)
            | (SemanticType::F32, SemanticType::F32)
            | (SemanticType::F64, SemanticType::F64)
            | (SemanticType::Char, SemanticType::Char)
            | (SemanticType::Text, SemanticType::Text)
            | (SemanticType::Blob, SemanticType::Blob)
            | (SemanticType::DateTime, SemanticType::DateTime) => true,
            (SemanticType::Enum(a), SemanticType::Enum(b)) => a == b,
            // Custom scalars compare by registered type name.
            (SemanticType::Custom(a), SemanticType::Custom(b)) => {
                a.type_name() == b.type_name()
            }
            _ => false,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Bool => write!(f, "bool"),
            SemanticType::I8 => write!(f, "i8"),
            SemanticType::I16 => write!(f, "i16"),
            SemanticType::I32 => write!(f, "i32"),
            SemanticType::I64 => write!(f, "i64"),
            SemanticType::F32 => write!(f, "f32"),
            SemanticType::F64 => write!(f, "f64"),
            SemanticType::Char => write!(f, "char"),
            SemanticType::Text => write!(f, "text"),
            SemanticType::Blob => write!(f, "blob"),
            SemanticType::DateTime => write!(f, "datetime"),
            SemanticType::Enum(spec) => write!(f, "enum {}", spec.name()),
            SemanticType::Custom(codec) => write!(f, "custom {}", codec.type_name()),
        }
    }
}

/// A single typed field value.
///
/// `Null` is the explicit absent value and is distinct from any zero-valued
/// default (`I32(0)`, empty `Text`, empty `Blob`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 8-bit signed integer.
    I8(i8),

    /// 16-bit signed integer.
    I16(i16),

    /// 32-bit signed integer.
    I32(i32),

    /// 64-bit signed integer.
    I64(i64),

    /// 32-bit floating point.
    F32(f32),

    /// 64-bit floating point.
    F64(f64),

    /// Unicode scalar value.
    Char(char),

    /// UTF-8 text.
    Text(String),

    /// Binary blob.
    Blob(Vec<u8>),

    /// Millisecond-resolution UTC timestamp.
    DateTime(DateTime<Utc>),

    /// Symbolic variant of the column's enumerated type.
    Enum(String),

    /// Raw bit payload of a registered custom scalar.
    Custom(u64),
}

/// One row of values, in schema column order.
pub type Row = Vec<Value>;

impl Value {
    /// Check if this value is absent.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of this value's kind, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Char(_) => "char",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::DateTime(_) => "datetime",
            Value::Enum(_) => "enum",
            Value::Custom(_) => "custom",
        }
    }

    /// Check whether this value is representable in a column of type `ty`.
    ///
    /// `Null` fits every column type; nullability is enforced by the schema,
    /// not here.
    #[must_use]
    pub fn fits(&self, ty: &SemanticType) -> bool {
        match (self, ty) {
            (Value::Null, _)
            | (Value::Bool(_), SemanticType::Bool)
            | (Value::I8(_), SemanticType::I8)
            | (Value::I16(_), SemanticType::I16)
            | (Value::I32(_), SemanticType::I32)
            | (Value::I64(_), SemanticType::I64)
            | (Value::F32(_), SemanticType::F32)
            | (Value::F64(_), SemanticType::F64)
            | (Value::Char(_), SemanticType::Char)
            | (Value::Text(_), SemanticType::Text)
            | (Value::Blob(_), SemanticType::Blob)
            | (Value::DateTime(_), SemanticType::DateTime)
            | (Value::Custom(_), SemanticType::Custom(_)) => true,
            (Value::Enum(variant), SemanticType::Enum(spec)) => spec.contains(variant),
            _ => false,
        }
    }

    /// Build a timestamp value from milliseconds since the Unix epoch.
    ///
    /// Returns `None` when `ms` is outside the representable range.
    #[must_use]
    pub fn from_epoch_ms(ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(ms).map(Value::DateTime)
    }
}

// From implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    // The format holds millisecond resolution, so anything finer is
    // truncated here, at construction, not during encode.
    fn from(v: DateTime<Utc>) -> Self {
        Value::from_epoch_ms(v.timestamp_millis()).unwrap_or(Value::DateTime(v))
    }
}
