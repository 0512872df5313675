//! Per-type token codec.
//!
//! One canonical text form per semantic type, with decoding the strict
//! inverse of encoding. The forms are part of the artifact format and must
//! stay byte-stable across releases:
//!
//! - bool: `"1"` / `"0"`
//! - integers: decimal, no leading zeros except the literal `0`
//! - floats: lowercase hex of the IEEE-754 bit pattern, no padding, so
//!   `0.0` is `"0"` and sign/NaN/infinity bits survive exactly
//! - char: decimal Unicode codepoint; the zero char is the absent token
//! - text: verbatim (record layer quotes when needed)
//! - blob: standard base64
//! - datetime: integer milliseconds since the Unix epoch
//! - enum: the variant name, validated against the column's
//!   [`EnumSpec`](crate::core::value::EnumSpec)
//! - custom: whatever the column's
//!   [`ScalarCodec`](crate::core::value::ScalarCodec) emits
//!
//! Absence is the empty unquoted token for every type; a present-but-empty
//! text or blob is kept distinguishable by quoting (see
//! [`record`](crate::codec::record)).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::DateTime;

use crate::codec::record::Field;
use crate::core::schema::ColumnSpec;
use crate::core::value::{SemanticType, Value};
use crate::error::{Result, VaultError};

/// Encode one value under its column's type.
///
/// `None` is the absent empty token. `Some` text may itself be empty (a
/// present-but-empty text or blob); the record writer quotes it so the two
/// stay distinguishable.
pub fn encode(column: &ColumnSpec, value: &Value) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    let token = match (&column.ty, value) {
        (SemanticType::Bool, Value::Bool(v)) => if *v { "1" } else { "0" }.to_string(),
        (SemanticType::I8, Value::I8(v)) => v.to_string(),
        (SemanticType::I16, Value::I16(v)) => v.to_string(),
        (SemanticType::I32, Value::I32(v)) => v.to_string(),
        (SemanticType::I64, Value::I64(v)) => v.to_string(),
        (SemanticType::F32, Value::F32(v)) => format!("{:x}", v.to_bits()),
        (SemanticType::F64, Value::F64(v)) => format!("{:x}", v.to_bits()),
        (SemanticType::Char, Value::Char(c)) => {
            // The zero char and the absent value share the empty token.
            if *c == '\0' {
                return Ok(None);
            }
            (*c as u32).to_string()
        }
        (SemanticType::Text, Value::Text(s)) => s.clone(),
        (SemanticType::Blob, Value::Blob(b)) => BASE64.encode(b),
        (SemanticType::DateTime, Value::DateTime(ts)) => ts.timestamp_millis().to_string(),
        (SemanticType::Enum(spec), Value::Enum(variant)) => {
            if !spec.contains(variant) {
                return Err(VaultError::kind_mismatch(
                    &column.name,
                    format!("variant of enum {}", spec.name()),
                    format!("{:?}", variant),
                ));
            }
            variant.clone()
        }
        (SemanticType::Custom(codec), Value::Custom(bits)) => codec.encode(*bits),
        (ty, value) => {
            return Err(VaultError::kind_mismatch(
                &column.name,
                ty.to_string(),
                value.kind_name(),
            ))
        }
    };
    Ok(Some(token))
}

/// Decode one field back into a [`Value`] under its column's type.
///
/// An empty unquoted field is the absent value for every type. Everything
/// else must parse exactly, or the whole table import fails with
/// [`VaultError::MalformedToken`].
pub fn decode(column: &ColumnSpec, field: &Field) -> Result<Value> {
    if field.text.is_empty() && !field.quoted {
        return Ok(Value::Null);
    }
    let token = field.text.as_str();
    let malformed = |reason: String| {
        VaultError::malformed(&column.name, column.ty.to_string(), token, reason)
    };
    match &column.ty {
        SemanticType::Bool => match token {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            _ => Err(malformed("expected \"1\" or \"0\"".to_string())),
        },
        SemanticType::I8 => token
            .parse::<i8>()
            .map(Value::I8)
            .map_err(|e| malformed(e.to_string())),
        SemanticType::I16 => token
            .parse::<i16>()
            .map(Value::I16)
            .map_err(|e| malformed(e.to_string())),
        SemanticType::I32 => token
            .parse::<i32>()
            .map(Value::I32)
            .map_err(|e| malformed(e.to_string())),
        SemanticType::I64 => token
            .parse::<i64>()
            .map(Value::I64)
            .map_err(|e| malformed(e.to_string())),
        SemanticType::F32 => u32::from_str_radix(token, 16)
            .map(|bits| Value::F32(f32::from_bits(bits)))
            .map_err(|e| malformed(e.to_string())),
        SemanticType::F64 => u64::from_str_radix(token, 16)
            .map(|bits| Value::F64(f64::from_bits(bits)))
            .map_err(|e| malformed(e.to_string())),
        SemanticType::Char => {
            let codepoint = token.parse::<u32>().map_err(|e| malformed(e.to_string()))?;
            char::from_u32(codepoint)
                .map(Value::Char)
                .ok_or_else(|| malformed("not a Unicode scalar value".to_string()))
        }
        SemanticType::Text => Ok(Value::Text(token.to_string())),
        SemanticType::Blob => BASE64
            .decode(token)
            .map(Value::Blob)
            .map_err(|e| malformed(e.to_string())),
        SemanticType::DateTime => {
            let ms = token.parse::<i64>().map_err(|e| malformed(e.to_string()))?;
            DateTime::from_timestamp_millis(ms)
                .map(Value::DateTime)
                .ok_or_else(|| malformed("timestamp out of range".to_string()))
        }
        SemanticType::Enum(spec) => {
            if spec.contains(token) {
                Ok(Value::Enum(token.to_string()))
            } else {
                Err(malformed(format!("not a variant of enum {}", spec.name())))
            }
        }
        SemanticType::Custom(codec) => codec
            .decode(token)
            .map(Value::Custom)
            .map_err(malformed),
    }
}
