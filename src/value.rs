//! Resolved values and type conversion.
//!
//! Every resolved field ends up as a [`Value`]. Scalar fields produce one
//! of the scalar variants according to their declared [`ExpectedType`];
//! repeated-model fields always produce [`Value::Records`].

use std::fmt;

use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::record::Record;

/// A value resolved from a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw or sanitized string.
    Str(String),
    /// Converted integer.
    Int(i64),
    /// Converted float.
    Float(f64),
    /// Converted boolean.
    Bool(bool),
    /// Records produced by a repeated-model descriptor, one per matched
    /// sub-node.
    Records(Vec<Record>),
}

impl Value {
    /// Return the string form if this is a `Str` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Return the integer if this is an `Int` value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Return the float if this is a `Float` value.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Return the records if this value came from a repeated-model
    /// descriptor.
    #[must_use]
    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            Value::Records(records) => Some(records),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Records(records) => write!(f, "[{} records]", records.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Conversion target for a scalar field without a custom parse function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpectedType {
    /// Keep the sanitized string as-is. The default.
    #[default]
    Str,
    /// Parse as a signed 64-bit integer.
    Int,
    /// Parse as a 64-bit float.
    Float,
    /// Parse as a boolean (`true`/`false`, case-insensitive).
    Bool,
}

impl ExpectedType {
    /// Human-readable name used in conversion errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ExpectedType::Str => "string",
            ExpectedType::Int => "integer",
            ExpectedType::Float => "float",
            ExpectedType::Bool => "boolean",
        }
    }

    /// Convert a sanitized matched string to this type.
    ///
    /// Numeric and boolean conversions trim surrounding whitespace first;
    /// string conversion keeps the input untouched.
    ///
    /// # Errors
    /// Returns `TypeConversion` if the string does not parse as this type.
    /// Conversion failures indicate a model/document mismatch and are
    /// never papered over with a default.
    pub fn convert(self, raw: &str) -> Result<Value> {
        let mismatch = || ExtractError::TypeConversion {
            value: raw.to_string(),
            expected: self.name().to_string(),
        };

        match self {
            ExpectedType::Str => Ok(Value::Str(raw.to_string())),
            ExpectedType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| mismatch()),
            ExpectedType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| mismatch()),
            ExpectedType::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(mismatch()),
            },
        }
    }
}
