//! Typed values for NGSIv2 attributes and metadata.
//!
//! A [`Value`] pairs the declared wire type with its payload. Known type tags
//! whose payload has the expected JSON shape decode into dedicated variants;
//! everything else is kept verbatim in [`Value::Raw`] so it round-trips.

use std::fmt;

use crate::error::ModelError;
use crate::util::datetime::{format_datetime, parse_datetime};

/// Attribute and metadata type tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    Float,
    Integer,
    Percentage,
    DateTime,
    /// Any tag this crate has no dedicated variant for.
    Other(String),
}

impl AttributeType {
    /// Creates an AttributeType from its wire tag. Never fails.
    pub fn from_wire(tag: &str) -> AttributeType {
        match tag {
            "String" => AttributeType::String,
            "Float" => AttributeType::Float,
            "Integer" => AttributeType::Integer,
            "Percentage" => AttributeType::Percentage,
            "DateTime" => AttributeType::DateTime,
            other => AttributeType::Other(other.to_string()),
        }
    }

    /// Returns the wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeType::String => "String",
            AttributeType::Float => "Float",
            AttributeType::Integer => "Integer",
            AttributeType::Percentage => "Percentage",
            AttributeType::DateTime => "DateTime",
            AttributeType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AttributeType {
    fn from(tag: &str) -> Self {
        AttributeType::from_wire(tag)
    }
}

/// A typed attribute or metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),

    /// Integer payload. The wire number is truncated toward zero on decode.
    Integer(i64),

    Float(f64),

    Percentage(f64),

    /// ISO 8601 text, kept verbatim. See [`Value::as_datetime`].
    DateTime(String),

    /// A tag/payload pair with no dedicated variant: an unknown or missing
    /// tag, or a known tag whose payload has an unexpected JSON shape.
    Raw {
        attr_type: Option<AttributeType>,
        value: serde_json::Value,
    },
}

impl Value {
    /// Creates a DateTime value from microseconds since the Unix epoch and a
    /// UTC offset in minutes.
    ///
    /// Fails with [`ModelError::InvalidValue`] for an offset beyond `±23:59`
    /// or an instant outside years 0000 to 9999.
    pub fn datetime(epoch_micros: i64, offset_min: i16) -> Result<Value, ModelError> {
        format_datetime(epoch_micros, offset_min)
            .map(Value::DateTime)
            .map_err(|err| ModelError::InvalidValue {
                expected: AttributeType::DateTime,
                found: err.message,
            })
    }

    /// Returns the declared type of this value, if any.
    pub fn attribute_type(&self) -> Option<AttributeType> {
        self.type_name().map(AttributeType::from_wire)
    }

    /// Returns the wire tag of this value, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::String(_) => Some("String"),
            Value::Integer(_) => Some("Integer"),
            Value::Float(_) => Some("Float"),
            Value::Percentage(_) => Some("Percentage"),
            Value::DateTime(_) => Some("DateTime"),
            Value::Raw { attr_type, .. } => attr_type.as_ref().map(AttributeType::as_str),
        }
    }

    pub fn as_str(&self) -> Result<&str, ModelError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(AttributeType::String)),
        }
    }

    pub fn as_integer(&self) -> Result<i64, ModelError> {
        match self {
            Value::Integer(v) => Ok(*v),
            other => Err(other.mismatch(AttributeType::Integer)),
        }
    }

    pub fn as_float(&self) -> Result<f64, ModelError> {
        match self {
            Value::Float(v) => Ok(*v),
            other => Err(other.mismatch(AttributeType::Float)),
        }
    }

    pub fn as_percentage(&self) -> Result<f64, ModelError> {
        match self {
            Value::Percentage(v) => Ok(*v),
            other => Err(other.mismatch(AttributeType::Percentage)),
        }
    }

    /// Parses a DateTime value into microseconds since the Unix epoch and the
    /// UTC offset in minutes it was written with.
    pub fn as_datetime(&self) -> Result<(i64, i16), ModelError> {
        match self {
            Value::DateTime(text) => parse_datetime(text).map_err(|err| ModelError::InvalidValue {
                expected: AttributeType::DateTime,
                found: err.message,
            }),
            other => Err(other.mismatch(AttributeType::DateTime)),
        }
    }

    fn mismatch(&self, expected: AttributeType) -> ModelError {
        match self {
            Value::Raw {
                attr_type: Some(tag),
                value,
            } if *tag == expected => ModelError::InvalidValue {
                expected,
                found: value.to_string(),
            },
            other => ModelError::TypeMismatch {
                expected,
                found: other.type_name().unwrap_or("untyped").to_string(),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}
