//! Attributes and their metadata.

use std::collections::BTreeMap;

use crate::error::ModelError;
use crate::model::{AttributeType, Value};

/// Metadata attached to an attribute: a typed value with no further nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub value: Value,
}

impl Metadata {
    pub fn new(value: impl Into<Value>) -> Self {
        Metadata {
            value: value.into(),
        }
    }

    pub fn attribute_type(&self) -> Option<AttributeType> {
        self.value.attribute_type()
    }

    pub fn as_str(&self) -> Result<&str, ModelError> {
        self.value.as_str()
    }

    pub fn as_integer(&self) -> Result<i64, ModelError> {
        self.value.as_integer()
    }

    pub fn as_float(&self) -> Result<f64, ModelError> {
        self.value.as_float()
    }

    pub fn as_percentage(&self) -> Result<f64, ModelError> {
        self.value.as_percentage()
    }

    pub fn as_datetime(&self) -> Result<(i64, i16), ModelError> {
        self.value.as_datetime()
    }
}

/// A typed property of an entity, with optional metadata keyed by name.
///
/// The metadata map is always present on the wire, as `{}` when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub value: Value,
    pub metadata: BTreeMap<String, Metadata>,
}

impl Attribute {
    /// Creates an attribute with no metadata.
    pub fn new(value: impl Into<Value>) -> Self {
        Attribute {
            value: value.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a metadata entry.
    pub fn with_metadata(mut self, name: impl Into<String>, metadata: Metadata) -> Self {
        self.metadata.insert(name.into(), metadata);
        self
    }

    /// Looks up a metadata entry by name.
    pub fn metadata(&self, name: &str) -> Option<&Metadata> {
        self.metadata.get(name)
    }

    pub fn attribute_type(&self) -> Option<AttributeType> {
        self.value.attribute_type()
    }

    /// Returns the value as a string; fails unless the type is `String`.
    pub fn as_str(&self) -> Result<&str, ModelError> {
        self.value.as_str()
    }

    /// Returns the value as an integer; fails unless the type is `Integer`.
    pub fn as_integer(&self) -> Result<i64, ModelError> {
        self.value.as_integer()
    }

    /// Returns the value as a float; fails unless the type is `Float`.
    pub fn as_float(&self) -> Result<f64, ModelError> {
        self.value.as_float()
    }

    pub fn as_percentage(&self) -> Result<f64, ModelError> {
        self.value.as_percentage()
    }

    /// See [`Value::as_datetime`].
    pub fn as_datetime(&self) -> Result<(i64, i16), ModelError> {
        self.value.as_datetime()
    }
}
