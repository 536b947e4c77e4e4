//! Context entities.
//!
//! An entity is an identity (`id`, optional `type`) plus an open set of named
//! attributes. The JSON form is a single flat object; see
//! [`codec::entity`](crate::codec::entity) for how the two halves are merged
//! and split.

use std::collections::BTreeMap;

use crate::error::ModelError;
use crate::model::{Attribute, Value};

/// Envelope keys. An attribute may never use one of these names.
pub const RESERVED_KEYS: [&str; 2] = ["id", "type"];

/// Returns true if `name` is one of [`RESERVED_KEYS`].
pub fn is_reserved_key(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// A context entity: a thing in the NGSI model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub id: String,
    /// Entity type. Empty means untyped and is omitted on the wire.
    pub entity_type: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Entity {
    /// Creates an entity with the given id and type and no attributes.
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Entity {
            id: id.into(),
            entity_type: entity_type.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Looks up an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Result<&Attribute, ModelError> {
        self.attributes
            .get(name)
            .ok_or_else(|| ModelError::MissingAttribute {
                name: name.to_string(),
            })
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.get_mut(name)
    }

    /// Inserts an attribute, returning the one it replaced.
    pub fn insert_attribute(
        &mut self,
        name: impl Into<String>,
        attribute: Attribute,
    ) -> Option<Attribute> {
        self.attributes.insert(name.into(), attribute)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    pub fn set_attribute_as_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set_value(name, Value::String(value.into()));
    }

    pub fn set_attribute_as_integer(&mut self, name: impl Into<String>, value: i64) {
        self.set_value(name, Value::Integer(value));
    }

    pub fn set_attribute_as_float(&mut self, name: impl Into<String>, value: f64) {
        self.set_value(name, Value::Float(value));
    }

    pub fn set_attribute_as_percentage(&mut self, name: impl Into<String>, value: f64) {
        self.set_value(name, Value::Percentage(value));
    }

    /// Sets a `DateTime` attribute from microseconds since the Unix epoch.
    /// The entity is left unchanged if the instant cannot be represented.
    pub fn set_attribute_as_datetime(
        &mut self,
        name: impl Into<String>,
        epoch_micros: i64,
        offset_min: i16,
    ) -> Result<(), ModelError> {
        let value = Value::datetime(epoch_micros, offset_min)?;
        self.set_value(name, value);
        Ok(())
    }

    // Setters always start from empty metadata.
    fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), Attribute::new(value));
    }
}
