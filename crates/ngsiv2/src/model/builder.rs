//! Builder API for ergonomic entity and batch construction.
//!
//! # Example
//!
//! ```rust
//! use ngsiv2::model::builder::BatchUpdateBuilder;
//! use ngsiv2::{ActionType, Metadata};
//!
//! let batch = BatchUpdateBuilder::new(ActionType::Append)
//!     .entity("Room1", |e| e
//!         .entity_type("Room")
//!         .float("temperature", 23.0)
//!         .metadata("temperature", "unit", Metadata::new("CEL"))
//!         .integer("pressure", 720)
//!     )
//!     .entity("Room2", |e| e.entity_type("Room").string("name", "Hall"))
//!     .build();
//!
//! assert_eq!(batch.entities.len(), 2);
//! assert_eq!(batch.entities[0].id, "Room1");
//! ```

use crate::error::ModelError;
use crate::model::{ActionType, Attribute, BatchUpdate, Entity, Metadata, Value};

/// Builder for a single [`Entity`].
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    entity: Entity,
}

impl EntityBuilder {
    /// Creates a builder for an untyped entity with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            entity: Entity::new(id, ""),
        }
    }

    /// Sets the entity type.
    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity.entity_type = entity_type.into();
        self
    }

    /// Adds a fully-formed attribute.
    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.entity.insert_attribute(name, attribute);
        self
    }

    /// Adds an attribute with the given value and no metadata.
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attribute(name, Attribute::new(value))
    }

    pub fn string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.value(name, Value::String(value.into()))
    }

    pub fn integer(self, name: impl Into<String>, value: i64) -> Self {
        self.value(name, Value::Integer(value))
    }

    pub fn float(self, name: impl Into<String>, value: f64) -> Self {
        self.value(name, Value::Float(value))
    }

    pub fn percentage(self, name: impl Into<String>, value: f64) -> Self {
        self.value(name, Value::Percentage(value))
    }

    /// Adds a `DateTime` attribute; fails if the instant cannot be represented.
    pub fn datetime(
        self,
        name: impl Into<String>,
        epoch_micros: i64,
        offset_min: i16,
    ) -> Result<Self, ModelError> {
        Ok(self.value(name, Value::datetime(epoch_micros, offset_min)?))
    }

    /// Attaches metadata to an attribute added earlier. Ignored if the
    /// attribute does not exist yet.
    pub fn metadata(
        mut self,
        attribute: &str,
        name: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        if let Some(attr) = self.entity.attribute_mut(attribute) {
            attr.metadata.insert(name.into(), metadata);
        }
        self
    }

    pub fn build(self) -> Entity {
        self.entity
    }
}

/// Builder for a [`BatchUpdate`].
#[derive(Debug, Clone)]
pub struct BatchUpdateBuilder {
    batch: BatchUpdate,
}

impl BatchUpdateBuilder {
    pub fn new(action_type: ActionType) -> Self {
        Self {
            batch: BatchUpdate::new(action_type),
        }
    }

    /// Appends an entity built with a builder function.
    pub fn entity<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(EntityBuilder) -> EntityBuilder,
    {
        self.batch.add_entity(f(EntityBuilder::new(id)).build());
        self
    }

    /// Appends an already built entity.
    pub fn add(mut self, entity: Entity) -> Self {
        self.batch.add_entity(entity);
        self
    }

    pub fn build(self) -> BatchUpdate {
        self.batch
    }
}
