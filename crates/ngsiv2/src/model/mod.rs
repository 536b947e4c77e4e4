//! Data model types for NGSIv2.
//!
//! - Values (typed attribute and metadata payloads)
//! - Attributes and metadata
//! - Entities (envelope plus attribute bag)
//! - Batch updates
//! - Builders (ergonomic construction)

pub mod attribute;
pub mod batch;
pub mod builder;
pub mod entity;
pub mod resources;
pub mod value;

pub use attribute::{Attribute, Metadata};
pub use batch::{ActionType, BatchUpdate};
pub use builder::{BatchUpdateBuilder, EntityBuilder};
pub use entity::{is_reserved_key, Entity, RESERVED_KEYS};
pub use resources::ApiResources;
pub use value::{AttributeType, Value};
