//! NGSIv2: context entity model and client for FIWARE context brokers.
//!
//! This crate provides the entity/attribute data model, its JSON wire codec,
//! the `q` simple query language, and a blocking request builder for brokers
//! such as Orion that speak the NGSIv2 REST API.
//!
//! # Overview
//!
//! An NGSIv2 entity is an `id`, an optional `type`, and a dynamic set of
//! typed attributes serialized side by side in one flat JSON object:
//! - **Model**: [`Entity`], [`Attribute`], [`Metadata`] and the closed
//!   [`Value`] union with a raw escape hatch for unknown types
//! - **Codec**: decoding tolerates attribute shapes it cannot read and keeps
//!   the entity envelope
//! - **Query**: validated [`QueryStatement`]s rendered into the `q` parameter
//! - **Client**: request construction over any [`client::Transport`]
//!
//! # Quick Start
//!
//! ```rust
//! use ngsiv2::{decode_entity, encode_entity, EntityBuilder, Metadata};
//!
//! let room = EntityBuilder::new("urn:ngsi-ld:Room:1")
//!     .entity_type("Room")
//!     .float("temperature", 23.5)
//!     .integer("pressure", 720)
//!     .metadata("temperature", "unit", Metadata::new("CEL"))
//!     .build();
//!
//! let bytes = encode_entity(&room).unwrap();
//! let decoded = decode_entity(&bytes).unwrap();
//! assert_eq!(decoded.get_attribute("temperature").unwrap().as_float(), Ok(23.5));
//! assert_eq!(room, decoded);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Entities, attributes, values, batch updates and builders
//! - [`codec`]: JSON encoding/decoding
//! - [`query`]: The `q` filter grammar
//! - [`validate`]: Field-syntax checks for outgoing entities
//! - [`client`]: Broker operations over a pluggable transport
//! - [`error`]: Error types
//!
//! # Reserved names
//!
//! `id` and `type` belong to the entity envelope. An attribute stored under
//! either name is dropped when decoding and skipped when encoding, and
//! [`validate_entity`] rejects it.

pub mod client;
pub mod codec;
pub mod error;
pub mod model;
pub mod query;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use client::{Client, ClientBuilder, ClientConfig, ListEntitiesParams, RetrieveEntityParams};
pub use codec::{
    decode_api_resources, decode_batch_update, decode_entities, decode_entity,
    encode_batch_update, encode_entities, encode_entity,
};
pub use error::{ClientError, DecodeError, EncodeError, ModelError, QueryError, ValidationError};
pub use model::{
    ActionType, ApiResources, Attribute, AttributeType, BatchUpdate, BatchUpdateBuilder, Entity,
    EntityBuilder, Metadata, Value, RESERVED_KEYS,
};
pub use query::{join_statements, MatchOperator, QueryStatement, SimpleOperator};
pub use validate::{validate_entity, validate_field};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// NGSI API version this crate speaks.
pub const API_VERSION: &str = "v2";
