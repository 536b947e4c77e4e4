//! JSON encoding/decoding for NGSIv2 payloads.

pub mod batch;
pub mod entity;
pub mod value;

pub use batch::{decode_api_resources, decode_batch_update, encode_batch_update};
pub use entity::{decode_entities, decode_entity, encode_entities, encode_entity};
pub use value::decode_value;

/// Names the kind of a JSON value for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
