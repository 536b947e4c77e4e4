//! JSON encoding/decoding of entities.
//!
//! The wire form of an entity is one flat object holding both the envelope
//! keys and one key per attribute:
//!
//! ```text
//! {"id": "r1", "type": "Room",
//!  "temperature": {"type": "Float", "value": 23, "metadata": {}}}
//! ```
//!
//! Attribute names are not known ahead of time, so decoding runs two passes
//! over the same object: a typed pass for the envelope, then a generic pass
//! over the remaining keys once every [reserved key](crate::model::RESERVED_KEYS)
//! has been removed. An attribute that shares its name with a reserved key
//! cannot be represented and is dropped in both directions.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::codec::json_kind;
use crate::error::{DecodeError, EncodeError};
use crate::model::{is_reserved_key, Attribute, Entity, RESERVED_KEYS};

/// The fixed part of the entity object.
#[derive(Deserialize)]
struct Envelope {
    id: String,
    #[serde(rename = "type", default)]
    entity_type: Option<String>,
}

// =============================================================================
// DECODING
// =============================================================================

/// Splits a decoded JSON object into envelope and attributes.
pub(crate) fn entity_from_json(value: JsonValue) -> Result<Entity, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::NotAnObject {
            found: json_kind(&value),
        });
    }

    // Pass 1: the typed envelope.
    let envelope = Envelope::deserialize(&value).map_err(|err| DecodeError::InvalidEnvelope {
        message: err.to_string(),
    })?;

    // Pass 2: the same object as a generic map, minus the envelope keys.
    let mut fields = match value {
        JsonValue::Object(fields) => fields,
        _ => serde_json::Map::new(),
    };
    for key in RESERVED_KEYS {
        fields.remove(key);
    }

    let attributes =
        match serde_json::from_value::<BTreeMap<String, Attribute>>(JsonValue::Object(fields)) {
            Ok(attributes) => attributes,
            Err(err) => {
                tracing::warn!(
                    entity = %envelope.id,
                    error = %err,
                    "attributes did not decode, keeping the entity without them"
                );
                BTreeMap::new()
            }
        };

    Ok(Entity {
        id: envelope.id,
        entity_type: envelope.entity_type.unwrap_or_default(),
        attributes,
    })
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        entity_from_json(value).map_err(D::Error::custom)
    }
}

/// Decodes one entity from JSON bytes.
pub fn decode_entity(input: &[u8]) -> Result<Entity, DecodeError> {
    let value: JsonValue = serde_json::from_slice(input)?;
    entity_from_json(value)
}

/// Decodes a JSON array of entities, preserving source order.
pub fn decode_entities(input: &[u8]) -> Result<Vec<Entity>, DecodeError> {
    let value: JsonValue = serde_json::from_slice(input)?;
    match value {
        JsonValue::Array(items) => items.into_iter().map(entity_from_json).collect(),
        other => Err(DecodeError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

// =============================================================================
// ENCODING
// =============================================================================

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        // Envelope first; attributes never overwrite a reserved key.
        map.serialize_entry("id", &self.id)?;
        if !self.entity_type.is_empty() {
            map.serialize_entry("type", &self.entity_type)?;
        }
        for (name, attribute) in &self.attributes {
            if is_reserved_key(name) {
                continue;
            }
            map.serialize_entry(name, attribute)?;
        }
        map.end()
    }
}

/// Encodes one entity as JSON bytes.
pub fn encode_entity(entity: &Entity) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(entity)?)
}

/// Encodes a sequence of entities as a JSON array.
pub fn encode_entities(entities: &[Entity]) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(entities)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeType, Metadata, Value};
    use serde_json::json;

    const ROOM: &str = r#"{"id":"r1","type":"Room","pressure":{"type":"Integer","value":"720","metadata":{}},"temperature":{"type":"Float","value":23,"metadata":{}}}"#;

    #[test]
    fn test_decode_broker_entity() {
        let entity = decode_entity(ROOM.as_bytes()).unwrap();

        assert_eq!(entity.id, "r1");
        assert_eq!(entity.entity_type, "Room");
        assert_eq!(entity.attributes.len(), 2);
        assert_eq!(
            entity.attributes["temperature"].attribute_type(),
            Some(AttributeType::Float)
        );
        assert_eq!(entity.attributes["temperature"].as_float(), Ok(23.0));
        // String payload under an Integer tag survives as a raw value.
        assert_eq!(
            entity.attributes["pressure"].value,
            Value::Raw {
                attr_type: Some(AttributeType::Integer),
                value: json!("720"),
            }
        );
    }

    #[test]
    fn test_integer_accessor_on_wire_number() {
        let entity =
            decode_entity(br#"{"id":"r1","pressure":{"type":"Integer","value":720}}"#).unwrap();
        assert_eq!(entity.get_attribute("pressure").unwrap().as_integer(), Ok(720));
    }

    #[test]
    fn test_encode_flat_object() {
        let mut entity = Entity::new("r1", "Room");
        entity.set_attribute_as_float("temperature", 23.5);

        let json: JsonValue = serde_json::from_slice(&encode_entity(&entity).unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "r1",
                "type": "Room",
                "temperature": {"type": "Float", "value": 23.5, "metadata": {}}
            })
        );
    }

    #[test]
    fn test_empty_type_omitted() {
        let entity = Entity::new("r1", "");
        assert_eq!(encode_entity(&entity).unwrap(), br#"{"id":"r1"}"#);

        let decoded = decode_entity(br#"{"id":"r1"}"#).unwrap();
        assert_eq!(decoded, entity);
    }

    #[test]
    fn test_reserved_attribute_names_do_not_corrupt_output() {
        let mut entity = Entity::new("r1", "Room");
        entity.set_attribute_as_string("id", "shadow");
        entity.set_attribute_as_string("type", "shadow");
        entity.set_attribute_as_integer("floor", 2);

        let bytes = encode_entity(&entity).unwrap();
        let json: JsonValue = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["id"], json!("r1"));
        assert_eq!(json["type"], json!("Room"));
        assert_eq!(json.as_object().unwrap().len(), 3);

        let decoded = decode_entity(&bytes).unwrap();
        assert_eq!(decoded.id, "r1");
        assert_eq!(decoded.entity_type, "Room");
        assert!(!decoded.attributes.contains_key("id"));
        assert!(!decoded.attributes.contains_key("type"));
        assert_eq!(decoded.attributes.len(), 1);
    }

    #[test]
    fn test_reserved_keys_never_become_attributes() {
        let entity = decode_entity(br#"{"id":"r1","temperature":{"type":"Float","value":1}}"#)
            .unwrap();
        assert_eq!(entity.entity_type, "");
        assert_eq!(entity.attributes.keys().collect::<Vec<_>>(), ["temperature"]);
    }

    #[test]
    fn test_roundtrip_with_metadata_and_unknown_types() {
        let mut entity = Entity::new("urn:ngsi-ld:Room:1", "Room");
        entity.insert_attribute(
            "temperature",
            Attribute::new(21.5)
                .with_metadata("unit", Metadata::new("CEL"))
                .with_metadata("accuracy", Metadata::new(Value::Percentage(0.95))),
        );
        entity.insert_attribute(
            "location",
            Attribute::new(Value::Raw {
                attr_type: Some(AttributeType::Other("geo:json".to_string())),
                value: json!({"type": "Point", "coordinates": [2.18, 41.37]}),
            }),
        );
        entity.set_attribute_as_integer("pressure", 720);
        entity
            .set_attribute_as_datetime("observedAt", 1_710_513_000_000_000, 60)
            .unwrap();

        let decoded = decode_entity(&encode_entity(&entity).unwrap()).unwrap();
        assert_eq!(decoded, entity);
    }

    #[test]
    fn test_nan_attribute_is_an_encode_error() {
        let mut entity = Entity::new("r1", "Room");
        entity.set_attribute_as_float("t", f64::NAN);
        assert!(matches!(encode_entity(&entity), Err(EncodeError::Json { .. })));

        entity.set_attribute_as_float("t", 21.0);
        entity.set_attribute_as_percentage("humidity", f64::INFINITY);
        assert!(matches!(
            encode_entities(std::slice::from_ref(&entity)),
            Err(EncodeError::Json { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            decode_entity(br#"{"id":"r1","#),
            Err(DecodeError::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            decode_entity(br#"["r1"]"#),
            Err(DecodeError::NotAnObject { found: "array" })
        );
    }

    #[test]
    fn test_missing_or_mistyped_id() {
        assert!(matches!(
            decode_entity(br#"{"type":"Room"}"#),
            Err(DecodeError::InvalidEnvelope { .. })
        ));
        assert!(matches!(
            decode_entity(br#"{"id":7}"#),
            Err(DecodeError::InvalidEnvelope { .. })
        ));
        assert!(matches!(
            decode_entity(br#"{"id":"r1","type":["Room"]}"#),
            Err(DecodeError::InvalidEnvelope { .. })
        ));
    }

    #[test]
    fn test_bad_attributes_degrade_to_empty() {
        // keyValues-style payload: attributes are bare values.
        let entity = decode_entity(br#"{"id":"r1","type":"Room","temperature":23}"#).unwrap();
        assert_eq!(entity.id, "r1");
        assert_eq!(entity.entity_type, "Room");
        assert!(entity.attributes.is_empty());
    }

    #[test]
    fn test_decode_entities_preserves_order() {
        let input = br#"[{"id":"r2","type":"Room","temperature":{"type":"Float","value":34,"metadata":{}}},{"id":"r5","type":"Room","temperature":{"type":"Float","value":31,"metadata":{}}}
]"#;
        let entities = decode_entities(input).unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].id, "r2");
        assert_eq!(entities[0].attributes["temperature"].as_float(), Ok(34.0));
        assert_eq!(entities[1].id, "r5");
        assert_eq!(entities[1].attributes["temperature"].as_float(), Ok(31.0));
    }

    #[test]
    fn test_decode_entities_not_an_array() {
        assert_eq!(
            decode_entities(br#"{"id":"r1"}"#),
            Err(DecodeError::NotAnArray { found: "object" })
        );
    }

    #[test]
    fn test_encode_entities() {
        let entities = vec![Entity::new("a", ""), Entity::new("b", "T")];
        assert_eq!(
            encode_entities(&entities).unwrap(),
            br#"[{"id":"a"},{"id":"b","type":"T"}]"#
        );
    }
}
