//! JSON encoding/decoding of typed values, attributes and metadata.
//!
//! Wire form of both attributes and metadata:
//!
//! ```text
//! {"type": "<AttributeType>", "value": <any>, "metadata": {...}}
//! ```
//!
//! `type` is omitted when absent. `metadata` exists only on attributes and is
//! always written, as `{}` when empty; on decode a missing or `null` metadata
//! is an empty map.

use std::collections::BTreeMap;

use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::model::{Attribute, AttributeType, Metadata, Value};

// =============================================================================
// DECODING
// =============================================================================

/// 2^63, the first `f64` past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Builds a [`Value`] from a decoded type tag and raw JSON payload.
///
/// Known tags with a conforming payload get their dedicated variant. JSON does
/// not distinguish integer from float literals, so `Integer` accepts any number
/// within the `i64` range and truncates it toward zero. Anything else becomes
/// [`Value::Raw`].
pub fn decode_value(attr_type: Option<AttributeType>, raw: JsonValue) -> Value {
    match (attr_type, raw) {
        (Some(AttributeType::String), JsonValue::String(s)) => Value::String(s),
        (Some(AttributeType::DateTime), JsonValue::String(s)) => Value::DateTime(s),
        (Some(AttributeType::Integer), JsonValue::Number(n)) => match n.as_i64() {
            Some(v) => Value::Integer(v),
            None => match n.as_f64().map(f64::trunc) {
                Some(f) if f >= -I64_BOUND && f < I64_BOUND => Value::Integer(f as i64),
                _ => Value::Raw {
                    attr_type: Some(AttributeType::Integer),
                    value: JsonValue::Number(n),
                },
            },
        },
        (Some(AttributeType::Float), JsonValue::Number(n)) => match n.as_f64() {
            Some(f) => Value::Float(f),
            None => Value::Raw {
                attr_type: Some(AttributeType::Float),
                value: JsonValue::Number(n),
            },
        },
        (Some(AttributeType::Percentage), JsonValue::Number(n)) => match n.as_f64() {
            Some(f) => Value::Percentage(f),
            None => Value::Raw {
                attr_type: Some(AttributeType::Percentage),
                value: JsonValue::Number(n),
            },
        },
        (attr_type, value) => Value::Raw { attr_type, value },
    }
}

#[derive(Deserialize)]
struct WireMetadata {
    #[serde(rename = "type", default)]
    attr_type: Option<AttributeType>,
    #[serde(default)]
    value: JsonValue,
}

#[derive(Deserialize)]
struct WireAttribute {
    #[serde(rename = "type", default)]
    attr_type: Option<AttributeType>,
    #[serde(default)]
    value: JsonValue,
    #[serde(default)]
    metadata: Option<BTreeMap<String, Metadata>>,
}

impl<'de> Deserialize<'de> for AttributeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(AttributeType::from_wire(&tag))
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireMetadata::deserialize(deserializer)?;
        Ok(Metadata {
            value: decode_value(wire.attr_type, wire.value),
        })
    }
}

impl<'de> Deserialize<'de> for Attribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireAttribute::deserialize(deserializer)?;
        Ok(Attribute {
            value: decode_value(wire.attr_type, wire.value),
            metadata: wire.metadata.unwrap_or_default(),
        })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Serializes the payload of a value without copying it.
struct Payload<'a>(&'a Value);

impl Serialize for Payload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::String(s) | Value::DateTime(s) => serializer.serialize_str(s),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) | Value::Percentage(v) => {
                // JSON has no NaN or infinity literal.
                if !v.is_finite() {
                    return Err(S::Error::custom(format!("non-finite number {}", v)));
                }
                serializer.serialize_f64(*v)
            }
            Value::Raw { value, .. } => value.serialize(serializer),
        }
    }
}

impl Serialize for AttributeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(tag) = self.value.type_name() {
            map.serialize_entry("type", tag)?;
        }
        map.serialize_entry("value", &Payload(&self.value))?;
        map.end()
    }
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(tag) = self.value.type_name() {
            map.serialize_entry("type", tag)?;
        }
        map.serialize_entry("value", &Payload(&self.value))?;
        map.serialize_entry("metadata", &self.metadata)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use serde_json::json;

    #[test]
    fn test_decode_integer_from_float_number() {
        assert_eq!(
            decode_value(Some(AttributeType::Integer), json!(720.0)),
            Value::Integer(720)
        );
        assert_eq!(
            decode_value(Some(AttributeType::Integer), json!(720)),
            Value::Integer(720)
        );
        assert_eq!(
            decode_value(Some(AttributeType::Integer), json!(-7.9)),
            Value::Integer(-7)
        );
    }

    #[test]
    fn test_decode_integer_out_of_range_is_raw() {
        let value = decode_value(Some(AttributeType::Integer), json!(1e30));
        assert_eq!(
            value,
            Value::Raw {
                attr_type: Some(AttributeType::Integer),
                value: json!(1e30),
            }
        );
        assert!(matches!(value.as_integer(), Err(ModelError::InvalidValue { .. })));

        assert!(matches!(
            decode_value(Some(AttributeType::Integer), json!(u64::MAX)),
            Value::Raw { .. }
        ));
        assert!(matches!(
            decode_value(Some(AttributeType::Integer), json!(9.223372036854775808e18)),
            Value::Raw { .. }
        ));
        assert_eq!(
            decode_value(Some(AttributeType::Integer), json!(-9.223372036854775808e18)),
            Value::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_non_finite_float_fails_to_encode() {
        let values = [
            Value::Float(f64::NAN),
            Value::Float(f64::INFINITY),
            Value::Percentage(f64::NEG_INFINITY),
        ];
        for value in values {
            assert!(serde_json::to_string(&Attribute::new(value.clone())).is_err());
            let attr = Attribute::new(1i64).with_metadata("accuracy", Metadata::new(value));
            assert!(serde_json::to_string(&attr).is_err());
        }
    }

    #[test]
    fn test_decode_float_from_integer_literal() {
        assert_eq!(decode_value(Some(AttributeType::Float), json!(23)), Value::Float(23.0));
    }

    #[test]
    fn test_decode_non_conforming_payload_is_raw() {
        assert_eq!(
            decode_value(Some(AttributeType::Integer), json!("720")),
            Value::Raw {
                attr_type: Some(AttributeType::Integer),
                value: json!("720"),
            }
        );
        assert_eq!(
            decode_value(Some(AttributeType::String), json!(null)),
            Value::Raw {
                attr_type: Some(AttributeType::String),
                value: JsonValue::Null,
            }
        );
    }

    #[test]
    fn test_decode_unknown_tag() {
        let value = decode_value(Some(AttributeType::from_wire("geo:json")), json!({"type": "Point"}));
        assert_eq!(value.type_name(), Some("geo:json"));
    }

    #[test]
    fn test_attribute_json() {
        let attr = Attribute::new(23.5).with_metadata("unit", Metadata::new("CEL"));
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "Float",
                "value": 23.5,
                "metadata": {"unit": {"type": "String", "value": "CEL"}}
            })
        );
    }

    #[test]
    fn test_empty_metadata_written_as_object() {
        let json = serde_json::to_string(&Attribute::new("on")).unwrap();
        assert_eq!(json, r#"{"type":"String","value":"on","metadata":{}}"#);
    }

    #[test]
    fn test_null_or_missing_metadata_decodes_empty() {
        let attr: Attribute =
            serde_json::from_str(r#"{"type":"Integer","value":5,"metadata":null}"#).unwrap();
        assert!(attr.metadata.is_empty());
        assert_eq!(attr.as_integer(), Ok(5));

        let attr: Attribute = serde_json::from_str(r#"{"type":"Integer","value":5}"#).unwrap();
        assert!(attr.metadata.is_empty());
    }

    #[test]
    fn test_untyped_attribute_roundtrip() {
        let attr: Attribute = serde_json::from_str(r#"{"value":[1,2],"metadata":{}}"#).unwrap();
        assert_eq!(attr.attribute_type(), None);
        assert_eq!(
            serde_json::to_string(&attr).unwrap(),
            r#"{"value":[1,2],"metadata":{}}"#
        );
    }
}
