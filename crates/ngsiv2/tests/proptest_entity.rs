use std::collections::BTreeMap;

use proptest::prelude::*;
use ngsiv2::{decode_entity, encode_entity, Attribute, Entity, Metadata, Value};

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        ".{0,16}".prop_map(Value::String),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e12f64..1.0e12).prop_map(Value::Float),
        (0.0f64..=1.0).prop_map(Value::Percentage),
        (0i64..4_102_444_800_000_000, -720i16..=720)
            .prop_map(|(micros, offset)| Value::datetime(micros, offset).unwrap()),
    ]
}

fn attribute_strategy() -> impl Strategy<Value = Attribute> {
    (
        value_strategy(),
        prop::collection::btree_map("[a-z]{1,8}", value_strategy(), 0..3),
    )
        .prop_map(|(value, metadata)| Attribute {
            value,
            metadata: metadata
                .into_iter()
                .map(|(name, value)| (name, Metadata { value }))
                .collect(),
        })
}

/// Attribute names that never collide with the envelope keys.
fn attribute_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,12}".prop_filter("reserved", |name| name != "id" && name != "type")
}

fn entity_strategy() -> impl Strategy<Value = Entity> {
    (
        "[a-zA-Z0-9:_-]{1,24}",
        "([A-Z][a-zA-Z]{0,10})?",
        prop::collection::btree_map(attribute_name(), attribute_strategy(), 0..6),
    )
        .prop_map(|(id, entity_type, attributes): (String, String, BTreeMap<String, Attribute>)| {
            Entity {
                id,
                entity_type,
                attributes,
            }
        })
}

proptest! {
    #[test]
    fn entity_roundtrip(entity in entity_strategy()) {
        let bytes = encode_entity(&entity).unwrap();
        let decoded = decode_entity(&bytes).unwrap();
        prop_assert_eq!(decoded, entity);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_entity(&bytes);
    }
}
