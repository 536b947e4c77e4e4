//! Simple decoder to inspect NGSIv2 entity dumps.
//!
//! Accepts either a single entity object or an array of entities, e.g. the
//! body of `GET /v2/entities` saved to a file.

use std::fs;
use ngsiv2::{decode_entities, decode_entity, Entity, Value};

fn format_value(v: &Value) -> String {
    match v {
        Value::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.chars().count() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        Value::Integer(n) => format!("{}", n),
        Value::Float(f) => format!("{:.6}", f),
        Value::Percentage(p) => format!("{:.2}%", p * 100.0),
        Value::DateTime(s) => format!("DATETIME({})", s),
        Value::Raw { attr_type, value } => match attr_type {
            Some(t) => format!("RAW<{}>({})", t, value),
            None => format!("RAW({})", value),
        },
    }
}

fn print_entity(i: usize, entity: &Entity) {
    if entity.entity_type.is_empty() {
        println!("[{}] {}", i, entity.id);
    } else {
        println!("[{}] {} ({})", i, entity.id, entity.entity_type);
    }
    for (name, attribute) in entity.attributes.iter().take(10) {
        println!("      {} = {}", name, format_value(&attribute.value));
        for (md_name, metadata) in &attribute.metadata {
            println!("        @{} = {}", md_name, format_value(&metadata.value));
        }
    }
    if entity.attributes.len() > 10 {
        println!("      ... and {} more attributes", entity.attributes.len() - 10);
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "entities.json".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let starts_with_array = data
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[');
    let entities = if starts_with_array {
        decode_entities(&data).expect("Failed to decode")
    } else {
        vec![decode_entity(&data).expect("Failed to decode")]
    };

    let attribute_count: usize = entities.iter().map(|e| e.attributes.len()).sum();
    println!("\n=== Entities ({}) ===", entities.len());
    println!("  Attributes: {}", attribute_count);

    println!("\n=== First 20 Entities (detail) ===");
    for (i, entity) in entities.iter().take(20).enumerate() {
        print_entity(i, entity);
    }
}
