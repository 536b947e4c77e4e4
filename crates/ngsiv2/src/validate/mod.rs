//! Field-syntax validation for entities before they are sent to a broker.
//!
//! Brokers reject ids, types, attribute names and metadata names that are
//! too long or contain characters reserved by the URL and query grammars.
//! Attribute and metadata values are not checked.

use crate::error::ValidationError;
use crate::model::{is_reserved_key, Entity};

/// Maximum length of ids, types, attribute and metadata names.
pub const MAX_FIELD_LEN: usize = 256;

/// Characters never allowed in ids, types and names.
pub const FORBIDDEN_CHARS: [char; 8] = ['<', '>', '"', '\'', '=', ';', '(', ')'];

/// Validates one identifier-like field. Empty values are accepted here; callers
/// decide whether a field is required.
pub fn validate_field(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > MAX_FIELD_LEN {
        return Err(ValidationError::FieldTooLong {
            field,
            len,
            max: MAX_FIELD_LEN,
        });
    }

    if let Some(c) = value
        .chars()
        .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_whitespace() || c.is_control())
    {
        return Err(ValidationError::ForbiddenCharacter {
            field,
            value: value.to_string(),
            char: c,
        });
    }

    Ok(())
}

fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    validate_field(field, name)
}

/// Validates an entity's id, type, attribute names and metadata names.
pub fn validate_entity(entity: &Entity) -> Result<(), ValidationError> {
    if entity.id.is_empty() {
        return Err(ValidationError::EmptyId);
    }
    validate_field("id", &entity.id)?;
    validate_field("type", &entity.entity_type)?;

    for (name, attribute) in &entity.attributes {
        if is_reserved_key(name) {
            return Err(ValidationError::ReservedAttributeName { name: name.clone() });
        }
        validate_name("attribute name", name)?;
        for metadata_name in attribute.metadata.keys() {
            validate_name("metadata name", metadata_name)?;
        }
    }

    Ok(())
}
