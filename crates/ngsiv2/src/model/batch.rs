//! Batch update operations (`POST /v2/op/update`).

use serde::{Deserialize, Serialize};

use crate::model::Entity;

/// How the broker applies the entities of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    /// Create entities, or add/replace attributes on existing ones.
    Append,
    /// Like `Append`, but fails for attributes that already exist.
    AppendStrict,
    /// Update existing attributes; fails for missing ones.
    Update,
    /// Delete the listed attributes, or the whole entity if none are listed.
    Delete,
    /// Replace all attributes of existing entities.
    Replace,
}

impl ActionType {
    /// Returns the wire name of this action.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Append => "append",
            ActionType::AppendStrict => "appendStrict",
            ActionType::Update => "update",
            ActionType::Delete => "delete",
            ActionType::Replace => "replace",
        }
    }
}

/// An action plus an ordered list of entities, sent as one request.
///
/// Entity order is the broker's processing order and is never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdate {
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl BatchUpdate {
    /// Creates an empty batch for the given action.
    pub fn new(action_type: ActionType) -> Self {
        BatchUpdate {
            action_type,
            entities: Vec::new(),
        }
    }

    /// Appends an entity to the batch.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
