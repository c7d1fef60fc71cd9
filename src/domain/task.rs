use crate::domain::{board::BoardId, numeric_id, status::StatusId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

numeric_id!(
    /// Unique identifier for a task card
    TaskId
);

/// A task card. It belongs to exactly one status column at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub board_id: BoardId,
    pub status_id: StatusId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Custom field definition id -> value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, serde_json::Value>,
}

impl Task {
    /// Creates a new task bound to the given status
    pub fn new(id: TaskId, board_id: BoardId, status_id: StatusId, title: String) -> Self {
        Self {
            id,
            title,
            description: None,
            board_id,
            status_id,
            assignee: None,
            custom_fields: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_assignee(mut self, assignee: String) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets a custom field value
    pub fn set_custom_field(&mut self, field_id: impl Into<String>, value: serde_json::Value) {
        self.custom_fields.insert(field_id.into(), value);
    }

    pub fn is_in(&self, status_id: StatusId) -> bool {
        self.status_id == status_id
    }
}
