use crate::domain::numeric_id;
use serde::{Deserialize, Serialize};
use std::fmt;

numeric_id!(
    /// Unique identifier for a board
    BoardId
);

/// Board record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_template: bool,
}

impl Board {
    pub fn new(id: BoardId, name: String) -> Self {
        Self {
            id,
            name,
            description: None,
            is_public: false,
            is_template: false,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }
}

/// What the current viewer is allowed to do on a board
///
/// The backend enforces the same rules; on the client the role only gates
/// which drag gestures are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Board owner or administrator: may move tasks and reorder columns
    Admin,
    /// Regular member: may move tasks
    Member,
    /// Read-only viewer, e.g. through a public share link
    Guest,
}

impl Role {
    pub fn can_move_tasks(&self) -> bool {
        matches!(self, Self::Admin | Self::Member)
    }

    pub fn can_reorder_columns(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
            Self::Guest => write!(f, "guest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new(BoardId::new(7), "Roadmap".to_string());
        assert_eq!(board.id.get(), 7);
        assert!(!board.is_public);
        assert!(!board.is_template);
        assert!(board.description.is_none());
    }

    #[test]
    fn test_board_deserializes_camel_case() {
        let json = r#"{"id": 3, "name": "Ops", "isPublic": true}"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.id, BoardId::new(3));
        assert!(board.is_public);
        assert!(!board.is_template);
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_move_tasks());
        assert!(Role::Admin.can_reorder_columns());

        assert!(Role::Member.can_move_tasks());
        assert!(!Role::Member.can_reorder_columns());

        assert!(!Role::Guest.can_move_tasks());
        assert!(!Role::Guest.can_reorder_columns());
    }
}
