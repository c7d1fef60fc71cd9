use crate::domain::board::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which entity is draggable on the board view
///
/// Exactly one of tasks or columns is draggable at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Tasks can be dragged between columns
    #[default]
    Tasks,
    /// Columns can be dragged to reorder them
    Columns,
}

impl LayoutMode {
    pub fn from_editing_layout(editing_layout: bool) -> Self {
        if editing_layout {
            Self::Columns
        } else {
            Self::Tasks
        }
    }

    pub fn editing_layout(&self) -> bool {
        matches!(self, Self::Columns)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Tasks => Self::Columns,
            Self::Columns => Self::Tasks,
        }
    }

    /// Checks whether task cards are draggable for this viewer
    pub fn tasks_draggable(&self, role: Role) -> bool {
        *self == Self::Tasks && role.can_move_tasks()
    }

    /// Checks whether columns are draggable for this viewer
    pub fn columns_draggable(&self, role: Role) -> bool {
        *self == Self::Columns && role.can_reorder_columns()
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tasks => write!(f, "tasks"),
            Self::Columns => write!(f, "columns"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_task_mode() {
        assert_eq!(LayoutMode::default(), LayoutMode::Tasks);
        assert!(!LayoutMode::default().editing_layout());
    }

    #[test]
    fn test_editing_layout_round_trip() {
        assert_eq!(LayoutMode::from_editing_layout(true), LayoutMode::Columns);
        assert_eq!(LayoutMode::from_editing_layout(false), LayoutMode::Tasks);
        assert_eq!(LayoutMode::Tasks.toggled(), LayoutMode::Columns);
        assert_eq!(LayoutMode::Columns.toggled(), LayoutMode::Tasks);
    }

    #[test]
    fn test_exactly_one_axis_draggable() {
        for mode in [LayoutMode::Tasks, LayoutMode::Columns] {
            let tasks = mode.tasks_draggable(Role::Admin);
            let columns = mode.columns_draggable(Role::Admin);
            assert!(tasks ^ columns, "mode {} must enable one axis", mode);
        }
    }

    #[test]
    fn test_role_gating() {
        assert!(!LayoutMode::Columns.columns_draggable(Role::Member));
        assert!(LayoutMode::Tasks.tasks_draggable(Role::Member));
        assert!(!LayoutMode::Tasks.tasks_draggable(Role::Guest));
    }
}
