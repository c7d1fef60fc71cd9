//! In-memory state of the board currently being viewed.
//!
//! The store is the only owner of the board's statuses and tasks. Every
//! mutation validates its input before writing anything, so callers never
//! observe a half-applied change.

use crate::{
    domain::{
        board::Board,
        status::{self, Status, StatusId},
        task::{Task, TaskId},
    },
    error::{BoardError, Result},
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Full copy of the store's collections
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub board: Option<Board>,
    pub statuses: Vec<Status>,
    pub tasks: Vec<Task>,
}

/// Previous title and description of a task, captured before an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct BoardStore {
    board: Option<Board>,
    statuses: Vec<Status>,
    tasks: Vec<Task>,
    loaded_at: Option<DateTime<Utc>>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole board with freshly fetched data
    pub fn load(&mut self, board: Board, mut statuses: Vec<Status>, tasks: Vec<Task>) {
        status::sort_by_order(&mut statuses);
        self.board = Some(board);
        self.statuses = statuses;
        self.tasks = tasks;
        self.loaded_at = Some(Utc::now());
    }

    /// Swaps in a fresh status list, leaving tasks alone
    pub fn replace_statuses(&mut self, mut statuses: Vec<Status>) {
        status::sort_by_order(&mut statuses);
        self.statuses = statuses;
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.board.is_some()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Statuses in left-to-right order
    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn status(&self, id: StatusId) -> Option<&Status> {
        self.statuses.iter().find(|s| s.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks belonging to one column
    pub fn tasks_in(&self, status_id: StatusId) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_in(status_id)).collect()
    }

    /// Status ids in left-to-right order
    pub fn status_order(&self) -> Vec<StatusId> {
        self.statuses.iter().map(|s| s.id).collect()
    }

    /// Rewrites every status's order to its index in `ordered`
    pub fn apply_column_order(&mut self, ordered: &[StatusId]) -> Result<()> {
        let current: HashSet<StatusId> = self.statuses.iter().map(|s| s.id).collect();
        let requested: HashSet<StatusId> = ordered.iter().copied().collect();

        if ordered.len() != self.statuses.len() || requested != current {
            return Err(BoardError::OrderMismatch(format!(
                "expected {} distinct status ids, got {:?}",
                self.statuses.len(),
                ordered
            )));
        }

        for (index, id) in ordered.iter().enumerate() {
            if let Some(status) = self.statuses.iter_mut().find(|s| s.id == *id) {
                status.order = index as u32;
            }
        }
        status::sort_by_order(&mut self.statuses);
        Ok(())
    }

    /// Moves one task to another column, returning the column it was in
    pub fn apply_task_status(&mut self, task_id: TaskId, status_id: StatusId) -> Result<StatusId> {
        if self.status(status_id).is_none() {
            return Err(BoardError::StatusNotFound(status_id.to_string()));
        }
        let task = self.task_mut(task_id)?;

        let previous = task.status_id;
        task.status_id = status_id;
        Ok(previous)
    }

    /// Puts a task back into `previous`, but only if it still sits in
    /// `expected`
    ///
    /// Returns false when the task is gone or something else moved it in the
    /// meantime; that later write is left alone.
    pub fn revert_task_status_if(
        &mut self,
        task_id: TaskId,
        expected: StatusId,
        previous: StatusId,
    ) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) if task.status_id == expected => {
                task.status_id = previous;
                true
            }
            _ => false,
        }
    }

    /// Overwrites a task's title and description, returning the old values
    pub fn apply_task_fields(
        &mut self,
        task_id: TaskId,
        title: String,
        description: Option<String>,
    ) -> Result<TaskFields> {
        let task = self.task_mut(task_id)?;

        let previous = TaskFields {
            title: std::mem::replace(&mut task.title, title),
            description: std::mem::replace(&mut task.description, description),
        };
        Ok(previous)
    }

    /// Restores a task's title and description if they still hold `expected`
    pub fn revert_task_fields_if(
        &mut self,
        task_id: TaskId,
        expected: &TaskFields,
        previous: TaskFields,
    ) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) if task.title == expected.title && task.description == expected.description => {
                task.title = previous.title;
                task.description = previous.description;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: self.board.clone(),
            statuses: self.statuses.clone(),
            tasks: self.tasks.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        self.board = snapshot.board;
        self.statuses = snapshot.statuses;
        self.tasks = snapshot.tasks;
    }

    fn task_mut(&mut self, task_id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{board::BoardId, status::orders_are_dense};

    fn loaded_store() -> BoardStore {
        let board_id = BoardId::new(1);
        let statuses = vec![
            Status::new(StatusId::new(1), board_id, "To Do".to_string(), 0),
            Status::new(StatusId::new(2), board_id, "Doing".to_string(), 1),
            Status::new(StatusId::new(3), board_id, "Done".to_string(), 2),
        ];
        let tasks = vec![
            Task::new(TaskId::new(10), board_id, StatusId::new(1), "A".to_string()),
            Task::new(TaskId::new(11), board_id, StatusId::new(1), "B".to_string()),
            Task::new(TaskId::new(12), board_id, StatusId::new(2), "C".to_string()),
        ];

        let mut store = BoardStore::new();
        store.load(Board::new(board_id, "Test".to_string()), statuses, tasks);
        store
    }

    #[test]
    fn test_load_sorts_statuses() {
        let board_id = BoardId::new(1);
        let mut store = BoardStore::new();
        assert!(!store.is_loaded());

        store.load(
            Board::new(board_id, "Test".to_string()),
            vec![
                Status::new(StatusId::new(2), board_id, "B".to_string(), 1),
                Status::new(StatusId::new(1), board_id, "A".to_string(), 0),
            ],
            Vec::new(),
        );

        assert!(store.is_loaded());
        assert!(store.loaded_at().is_some());
        assert_eq!(store.status_order(), vec![StatusId::new(1), StatusId::new(2)]);
    }

    #[test]
    fn test_replace_statuses_keeps_tasks() {
        let mut store = loaded_store();
        store
            .apply_task_fields(TaskId::new(10), "A2".to_string(), None)
            .unwrap();
        let board_id = BoardId::new(1);

        store.replace_statuses(vec![
            Status::new(StatusId::new(3), board_id, "Done".to_string(), 1),
            Status::new(StatusId::new(2), board_id, "Doing".to_string(), 0),
            Status::new(StatusId::new(1), board_id, "To Do".to_string(), 2),
        ]);

        assert_eq!(
            store.status_order(),
            vec![StatusId::new(2), StatusId::new(3), StatusId::new(1)]
        );
        assert_eq!(store.task(TaskId::new(10)).unwrap().title, "A2");
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn test_apply_column_order() {
        let mut store = loaded_store();
        let order = vec![StatusId::new(3), StatusId::new(1), StatusId::new(2)];

        store.apply_column_order(&order).unwrap();

        assert_eq!(store.status_order(), order);
        assert!(orders_are_dense(store.statuses()));
        assert_eq!(store.status(StatusId::new(3)).unwrap().order, 0);
    }

    #[test]
    fn test_apply_column_order_rejects_mismatch() {
        let mut store = loaded_store();
        let before = store.snapshot();

        let missing = store.apply_column_order(&[StatusId::new(1), StatusId::new(2)]);
        assert!(matches!(missing, Err(BoardError::OrderMismatch(_))));

        let duplicate =
            store.apply_column_order(&[StatusId::new(1), StatusId::new(1), StatusId::new(2)]);
        assert!(duplicate.is_err());

        let unknown =
            store.apply_column_order(&[StatusId::new(1), StatusId::new(2), StatusId::new(9)]);
        assert!(unknown.is_err());

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_apply_task_status() {
        let mut store = loaded_store();

        let previous = store
            .apply_task_status(TaskId::new(10), StatusId::new(3))
            .unwrap();

        assert_eq!(previous, StatusId::new(1));
        assert_eq!(store.task(TaskId::new(10)).unwrap().status_id, StatusId::new(3));
        assert_eq!(store.task(TaskId::new(11)).unwrap().status_id, StatusId::new(1));
        assert_eq!(store.tasks_in(StatusId::new(3)).len(), 1);
    }

    #[test]
    fn test_apply_task_status_errors() {
        let mut store = loaded_store();

        assert!(matches!(
            store.apply_task_status(TaskId::new(99), StatusId::new(2)),
            Err(BoardError::TaskNotFound(_))
        ));
        assert!(matches!(
            store.apply_task_status(TaskId::new(10), StatusId::new(99)),
            Err(BoardError::StatusNotFound(_))
        ));
        assert_eq!(store.task(TaskId::new(10)).unwrap().status_id, StatusId::new(1));
    }

    #[test]
    fn test_revert_task_status_if() {
        let mut store = loaded_store();
        store
            .apply_task_status(TaskId::new(10), StatusId::new(3))
            .unwrap();

        assert!(store.revert_task_status_if(TaskId::new(10), StatusId::new(3), StatusId::new(1)));
        assert_eq!(store.task(TaskId::new(10)).unwrap().status_id, StatusId::new(1));
    }

    #[test]
    fn test_revert_task_status_skips_newer_write() {
        let mut store = loaded_store();
        store
            .apply_task_status(TaskId::new(10), StatusId::new(3))
            .unwrap();
        store
            .apply_task_status(TaskId::new(10), StatusId::new(2))
            .unwrap();

        assert!(!store.revert_task_status_if(TaskId::new(10), StatusId::new(3), StatusId::new(1)));
        assert_eq!(store.task(TaskId::new(10)).unwrap().status_id, StatusId::new(2));
    }

    #[test]
    fn test_apply_and_revert_task_fields() {
        let mut store = loaded_store();

        let previous = store
            .apply_task_fields(TaskId::new(11), "B2".to_string(), Some("more".to_string()))
            .unwrap();
        assert_eq!(previous.title, "B");
        assert_eq!(store.task(TaskId::new(11)).unwrap().title, "B2");

        let applied = TaskFields {
            title: "B2".to_string(),
            description: Some("more".to_string()),
        };
        assert!(store.revert_task_fields_if(TaskId::new(11), &applied, previous));

        let task = store.task(TaskId::new(11)).unwrap();
        assert_eq!(task.title, "B");
        assert!(task.description.is_none());
    }

    #[test]
    fn test_snapshot_and_restore() {
        let mut store = loaded_store();
        let snapshot = store.snapshot();

        store
            .apply_column_order(&[StatusId::new(2), StatusId::new(3), StatusId::new(1)])
            .unwrap();
        store
            .apply_task_status(TaskId::new(12), StatusId::new(3))
            .unwrap();
        assert_ne!(store.snapshot(), snapshot);

        store.restore(snapshot.clone());
        assert_eq!(store.snapshot(), snapshot);
    }
}
