//! The board view: one board's state plus its drag handlers.
//!
//! `BoardView` is driven from a single event loop. Drag handlers and engine
//! computations finish synchronously; only remote commits and refetches
//! await. Store locks are never held across an `.await`, so several commits
//! may be in flight while the user keeps interacting with the board.

use crate::{
    api::{BoardApi, UpdateTaskRequest},
    domain::{
        board::{BoardId, Role},
        drag::{DragSession, DragTracker},
        layout::LayoutMode,
        status::{Status, StatusId},
        task::{Task, TaskId},
    },
    engine::{plan_task_move, reorder_columns},
    error::{BoardError, Result},
    store::{BoardStore, TaskFields},
    sync::{SyncCoordinator, SyncOutcome},
};
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What a drop did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing changed and nothing was sent
    NoOp,
    /// The change was applied and the remote accepted it
    Committed,
    /// The remote rejected the change and the board snapped back
    RolledBack,
}

/// New title and description for a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: String,
    pub description: Option<String>,
}

pub struct BoardView<A: BoardApi + ?Sized> {
    board_id: BoardId,
    role: Role,
    api: Arc<A>,
    store: Mutex<BoardStore>,
    drag: Mutex<DragTracker>,
    mode: Mutex<LayoutMode>,
    sync: SyncCoordinator,
}

impl<A: BoardApi + ?Sized> BoardView<A> {
    /// Loads a board and returns a view on it in task-drag mode
    pub async fn open(api: Arc<A>, board_id: BoardId, role: Role) -> Result<Self> {
        let view = Self {
            board_id,
            role,
            api,
            store: Mutex::new(BoardStore::new()),
            drag: Mutex::new(DragTracker::new()),
            mode: Mutex::new(LayoutMode::default()),
            sync: SyncCoordinator::new(),
        };
        view.reload().await?;
        Ok(view)
    }

    /// Replaces the local board with the backend's copy
    pub async fn reload(&self) -> Result<()> {
        let board = self.api.fetch_board(self.board_id).await?;
        let statuses = self.api.fetch_statuses(self.board_id).await?;
        let tasks = self.api.fetch_tasks(self.board_id).await?;

        debug!(
            board = %self.board_id,
            statuses = statuses.len(),
            tasks = tasks.len(),
            "board loaded"
        );
        self.store.lock().load(board, statuses, tasks);
        Ok(())
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Runs `f` against the board state
    ///
    /// The store is locked for the duration of `f`; do not call back into
    /// the view from inside it.
    pub fn with_store<R>(&self, f: impl FnOnce(&BoardStore) -> R) -> R {
        f(&self.store.lock())
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.store.lock().statuses().to_vec()
    }

    pub fn task(&self, task_id: TaskId) -> Option<Task> {
        self.store.lock().task(task_id).cloned()
    }

    /// Number of remote commits still awaited
    pub fn pending_commits(&self) -> usize {
        self.sync.in_flight()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        *self.mode.lock()
    }

    pub fn editing_layout(&self) -> bool {
        self.layout_mode().editing_layout()
    }

    /// Switches between task-drag and column-drag mode
    ///
    /// A drag in progress is cancelled first, so no gesture ever spans both
    /// modes.
    pub fn set_editing_layout(&self, editing_layout: bool) {
        let next = LayoutMode::from_editing_layout(editing_layout);
        let mut mode = self.mode.lock();
        if *mode == next {
            return;
        }

        let cancelled = self.drag.lock().end();
        if !cancelled.is_idle() {
            debug!(?cancelled, "drag cancelled by layout mode switch");
        }
        *mode = next;
        debug!(mode = %next, "layout mode changed");
    }

    pub fn toggle_layout(&self) {
        let editing = self.editing_layout();
        self.set_editing_layout(!editing);
    }

    pub fn can_drag_tasks(&self) -> bool {
        self.layout_mode().tasks_draggable(self.role)
    }

    pub fn can_drag_columns(&self) -> bool {
        self.layout_mode().columns_draggable(self.role)
    }

    pub fn drag_session(&self) -> DragSession {
        self.drag.lock().session()
    }

    pub fn begin_task_drag(&self, task_id: TaskId) -> Result<()> {
        let mode = self.layout_mode();
        self.drag.lock().start_task(task_id, mode, self.role)
    }

    pub fn begin_column_drag(&self, status_id: StatusId) -> Result<()> {
        let mode = self.layout_mode();
        self.drag.lock().start_column(status_id, mode, self.role)
    }

    /// Pointer moved over a column; returns true if the hover target changed
    pub fn drag_over(&self, target: StatusId) -> bool {
        self.drag.lock().hover(target)
    }

    /// Drag gesture finished, with or without a drop
    pub fn drag_end(&self) {
        self.drag.lock().end();
    }

    /// Drops whatever is being dragged onto the `target` column
    pub async fn drop_on(&self, target: StatusId) -> DropOutcome {
        let session = self.drag.lock().take_drop();

        match session {
            DragSession::Idle => DropOutcome::NoOp,
            DragSession::DraggingTask { task, .. } => self.move_task(task, target).await,
            DragSession::DraggingColumn { status, .. } => self.reorder_column(status, target).await,
        }
    }

    /// Drops onto the column currently hovered, cancelling if there is none
    pub async fn drop_on_hovered(&self) -> DropOutcome {
        let hovered = self.drag.lock().session().hovered();
        match hovered {
            Some(target) => self.drop_on(target).await,
            None => {
                self.drag_end();
                DropOutcome::NoOp
            }
        }
    }

    /// Saves a new title and description for a task
    ///
    /// The edit shows immediately; if the backend rejects it, only the
    /// edited fields are put back.
    pub async fn save_task_edit(&self, task_id: TaskId, edit: TaskEdit) -> SyncOutcome<Task> {
        let applied = TaskFields {
            title: edit.title.clone(),
            description: edit.description.clone(),
        };

        let request = self.store.lock().task(task_id).map(|task| UpdateTaskRequest {
            title: edit.title.clone(),
            description: edit.description.clone(),
            status_id: task.status_id,
            board_id: task.board_id,
        });
        let Some(request) = request else {
            debug!(task = %task_id, "edit of unknown task ignored");
            return SyncOutcome::NotApplied(BoardError::TaskNotFound(task_id.to_string()));
        };

        self.sync
            .perform_optimistic(
                "edit task",
                || {
                    self.store
                        .lock()
                        .apply_task_fields(task_id, edit.title, edit.description)
                },
                || self.api.update_task(task_id, request),
                |previous| {
                    if !self
                        .store
                        .lock()
                        .revert_task_fields_if(task_id, &applied, previous)
                    {
                        debug!(task = %task_id, "task edited again since, keeping newer fields");
                    }
                },
            )
            .await
    }

    async fn move_task(&self, task_id: TaskId, target: StatusId) -> DropOutcome {
        let plan = plan_task_move(&self.store.lock(), task_id, target);
        let Some(plan) = plan else {
            debug!(task = %task_id, target = %target, "task drop changes nothing");
            return DropOutcome::NoOp;
        };

        debug!(task = %task_id, from = %plan.from, to = %plan.to, "moving task");
        let outcome = self
            .sync
            .perform_optimistic(
                "move task",
                || self.store.lock().apply_task_status(plan.task_id, plan.to),
                || self.api.update_task(plan.task_id, plan.request.clone()),
                |previous| {
                    if !self
                        .store
                        .lock()
                        .revert_task_status_if(plan.task_id, plan.to, previous)
                    {
                        debug!(task = %plan.task_id, "task moved again since, keeping newer column");
                    }
                },
            )
            .await;

        match outcome {
            SyncOutcome::Committed(_) => DropOutcome::Committed,
            SyncOutcome::RolledBack(_) => DropOutcome::RolledBack,
            SyncOutcome::NotApplied(_) => DropOutcome::NoOp,
        }
    }

    async fn reorder_column(&self, dragged: StatusId, target: StatusId) -> DropOutcome {
        let previous = self.store.lock().status_order();
        let Some(next) = reorder_columns(&previous, dragged, target) else {
            debug!(dragged = %dragged, target = %target, "column drop changes nothing");
            return DropOutcome::NoOp;
        };

        let outcome = self
            .sync
            .perform_optimistic(
                "reorder columns",
                || self.store.lock().apply_column_order(&next),
                || self.api.reorder_statuses(self.board_id, next.clone()),
                |()| {
                    if let Err(err) = self.store.lock().apply_column_order(&previous) {
                        error!(error = %err, "previous column order no longer applies");
                    }
                },
            )
            .await;

        match outcome {
            SyncOutcome::Committed(_) => DropOutcome::Committed,
            SyncOutcome::NotApplied(_) => DropOutcome::NoOp,
            SyncOutcome::RolledBack(_) => {
                self.resync_statuses().await;
                DropOutcome::RolledBack
            }
        }
    }

    /// Refetches column order after a rejected reorder
    ///
    /// Only statuses are replaced; tasks may have commits of their own in
    /// flight.
    async fn resync_statuses(&self) {
        let loaded_ms_ago = self
            .store
            .lock()
            .loaded_at()
            .map(|at| (Utc::now() - at).num_milliseconds());

        match self.api.fetch_statuses(self.board_id).await {
            Ok(statuses) => {
                self.store.lock().replace_statuses(statuses);
                info!(
                    board = %self.board_id,
                    ?loaded_ms_ago,
                    "statuses refetched after rejected reorder"
                );
            }
            Err(err) => error!(
                board = %self.board_id,
                error = %err,
                ?loaded_ms_ago,
                "refetch after rejected reorder failed, keeping previous column order"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::InMemoryApi, domain::board::Board};
    use tracing_test::traced_test;

    async fn admin_view() -> (Arc<InMemoryApi>, BoardView<InMemoryApi>) {
        let board_id = BoardId::new(1);
        let api = Arc::new(InMemoryApi::new().with_board(
            Board::new(board_id, "Logs".to_string()),
            vec![
                Status::new(StatusId::new(1), board_id, "A".to_string(), 0),
                Status::new(StatusId::new(2), board_id, "B".to_string(), 1),
            ],
            vec![Task::new(TaskId::new(5), board_id, StatusId::new(1), "T".to_string())],
        ));
        let view = BoardView::open(Arc::clone(&api), board_id, Role::Admin)
            .await
            .unwrap();
        (api, view)
    }

    #[tokio::test]
    #[traced_test]
    async fn test_rejected_move_is_logged() {
        let (api, view) = admin_view().await;
        api.fail_updates(true);

        view.begin_task_drag(TaskId::new(5)).unwrap();
        let outcome = view.drop_on(StatusId::new(2)).await;

        assert_eq!(outcome, DropOutcome::RolledBack);
        assert!(logs_contain("remote rejected change"));
        assert!(logs_contain("move task"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_rejected_reorder_is_refetched() {
        let (api, view) = admin_view().await;
        api.fail_reorders(true);
        view.set_editing_layout(true);

        view.begin_column_drag(StatusId::new(2)).unwrap();
        let outcome = view.drop_on(StatusId::new(1)).await;

        assert_eq!(outcome, DropOutcome::RolledBack);
        assert!(logs_contain("statuses refetched after rejected reorder"));
        assert_eq!(
            view.with_store(|store| store.status_order()),
            vec![StatusId::new(1), StatusId::new(2)]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_refetch_is_logged() {
        let (api, view) = admin_view().await;
        api.fail_reorders(true);
        api.fail_fetches(true);
        view.set_editing_layout(true);

        view.begin_column_drag(StatusId::new(2)).unwrap();
        view.drop_on(StatusId::new(1)).await;

        assert!(logs_contain("reverted locally"));
        assert!(logs_contain("keeping previous column order"));
        assert_eq!(
            view.with_store(|store| store.status_order()),
            vec![StatusId::new(1), StatusId::new(2)]
        );
    }

    #[tokio::test]
    async fn test_store_reads_do_not_block_drops() {
        let (_api, view) = admin_view().await;
        let column = view.with_store(|store| store.task(TaskId::new(5)).map(|t| t.status_id));
        assert_eq!(column, Some(StatusId::new(1)));

        view.begin_task_drag(TaskId::new(5)).unwrap();
        assert_eq!(view.drop_on(StatusId::new(2)).await, DropOutcome::Committed);
        assert_eq!(
            view.with_store(|store| store.tasks_in(StatusId::new(2)).len()),
            1
        );
    }

    #[tokio::test]
    async fn test_reload_picks_up_remote_changes() {
        let (api, view) = admin_view().await;
        api.reorder_statuses(view.board_id(), vec![StatusId::new(2), StatusId::new(1)])
            .await
            .unwrap();

        view.reload().await.unwrap();
        assert_eq!(
            view.with_store(|store| store.status_order()),
            vec![StatusId::new(2), StatusId::new(1)]
        );
    }
}
