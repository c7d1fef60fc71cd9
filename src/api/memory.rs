use crate::{
    api::{BoardApi, UpdateTaskRequest},
    domain::{status, Board, BoardId, Status, StatusId, Task, TaskId},
    error::{BoardError, Result},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::sync::Notify;

/// A request received by [`InMemoryApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchBoard(BoardId),
    FetchStatuses(BoardId),
    FetchTasks(BoardId),
    ReorderStatuses(BoardId, Vec<StatusId>),
    UpdateTask(TaskId, UpdateTaskRequest),
}

impl ApiCall {
    /// True for calls that change remote state
    pub fn is_write(&self) -> bool {
        matches!(self, Self::ReorderStatuses(..) | Self::UpdateTask(..))
    }
}

#[derive(Debug, Default)]
struct Failures {
    fetches: bool,
    reorders: bool,
    updates: bool,
    updates_of: HashSet<TaskId>,
}

#[derive(Debug, Default)]
struct MemoryState {
    boards: Vec<Board>,
    statuses: Vec<Status>,
    tasks: Vec<Task>,
    calls: Vec<ApiCall>,
    failures: Failures,
}

/// Board backend kept entirely in memory
///
/// Applies the same validation a real backend would, records every call,
/// and can be told to reject requests or hold task updates until released.
#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: Mutex<MemoryState>,
    update_gates: Mutex<HashMap<TaskId, Arc<Notify>>>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a board with its statuses and tasks
    pub fn with_board(self, board: Board, statuses: Vec<Status>, tasks: Vec<Task>) -> Self {
        {
            let mut state = self.state.lock();
            state.boards.push(board);
            state.statuses.extend(statuses);
            state.tasks.extend(tasks);
        }
        self
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls that would have changed remote state
    pub fn write_count(&self) -> usize {
        self.state.lock().calls.iter().filter(|c| c.is_write()).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.state.lock().failures.fetches = fail;
    }

    pub fn fail_reorders(&self, fail: bool) {
        self.state.lock().failures.reorders = fail;
    }

    pub fn fail_updates(&self, fail: bool) {
        self.state.lock().failures.updates = fail;
    }

    /// Rejects every update of one task
    pub fn fail_updates_of(&self, task_id: TaskId) {
        self.state.lock().failures.updates_of.insert(task_id);
    }

    /// Makes updates of one task wait until the returned handle is
    /// notified, once per held update
    pub fn hold_updates_of(&self, task_id: TaskId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.update_gates.lock().insert(task_id, Arc::clone(&gate));
        gate
    }

    /// The backend's current copy of a task
    pub fn stored_task(&self, task_id: TaskId) -> Option<Task> {
        self.state
            .lock()
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
    }

    /// The backend's current column order for a board
    pub fn stored_order(&self, board_id: BoardId) -> Vec<StatusId> {
        let state = self.state.lock();
        let mut statuses: Vec<Status> = state
            .statuses
            .iter()
            .filter(|s| s.board_id == board_id)
            .cloned()
            .collect();
        status::sort_by_order(&mut statuses);
        statuses.into_iter().map(|s| s.id).collect()
    }
}

fn rejected(message: impl Into<String>) -> BoardError {
    BoardError::Remote {
        status: 500,
        message: message.into(),
    }
}

#[async_trait]
impl BoardApi for InMemoryApi {
    async fn fetch_board(&self, board_id: BoardId) -> Result<Board> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::FetchBoard(board_id));
        if state.failures.fetches {
            return Err(BoardError::Transport("board fetch failed".to_string()));
        }

        state
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
            .ok_or_else(|| BoardError::Remote {
                status: 404,
                message: format!("board {} not found", board_id),
            })
    }

    async fn fetch_statuses(&self, board_id: BoardId) -> Result<Vec<Status>> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::FetchStatuses(board_id));
        if state.failures.fetches {
            return Err(BoardError::Transport("status fetch failed".to_string()));
        }

        let mut statuses: Vec<Status> = state
            .statuses
            .iter()
            .filter(|s| s.board_id == board_id)
            .cloned()
            .collect();
        status::sort_by_order(&mut statuses);
        Ok(statuses)
    }

    async fn fetch_tasks(&self, board_id: BoardId) -> Result<Vec<Task>> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::FetchTasks(board_id));
        if state.failures.fetches {
            return Err(BoardError::Transport("task fetch failed".to_string()));
        }

        Ok(state
            .tasks
            .iter()
            .filter(|t| t.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn reorder_statuses(
        &self,
        board_id: BoardId,
        status_ids: Vec<StatusId>,
    ) -> Result<Vec<Status>> {
        let mut state = self.state.lock();
        state
            .calls
            .push(ApiCall::ReorderStatuses(board_id, status_ids.clone()));
        if state.failures.reorders {
            return Err(rejected("reorder rejected"));
        }

        let current: HashSet<StatusId> = state
            .statuses
            .iter()
            .filter(|s| s.board_id == board_id)
            .map(|s| s.id)
            .collect();
        let requested: HashSet<StatusId> = status_ids.iter().copied().collect();
        if requested != current || status_ids.len() != current.len() {
            return Err(BoardError::Remote {
                status: 422,
                message: "status ids do not match the board".to_string(),
            });
        }

        for (index, id) in status_ids.iter().enumerate() {
            if let Some(status) = state.statuses.iter_mut().find(|s| s.id == *id) {
                status.order = index as u32;
            }
        }

        let mut statuses: Vec<Status> = state
            .statuses
            .iter()
            .filter(|s| s.board_id == board_id)
            .cloned()
            .collect();
        status::sort_by_order(&mut statuses);
        Ok(statuses)
    }

    async fn update_task(&self, task_id: TaskId, request: UpdateTaskRequest) -> Result<Task> {
        self.state
            .lock()
            .calls
            .push(ApiCall::UpdateTask(task_id, request.clone()));

        let gate = self.update_gates.lock().get(&task_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock();
        if state.failures.updates || state.failures.updates_of.contains(&task_id) {
            return Err(rejected("task update rejected"));
        }

        let status_on_board = state
            .statuses
            .iter()
            .any(|s| s.id == request.status_id && s.board_id == request.board_id);
        if !status_on_board {
            return Err(BoardError::Remote {
                status: 422,
                message: format!(
                    "status {} does not belong to board {}",
                    request.status_id, request.board_id
                ),
            });
        }

        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| BoardError::Remote {
                status: 404,
                message: format!("task {} not found", task_id),
            })?;

        task.title = request.title;
        task.description = request.description;
        task.status_id = request.status_id;
        task.board_id = request.board_id;
        Ok(task.clone())
    }
}
