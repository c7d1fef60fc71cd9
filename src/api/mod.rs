use crate::{
    domain::{Board, BoardId, Status, StatusId, Task, TaskId},
    error::Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(feature = "http-client")]
pub mod http;
pub mod memory;

#[cfg(feature = "http-client")]
pub use http::HttpBoardApi;
pub use memory::{ApiCall, InMemoryApi};

/// Payload for updating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub board_id: BoardId,
}

/// Payload for reordering a board's statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderStatusesRequest {
    pub status_ids: Vec<StatusId>,
}

/// Remote backend holding the authoritative board state
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetches the board record
    async fn fetch_board(&self, board_id: BoardId) -> Result<Board>;

    /// Fetches the board's statuses
    async fn fetch_statuses(&self, board_id: BoardId) -> Result<Vec<Status>>;

    /// Fetches every task on the board
    async fn fetch_tasks(&self, board_id: BoardId) -> Result<Vec<Task>>;

    /// Persists a new left-to-right column order given as the full list of
    /// status ids
    async fn reorder_statuses(
        &self,
        board_id: BoardId,
        status_ids: Vec<StatusId>,
    ) -> Result<Vec<Status>>;

    /// Updates a task's title, description and status
    async fn update_task(&self, task_id: TaskId, request: UpdateTaskRequest) -> Result<Task>;
}
