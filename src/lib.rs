//! # Kanban Sync Core
//!
//! Board state, drag-and-drop and optimistic synchronisation for kanban
//! board clients.
//!
//! This crate holds the in-memory model of one board's columns and cards,
//! the drag session state machine for moving tasks between columns and
//! reordering columns, and the coordinator that applies those changes
//! locally before confirming them with a remote backend, rolling them back
//! when the backend refuses. It has no dependency on a specific UI toolkit.

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod store;
pub mod sync;
pub mod view;

// Re-export commonly used types
pub use api::{BoardApi, UpdateTaskRequest};
pub use config::ClientConfig;
pub use domain::{
    board::{Board, BoardId, Role},
    drag::{DragSession, DragTracker},
    layout::LayoutMode,
    status::{Status, StatusId},
    task::{Task, TaskId},
};
pub use error::{BoardError, Result};
pub use store::{BoardSnapshot, BoardStore};
pub use sync::{SyncCoordinator, SyncOutcome};
pub use view::{BoardView, DropOutcome, TaskEdit};
