//! Pure computations behind the two drop gestures.

pub mod mv;
pub mod reorder;

pub use mv::{plan_task_move, TaskMove};
pub use reorder::reorder_columns;
