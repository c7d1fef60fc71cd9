use crate::{
    api::UpdateTaskRequest,
    domain::{status::StatusId, task::TaskId},
    store::BoardStore,
};

/// A task move that will actually change something
#[derive(Debug, Clone, PartialEq)]
pub struct TaskMove {
    pub task_id: TaskId,
    pub from: StatusId,
    pub to: StatusId,
    /// Update payload built from the task's values before the move
    pub request: UpdateTaskRequest,
}

/// Plans moving a task into the `target` column
///
/// Returns `None` when the task or the target column is unknown, or when
/// the task already sits in the target, so dropping a card back onto its
/// own column never produces a write.
pub fn plan_task_move(store: &BoardStore, task_id: TaskId, target: StatusId) -> Option<TaskMove> {
    let task = store.task(task_id)?;
    store.status(target)?;
    if task.is_in(target) {
        return None;
    }

    Some(TaskMove {
        task_id,
        from: task.status_id,
        to: target,
        request: UpdateTaskRequest {
            title: task.title.clone(),
            description: task.description.clone(),
            status_id: target,
            board_id: task.board_id,
        },
    })
}
