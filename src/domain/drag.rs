use crate::{
    domain::{board::Role, layout::LayoutMode, status::StatusId, task::TaskId},
    error::{BoardError, Result},
};
use tracing::debug;

/// The single drag gesture in progress on a board view
///
/// A hovered drop target only exists while something is being dragged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    DraggingTask {
        task: TaskId,
        hovered: Option<StatusId>,
    },
    DraggingColumn {
        status: StatusId,
        hovered: Option<StatusId>,
    },
}

impl DragSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The column currently under the pointer, if any
    pub fn hovered(&self) -> Option<StatusId> {
        match self {
            Self::Idle => None,
            Self::DraggingTask { hovered, .. } | Self::DraggingColumn { hovered, .. } => *hovered,
        }
    }
}

/// State machine tracking the drag session of one board view
#[derive(Debug, Default)]
pub struct DragTracker {
    session: DragSession,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> DragSession {
        self.session
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_idle()
    }

    /// Starts dragging a task card
    pub fn start_task(&mut self, task: TaskId, mode: LayoutMode, role: Role) -> Result<()> {
        self.ensure_idle()?;
        if !mode.tasks_draggable(role) {
            return Err(BoardError::DragNotPermitted(format!(
                "task {} cannot be dragged in {} mode as {}",
                task, mode, role
            )));
        }

        debug!(task = %task, "task drag started");
        self.session = DragSession::DraggingTask {
            task,
            hovered: None,
        };
        Ok(())
    }

    /// Starts dragging a status column
    pub fn start_column(&mut self, status: StatusId, mode: LayoutMode, role: Role) -> Result<()> {
        self.ensure_idle()?;
        if !mode.columns_draggable(role) {
            return Err(BoardError::DragNotPermitted(format!(
                "column {} cannot be dragged in {} mode as {}",
                status, mode, role
            )));
        }

        debug!(status = %status, "column drag started");
        self.session = DragSession::DraggingColumn {
            status,
            hovered: None,
        };
        Ok(())
    }

    /// Records the drop candidate under the pointer
    ///
    /// Returns true when the hovered target changed. Hovering a dragged
    /// column over itself and hovering while idle are ignored.
    pub fn hover(&mut self, target: StatusId) -> bool {
        match &mut self.session {
            DragSession::Idle => false,
            DragSession::DraggingColumn { status, .. } if *status == target => false,
            DragSession::DraggingTask { hovered, .. }
            | DragSession::DraggingColumn { hovered, .. } => {
                if *hovered == Some(target) {
                    return false;
                }
                *hovered = Some(target);
                true
            }
        }
    }

    /// Clears the session, whether or not a drop happened
    pub fn end(&mut self) -> DragSession {
        let previous = std::mem::take(&mut self.session);
        if !previous.is_idle() {
            debug!(?previous, "drag session ended");
        }
        previous
    }

    /// Hands the active session to a drop handler and returns to idle
    pub fn take_drop(&mut self) -> DragSession {
        std::mem::take(&mut self.session)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.session.is_idle() {
            Ok(())
        } else {
            Err(BoardError::DragNotPermitted(
                "another drag is already in progress".to_string(),
            ))
        }
    }
}
