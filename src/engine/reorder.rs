use crate::domain::status::StatusId;

/// Computes the column order after dropping `dragged` onto `target`
///
/// The dragged column is removed and reinserted at the target's former
/// index; the columns in between shift by one. This is a single-element
/// move, not a swap. Returns `None` when either id is missing or both are
/// the same column.
///
/// # Examples
/// ```
/// use kanban_sync_core::engine::reorder::reorder_columns;
/// use kanban_sync_core::StatusId;
///
/// let order = [StatusId::new(1), StatusId::new(2), StatusId::new(3)];
/// let moved = reorder_columns(&order, StatusId::new(3), StatusId::new(1)).unwrap();
/// assert_eq!(moved, vec![StatusId::new(3), StatusId::new(1), StatusId::new(2)]);
/// ```
pub fn reorder_columns(
    order: &[StatusId],
    dragged: StatusId,
    target: StatusId,
) -> Option<Vec<StatusId>> {
    let from = order.iter().position(|id| *id == dragged)?;
    let to = order.iter().position(|id| *id == target)?;
    if from == to {
        return None;
    }

    let mut next = order.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Some(next)
}
