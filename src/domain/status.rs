use crate::domain::{board::BoardId, numeric_id};
use serde::{Deserialize, Serialize};

numeric_id!(
    /// Unique identifier for a status column
    StatusId
);

/// A status column on a board
///
/// `order` is the column's left-to-right position. Within a board the orders
/// are unique and, after any reorder, dense from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: StatusId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub board_id: BoardId,
    pub order: u32,
}

impl Status {
    pub fn new(id: StatusId, board_id: BoardId, name: String, order: u32) -> Self {
        Self {
            id,
            name,
            color: String::new(),
            board_id,
            order,
        }
    }

    pub fn with_color(mut self, color: String) -> Self {
        self.color = color;
        self
    }
}

/// Sorts statuses left to right, breaking ties by id so the result is stable
pub fn sort_by_order(statuses: &mut [Status]) {
    statuses.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
}

/// Checks that the orders are exactly `0..n` in sequence
pub fn orders_are_dense(statuses: &[Status]) -> bool {
    statuses
        .iter()
        .enumerate()
        .all(|(index, status)| status.order as usize == index)
}
