use crate::db_types::OrderStatusType;

/// The result of asking the order store to move an order into a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The order was pending and now has the requested status.
    Updated,
    /// The order already had the requested status. Nothing was written.
    Unchanged,
    /// The order already has a different terminal status, which is never overwritten.
    Rejected(OrderStatusType),
}

impl StatusUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, StatusUpdate::Updated | StatusUpdate::Unchanged)
    }
}
