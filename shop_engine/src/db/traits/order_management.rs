use crate::{
    db::traits::{StatusUpdate, StoreError},
    db_types::{BuyerId, BuyerSummary, NewOrder, Order, OrderId, OrderStatusType, OrderSummary, RevenueSummary},
};

/// The durable record of orders.
///
/// Orders are created `pending` and move exactly once into a terminal status. Backends must enforce that one-way
/// transition themselves; the engine relies on it to make duplicate status writes harmless.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    /// Stores a new pending order. The backend assigns the id and the creation timestamp.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    /// Moves a pending order into the given terminal status.
    ///
    /// Writing the status an order already has is a no-op ([`StatusUpdate::Unchanged`]). An order that is already in a
    /// *different* terminal status is left untouched and [`StatusUpdate::Rejected`] is returned. Asking for `Pending`
    /// is an error.
    async fn set_order_status(&self, id: OrderId, status: OrderStatusType) -> Result<StatusUpdate, StoreError>;

    /// Every order currently in `pending` status, oldest first. Used at startup to rebuild the in-memory pending set.
    async fn fetch_pending_orders(&self) -> Result<Vec<Order>, StoreError>;

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// The buyer's most recent orders, newest first, including the payloads delivered for completed orders.
    async fn fetch_orders_for_buyer(&self, buyer_id: BuyerId, limit: i64) -> Result<Vec<OrderSummary>, StoreError>;

    /// The most recent orders across all buyers, newest first.
    async fn fetch_recent_orders(&self, limit: i64) -> Result<Vec<OrderSummary>, StoreError>;

    /// Count and total value of completed orders.
    async fn revenue_summary(&self) -> Result<RevenueSummary, StoreError>;

    async fn buyer_summary(&self, buyer_id: BuyerId) -> Result<BuyerSummary, StoreError>;
}
