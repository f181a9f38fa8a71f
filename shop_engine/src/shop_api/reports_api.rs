//! Read-only views over the catalog and order history.

use std::fmt::Debug;

use crate::{
    db::traits::{ShopBackend, StoreError},
    db_types::{BuyerId, BuyerSummary, Order, OrderId, OrderSummary, Product, ProductId, RevenueSummary},
};

pub const DEFAULT_RECENT_ORDERS_LIMIT: i64 = 20;
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

pub struct ReportsApi<B> {
    db: B,
}

impl<B: Debug> Debug for ReportsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReportsApi ({:?})", self.db)
    }
}

impl<B> ReportsApi<B>
where B: ShopBackend
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn products(&self) -> Result<Vec<Product>, StoreError> {
        self.db.fetch_products().await
    }

    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.db.fetch_product(id).await
    }

    pub async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.db.fetch_order(id).await
    }

    /// The buyer's most recent orders, newest first. Completed orders include the goods that were delivered.
    pub async fn orders_for_buyer(&self, buyer_id: BuyerId, limit: i64) -> Result<Vec<OrderSummary>, StoreError> {
        self.db.fetch_orders_for_buyer(buyer_id, limit.max(0)).await
    }

    pub async fn recent_orders(&self, limit: Option<i64>) -> Result<Vec<OrderSummary>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_ORDERS_LIMIT).max(0);
        self.db.fetch_recent_orders(limit).await
    }

    /// The number of completed orders and the sum of what was charged for them.
    pub async fn revenue_summary(&self) -> Result<RevenueSummary, StoreError> {
        self.db.revenue_summary().await
    }

    pub async fn buyer_summary(&self, buyer_id: BuyerId) -> Result<BuyerSummary, StoreError> {
        self.db.buyer_summary(buyer_id).await
    }
}
