use crate::{
    db::traits::StoreError,
    db_types::{BuyerId, OrderId, ProductId, StockItem, StockItemId},
};

/// Inventory of deliverable stock items.
///
/// A stock item is sold at most once. Backends must make [`StockLedger::mark_sold`] and [`StockLedger::claim_one`]
/// conditional on the item still being unsold, so that two orders racing for the same product can never both receive
/// the same item.
#[allow(async_fn_in_trait)]
pub trait StockLedger: Clone {
    /// Returns an arbitrary unsold item for the product without reserving it. Returns `None` when the product is sold
    /// out.
    async fn allocate_one(&self, product_id: ProductId) -> Result<Option<StockItem>, StoreError>;

    /// Marks the item as sold to the buyer on behalf of the order. Returns `false` if the item had already been sold,
    /// in which case nothing is changed.
    async fn mark_sold(&self, item_id: StockItemId, buyer_id: BuyerId, order_id: OrderId) -> Result<bool, StoreError>;

    /// `allocate_one` and `mark_sold` as a single atomic step. Returns the claimed item, or `None` if the product is
    /// sold out.
    async fn claim_one(
        &self,
        product_id: ProductId,
        buyer_id: BuyerId,
        order_id: OrderId,
    ) -> Result<Option<StockItem>, StoreError>;

    /// Number of unsold items for the product.
    async fn count_available(&self, product_id: ProductId) -> Result<i64, StoreError>;

    /// The items already sold against the given order, in the order they were claimed.
    async fn fetch_delivered(&self, order_id: OrderId) -> Result<Vec<StockItem>, StoreError>;
}
