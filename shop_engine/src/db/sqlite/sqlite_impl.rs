//! `SqliteDatabase` is a concrete implementation of a shop engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements every storage trait bundled by
//! [`crate::ShopBackend`].
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{db_url, new_pool, orders, products, run_migrations, stock};
use crate::{
    db::traits::{OrderStore, ProductCatalog, StatusUpdate, StockLedger, StoreError},
    db_types::{
        Amount,
        BuyerId,
        BuyerSummary,
        NewOrder,
        NewProduct,
        Order,
        OrderId,
        OrderStatusType,
        OrderSummary,
        Product,
        ProductId,
        RevenueSummary,
        StockItem,
        StockItemId,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::insert_order(order, &mut conn).await?;
        debug!("🗃️ Order {} has been saved with reference {}", order.id, order.reference);
        Ok(order)
    }

    async fn set_order_status(&self, id: OrderId, status: OrderStatusType) -> Result<StatusUpdate, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = orders::update_order_status(id, status, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn fetch_pending_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_with_status(OrderStatusType::Pending, &mut conn).await
    }

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(id, &mut conn).await
    }

    async fn fetch_orders_for_buyer(&self, buyer_id: BuyerId, limit: i64) -> Result<Vec<OrderSummary>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_buyer(buyer_id, limit, &mut conn).await
    }

    async fn fetch_recent_orders(&self, limit: i64) -> Result<Vec<OrderSummary>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_recent_orders(limit, &mut conn).await
    }

    async fn revenue_summary(&self) -> Result<RevenueSummary, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::revenue_summary(&mut conn).await
    }

    async fn buyer_summary(&self, buyer_id: BuyerId) -> Result<BuyerSummary, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::buyer_summary(buyer_id, &mut conn).await
    }
}

impl StockLedger for SqliteDatabase {
    async fn allocate_one(&self, product_id: ProductId) -> Result<Option<StockItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        stock::fetch_unsold_item(product_id, &mut conn).await
    }

    async fn mark_sold(&self, item_id: StockItemId, buyer_id: BuyerId, order_id: OrderId) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let sold = stock::mark_sold(item_id, buyer_id, order_id, &mut conn).await?;
        if !sold {
            warn!("🗃️ Stock item {item_id} was already sold. Order {order_id} did not receive it.");
        }
        Ok(sold)
    }

    async fn claim_one(
        &self,
        product_id: ProductId,
        buyer_id: BuyerId,
        order_id: OrderId,
    ) -> Result<Option<StockItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        stock::claim_one(product_id, buyer_id, order_id, &mut conn).await
    }

    async fn count_available(&self, product_id: ProductId) -> Result<i64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        stock::count_available(product_id, &mut conn).await
    }

    async fn fetch_delivered(&self, order_id: OrderId) -> Result<Vec<StockItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        stock::fetch_items_for_order(order_id, &mut conn).await
    }
}

impl ProductCatalog for SqliteDatabase {
    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(id, &mut conn).await
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_products(&mut conn).await
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await?;
        let id = products::insert_product(product, &mut tx).await?;
        let product = products::fetch_product(id, &mut tx).await?.ok_or(StoreError::ProductNotFound(id))?;
        tx.commit().await?;
        debug!("🗃️ Product {id} ({}) added to the catalog at {}", product.name, product.price);
        Ok(product)
    }

    async fn insert_stock_items(&self, product_id: ProductId, payloads: &[String]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        if products::fetch_product(product_id, &mut tx).await?.is_none() {
            return Err(StoreError::ProductNotFound(product_id));
        }
        let count = stock::insert_items(product_id, payloads, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ {count} stock items added to {product_id}");
        Ok(count)
    }

    async fn update_product_price(&self, product_id: ProductId, price: Amount) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::update_price(product_id, price, &mut conn).await
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using `SHOP_DATABASE_URL` or the default location.
    pub async fn new(max_connections: u32) -> Result<Self, StoreError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        run_migrations(&self.pool).await
    }

    pub async fn close(&mut self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }
}
