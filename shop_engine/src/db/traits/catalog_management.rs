use crate::{
    db::traits::StoreError,
    db_types::{Amount, NewProduct, Product, ProductId},
};

#[allow(async_fn_in_trait)]
pub trait ProductCatalog: Clone {
    /// Fetches a product along with its current count of unsold stock.
    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Adds one unsold stock item per payload. Returns the number of items added.
    async fn insert_stock_items(&self, product_id: ProductId, payloads: &[String]) -> Result<u64, StoreError>;

    /// Changes the unit price for future orders. Existing orders keep the total they were created with.
    async fn update_product_price(&self, product_id: ProductId, price: Amount) -> Result<(), StoreError>;
}
