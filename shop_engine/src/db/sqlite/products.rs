use sqlx::SqliteConnection;

use crate::{
    db::traits::StoreError,
    db_types::{Amount, NewProduct, Product, ProductId},
};

const PRODUCT_QUERY: &str = r#"
    SELECT p.id, p.name, p.price, p.description, COUNT(s.id) AS available
    FROM products p
    LEFT JOIN stock_items s ON s.product_id = p.id AND s.is_sold = 0
"#;

pub async fn fetch_product(id: ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, StoreError> {
    let sql = format!("{PRODUCT_QUERY} WHERE p.id = ? GROUP BY p.id");
    let product = sqlx::query_as::<_, Product>(&sql).bind(id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, StoreError> {
    let sql = format!("{PRODUCT_QUERY} GROUP BY p.id ORDER BY p.id");
    let products = sqlx::query_as::<_, Product>(&sql).fetch_all(conn).await?;
    Ok(products)
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<ProductId, StoreError> {
    let id = sqlx::query_scalar::<_, ProductId>(
        "INSERT INTO products (name, price, description) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(product.name)
    .bind(product.price)
    .bind(product.description)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn update_price(id: ProductId, price: Amount, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let result = sqlx::query(
        "UPDATE products SET price = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
    )
    .bind(price)
    .bind(id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::ProductNotFound(id));
    }
    Ok(())
}
