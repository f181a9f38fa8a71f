use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db::traits::StoreError,
    db_types::{BuyerId, OrderId, ProductId, StockItem, StockItemId},
};

const STOCK_COLUMNS: &str = "id, product_id, payload, is_sold, buyer_id, order_id";

pub async fn fetch_unsold_item(
    product_id: ProductId,
    conn: &mut SqliteConnection,
) -> Result<Option<StockItem>, StoreError> {
    let sql = format!("SELECT {STOCK_COLUMNS} FROM stock_items WHERE product_id = ? AND is_sold = 0 ORDER BY id LIMIT 1");
    let item = sqlx::query_as::<_, StockItem>(&sql).bind(product_id).fetch_optional(conn).await?;
    Ok(item)
}

/// Marks a single item as sold, but only if it is still unsold. Returns `true` if this call made the change.
pub async fn mark_sold(
    item_id: StockItemId,
    buyer_id: BuyerId,
    order_id: OrderId,
    conn: &mut SqliteConnection,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE stock_items
        SET is_sold = 1, buyer_id = ?, order_id = ?, sold_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND is_sold = 0
        "#,
    )
    .bind(buyer_id)
    .bind(order_id)
    .bind(item_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Selects and sells one unsold item in a single statement. SQLite serialises writers, so two concurrent claims for
/// the same product always receive different items.
pub async fn claim_one(
    product_id: ProductId,
    buyer_id: BuyerId,
    order_id: OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<StockItem>, StoreError> {
    let sql = format!(
        r#"
        UPDATE stock_items
        SET is_sold = 1, buyer_id = ?, order_id = ?, sold_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = (SELECT id FROM stock_items WHERE product_id = ? AND is_sold = 0 ORDER BY id LIMIT 1)
          AND is_sold = 0
        RETURNING {STOCK_COLUMNS};
        "#
    );
    let item = sqlx::query_as::<_, StockItem>(&sql)
        .bind(buyer_id)
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(conn)
        .await?;
    if let Some(item) = &item {
        trace!("🗃️ Stock item {} of {product_id} claimed by order {order_id}", item.id);
    }
    Ok(item)
}

pub async fn count_available(product_id: ProductId, conn: &mut SqliteConnection) -> Result<i64, StoreError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_items WHERE product_id = ? AND is_sold = 0")
        .bind(product_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn fetch_items_for_order(order_id: OrderId, conn: &mut SqliteConnection) -> Result<Vec<StockItem>, StoreError> {
    let sql = format!("SELECT {STOCK_COLUMNS} FROM stock_items WHERE order_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, StockItem>(&sql).bind(order_id).fetch_all(conn).await?;
    Ok(items)
}

/// Inserts one unsold item per payload. Not atomic on its own; call it inside a transaction.
pub async fn insert_items(
    product_id: ProductId,
    payloads: &[String],
    conn: &mut SqliteConnection,
) -> Result<u64, StoreError> {
    let mut count = 0;
    for payload in payloads {
        let result = sqlx::query("INSERT INTO stock_items (product_id, payload) VALUES (?, ?)")
            .bind(product_id)
            .bind(payload)
            .execute(&mut *conn)
            .await?;
        count += result.rows_affected();
    }
    Ok(count)
}
