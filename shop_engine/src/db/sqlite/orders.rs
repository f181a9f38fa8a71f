use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::traits::{StatusUpdate, StoreError},
    db_types::{BuyerId, BuyerSummary, NewOrder, Order, OrderId, OrderStatusType, OrderSummary, RevenueSummary},
};

const ORDER_COLUMNS: &str =
    "id, buyer_id, chat_address, product_id, quantity, total_price, reference, status, created_at, updated_at";

const SUMMARY_QUERY: &str = r#"
    SELECT
        o.id AS order_id,
        o.buyer_id,
        p.name AS product_name,
        o.quantity,
        o.total_price,
        o.status,
        o.created_at
    FROM orders o
    LEFT JOIN products p ON p.id = o.product_id
"#;

/// Inserts a new pending order using the given connection. This is not atomic on its own. Embed the call in a
/// transaction and pass `&mut *tx` if you need atomicity.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, StoreError> {
    let sql = format!(
        r#"
        INSERT INTO orders (buyer_id, chat_address, product_id, quantity, total_price, reference)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {ORDER_COLUMNS};
        "#
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(order.buyer_id)
        .bind(order.chat_address)
        .bind(order.product_id)
        .bind(order.quantity)
        .bind(order.total_price)
        .bind(order.reference)
        .fetch_one(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, StoreError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql).bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_orders_with_status(
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, StoreError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE status = ? ORDER BY created_at ASC, id ASC");
    let orders = sqlx::query_as::<_, Order>(&sql).bind(status).fetch_all(conn).await?;
    trace!("🗃️ Fetched {} orders with status {status}", orders.len());
    Ok(orders)
}

/// Moves a pending order into a terminal status. The update is conditional on the order still being pending, so a
/// terminal status is never overwritten.
pub async fn update_order_status(
    id: OrderId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<StatusUpdate, StoreError> {
    let current = current_status(id, conn).await?.ok_or(StoreError::OrderNotFound(id))?;
    if !status.is_terminal() {
        return Err(StoreError::InvalidStatusTransition { id, from: current, to: status });
    }
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 1 {
        debug!("🗃️ Order {id} is now {status}");
        return Ok(StatusUpdate::Updated);
    }
    // Someone else moved the order between the read and the write. Report what it is now.
    let current = current_status(id, conn).await?.ok_or(StoreError::OrderNotFound(id))?;
    if current == status {
        debug!("🗃️ Order {id} already has status {status}. No action to take");
        Ok(StatusUpdate::Unchanged)
    } else {
        debug!("🗃️ Order {id} is {current} and cannot be moved to {status}");
        Ok(StatusUpdate::Rejected(current))
    }
}

async fn current_status(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<OrderStatusType>, StoreError> {
    let status = sqlx::query_scalar::<_, OrderStatusType>("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(status)
}

pub async fn fetch_orders_for_buyer(
    buyer_id: BuyerId,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderSummary>, StoreError> {
    let sql = format!("{SUMMARY_QUERY} WHERE o.buyer_id = ? ORDER BY o.id DESC LIMIT ?");
    let orders =
        sqlx::query_as::<_, OrderSummary>(&sql).bind(buyer_id).bind(limit).fetch_all(&mut *conn).await?;
    attach_delivered(orders, conn).await
}

pub async fn fetch_recent_orders(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderSummary>, StoreError> {
    let sql = format!("{SUMMARY_QUERY} ORDER BY o.id DESC LIMIT ?");
    let orders = sqlx::query_as::<_, OrderSummary>(&sql).bind(limit).fetch_all(&mut *conn).await?;
    attach_delivered(orders, conn).await
}

async fn attach_delivered(
    mut orders: Vec<OrderSummary>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderSummary>, StoreError> {
    for order in orders.iter_mut().filter(|o| o.status == OrderStatusType::Completed) {
        order.delivered = sqlx::query_scalar::<_, String>("SELECT payload FROM stock_items WHERE order_id = ? ORDER BY id")
            .bind(order.order_id)
            .fetch_all(&mut *conn)
            .await?;
    }
    Ok(orders)
}

pub async fn revenue_summary(conn: &mut SqliteConnection) -> Result<RevenueSummary, StoreError> {
    let summary = sqlx::query_as::<_, RevenueSummary>(
        r#"
        SELECT COUNT(*) AS completed_orders, COALESCE(SUM(total_price), 0) AS total_revenue
        FROM orders
        WHERE status = 'completed'
        "#,
    )
    .fetch_one(conn)
    .await?;
    Ok(summary)
}

pub async fn buyer_summary(buyer_id: BuyerId, conn: &mut SqliteConnection) -> Result<BuyerSummary, StoreError> {
    let summary = sqlx::query_as::<_, BuyerSummary>(
        r#"
        SELECT ? AS buyer_id, COUNT(*) AS completed_orders, COALESCE(SUM(total_price), 0) AS total_spent
        FROM orders
        WHERE status = 'completed' AND buyer_id = ?
        "#,
    )
    .bind(buyer_id)
    .bind(buyer_id)
    .fetch_one(conn)
    .await?;
    Ok(summary)
}
