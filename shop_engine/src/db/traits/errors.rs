use thiserror::Error;

use crate::db_types::{OrderId, OrderStatusType, ProductId};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    DriverError(String),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("Could not run database migrations: {0}")]
    MigrationError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Product {0} does not exist")]
    ProductNotFound(ProductId),
    #[error("Order {id} cannot be moved from {from} to {to}")]
    InvalidStatusTransition { id: OrderId, from: OrderStatusType, to: OrderStatusType },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(e) => StoreError::QueryError(e.to_string()),
            e => StoreError::DriverError(e.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationError(e.to_string())
    }
}
