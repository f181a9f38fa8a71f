use thiserror::Error;

use crate::{
    db::traits::StoreError,
    db_types::{OrderId, ProductId},
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Quantity must be at least 1, but {0} was requested")]
    InvalidQuantity(i64),
    #[error("At most {max} units may be ordered at once, but {requested} were requested")]
    QuantityLimit { requested: i64, max: i64 },
    #[error("Product {0} does not exist")]
    ProductNotFound(ProductId),
    #[error("Only {available} units are in stock, but {requested} were requested")]
    InsufficientStock { requested: i64, available: i64 },
    #[error("The order total cannot be represented")]
    PriceOverflow,
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Database error: {0}")]
    DatabaseError(#[from] StoreError),
}

impl OrderFlowError {
    /// True if the request was rejected because of what the buyer asked for, rather than a failure on our side.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, OrderFlowError::DatabaseError(_))
    }

    /// Text that is safe to show to the buyer. Internal failures are never described in detail.
    pub fn user_message(&self) -> String {
        match self {
            OrderFlowError::InvalidQuantity(_) => "Please order at least one item.".to_string(),
            OrderFlowError::QuantityLimit { max, .. } => format!("You can buy at most {max} items in one order."),
            OrderFlowError::ProductNotFound(_) => "That product is not available.".to_string(),
            OrderFlowError::InsufficientStock { available: 0, .. } => "That product is sold out.".to_string(),
            OrderFlowError::InsufficientStock { available, .. } => {
                format!("Only {available} items are left in stock.")
            },
            OrderFlowError::PriceOverflow => "That order is too large. Please order fewer items.".to_string(),
            OrderFlowError::OrderNotFound(id) => format!("Order {id} was not found."),
            OrderFlowError::DatabaseError(_) => "Something went wrong on our side. Please try again later.".to_string(),
        }
    }
}
