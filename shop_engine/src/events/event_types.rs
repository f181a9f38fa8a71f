use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Payment was matched and every unit was delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCompletedEvent {
    pub order: Order,
    /// The delivered goods, one entry per unit.
    pub payloads: Vec<String>,
}

impl OrderCompletedEvent {
    pub fn new(order: Order, payloads: Vec<String>) -> Self {
        Self { order, payloads }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpiredEvent {
    pub order: Order,
}

impl OrderExpiredEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelledEvent {
    pub order: Order,
}

impl OrderCancelledEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Payment was matched but stock ran out before every unit could be delivered. The order is left unresolved and
/// needs manual attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderShortfallEvent {
    pub order: Order,
    pub delivered: Vec<String>,
    pub requested: i64,
}

impl OrderShortfallEvent {
    pub fn new(order: Order, delivered: Vec<String>) -> Self {
        let requested = order.quantity;
        Self { order, delivered, requested }
    }

    pub fn missing(&self) -> i64 {
        self.requested - self.delivered.len() as i64
    }
}
