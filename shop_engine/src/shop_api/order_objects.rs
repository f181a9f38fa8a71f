use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Amount, BuyerId, ChatAddress, OrderId, ProductId, ReferenceToken},
    shop_api::payment_objects::PaymentInstructions,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub buyer_id: BuyerId,
    pub chat_address: ChatAddress,
    pub product_id: ProductId,
    pub quantity: i64,
}

/// What the buyer is shown after placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub reference: ReferenceToken,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Amount,
    pub total_price: Amount,
    /// After this time the order is expired by the next sweep.
    pub expires_at: DateTime<Utc>,
    pub payment: PaymentInstructions,
}
