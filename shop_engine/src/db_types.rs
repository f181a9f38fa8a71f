use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use log::error;
use serde::{Deserialize, Serialize};
pub use shop_common::Amount;
use sqlx::{FromRow, Type};
use thiserror::Error;

/// Declares an integer-backed identifier that is stored transparently in the database.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().trim_start_matches('#').parse::<i64>().map(Self)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl $name {
            pub fn value(&self) -> i64 {
                self.0
            }
        }
    };
}

//--------------------------------------      Identifiers      -------------------------------------------------------
id_type!(
    /// Database id of an order. Orders are presented to buyers as `#<id>`.
    OrderId,
    "#"
);
id_type!(ProductId, "product-");
id_type!(StockItemId, "stock-");
id_type!(
    /// The chat platform's user id of the buyer.
    BuyerId,
    ""
);
id_type!(
    /// Where outbound messages for an order are delivered. For most chat platforms this is the chat id.
    ChatAddress,
    "chat:"
);

//--------------------------------------    ReferenceToken     ---------------------------------------------------------
/// The short code a buyer puts in the memo of their bank transfer so that the payment can be matched to their order.
/// An empty token never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ReferenceToken(String);

impl ReferenceToken {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `memo` contains this token, ignoring case. Banks routinely prepend or append their own text to the
    /// transfer description, so an exact match is never expected.
    pub fn is_contained_in(&self, memo: &str) -> bool {
        !self.0.is_empty() && memo.to_uppercase().contains(&self.0.to_uppercase())
    }
}

impl Display for ReferenceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been created and is waiting for a matching payment.
    Pending,
    /// Payment was matched and every unit of the order was delivered.
    Completed,
    /// No payment arrived before the order timeout.
    Expired,
    /// The order was cancelled by the buyer or an admin.
    Cancelled,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatusType::Pending)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Completed => write!(f, "completed"),
            OrderStatusType::Expired => write!(f, "expired"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            // An unknown status must never map to Pending
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to expired");
            OrderStatusType::Expired
        })
    }
}

//--------------------------------------        Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Amount,
    pub description: Option<String>,
    /// Number of unsold stock items. Derived on every read.
    pub available: i64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Amount,
    pub description: Option<String>,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, price: Amount) -> Self {
        Self { name: name.into(), price, description: None }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

//--------------------------------------       StockItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockItemId,
    pub product_id: ProductId,
    /// The deliverable itself, e.g. account credentials.
    pub payload: String,
    pub is_sold: bool,
    pub buyer_id: Option<BuyerId>,
    /// The order that claimed this item, once sold.
    pub order_id: Option<OrderId>,
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: BuyerId,
    pub chat_address: ChatAddress,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price multiplied by quantity, as it was when the order was placed.
    pub total_price: Amount,
    pub reference: ReferenceToken,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: BuyerId,
    pub chat_address: ChatAddress,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_price: Amount,
    pub reference: ReferenceToken,
}

impl NewOrder {
    /// Creates an order without a reference token. The reconciliation engine assigns one when the order is opened.
    pub fn new(
        buyer_id: BuyerId,
        chat_address: ChatAddress,
        product_id: ProductId,
        quantity: i64,
        total_price: Amount,
    ) -> Self {
        Self { buyer_id, chat_address, product_id, quantity, total_price, reference: ReferenceToken::default() }
    }

    pub fn with_reference(mut self, reference: ReferenceToken) -> Self {
        self.reference = reference;
        self
    }
}

//--------------------------------------      OrderSummary     ---------------------------------------------------------
/// A row in an order history listing. `delivered` holds the payloads handed over for completed orders.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub buyer_id: BuyerId,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub total_price: Amount,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub delivered: Vec<String>,
}

//--------------------------------------    RevenueSummary     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub completed_orders: i64,
    pub total_revenue: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BuyerSummary {
    pub buyer_id: BuyerId,
    pub completed_orders: i64,
    pub total_spent: Amount,
}
