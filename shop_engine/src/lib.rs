//! Shop Engine
//!
//! The shop engine sells digital goods (account credentials, licence keys and the like) for bank transfers. A buyer
//! places an order, receives a short reference token and pays by bank transfer quoting that token. The engine watches
//! the shop's bank account and hands over the goods once a matching payment shows up.
//!
//! The library is divided into these sections:
//! 1. Storage ([`ShopBackend`] and its component traits, with [`SqliteDatabase`] as the concrete backend). The data
//!    types stored there live in [`db_types`].
//! 2. The payment gateway ([`gateway`]), which lists recent bank transactions and decides whether one pays for an
//!    order.
//! 3. Reconciliation ([`reconciliation`]): the in-memory pending set and the engine that moves each order to exactly
//!    one terminal state.
//! 4. The public API ([`OrderFlowApi`], [`ReportsApi`]) that front ends talk to.
//!
//! Terminal transitions publish events ([`events`]) so that buyers and admins can be notified without the engine
//! knowing how.
mod db;

pub mod db_types;
pub mod events;
pub mod gateway;
pub mod helpers;
pub mod reconciliation;
mod shop_api;
#[cfg(feature = "sqlite")]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{db_url, SqliteDatabase};
pub use db::traits::{OrderStore, ProductCatalog, ShopBackend, StatusUpdate, StockLedger, StoreError};
pub use reconciliation::{CancelOutcome, CheckOutcome, EngineConfig, ReconciliationEngine, SweepReport};
pub use shop_api::{
    errors::OrderFlowError,
    order_flow_api::OrderFlowApi,
    order_objects,
    payment_objects,
    reports_api::{ReportsApi, DEFAULT_HISTORY_LIMIT, DEFAULT_RECENT_ORDERS_LIMIT},
};
