//! # Shop engine public API
//!
//! * [`order_flow_api`] creates orders, answers "has my order been paid?" and cancels orders. It is what the chat front
//!   end talks to.
//! * [`reports_api`] provides read-only access to the catalog, order histories and revenue figures.
//!
//! Both APIs are created from a backend that implements the store traits. For example:
//!
//! ```rust,ignore
//! use shop_engine::{events::EventProducers, EngineConfig, OrderFlowApi, ReconciliationEngine, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let engine = ReconciliationEngine::new(db, ledger, EngineConfig::default(), EventProducers::default());
//! engine.restore().await?;
//! let api = OrderFlowApi::new(engine, payment_display_config);
//! let created = api.create_order(request).await?;
//! ```

pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod payment_objects;
pub mod reports_api;
