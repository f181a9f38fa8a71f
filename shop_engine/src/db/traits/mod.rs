//! The storage traits a backend must implement to support the shop engine.
//!
//! * [`OrderStore`] is the durable record of every order and its lifecycle status. It is the source of truth that the
//!   in-memory pending set is rebuilt from at startup.
//! * [`StockLedger`] tracks deliverable stock items and hands them out one at a time.
//! * [`ProductCatalog`] provides read access to products. The write methods exist for seeding; catalog editing is the
//!   business of an external admin tool.
//!
//! [`ShopBackend`] bundles all three and is implemented automatically.
mod catalog_management;
mod data_objects;
mod errors;
mod order_management;
mod stock_management;

pub use catalog_management::ProductCatalog;
pub use data_objects::StatusUpdate;
pub use errors::StoreError;
pub use order_management::OrderStore;
pub use stock_management::StockLedger;

/// Everything the reconciliation engine needs from its storage backend.
pub trait ShopBackend: OrderStore + StockLedger + ProductCatalog {}

impl<T> ShopBackend for T where T: OrderStore + StockLedger + ProductCatalog {}
