//! A small client for the [SePay](https://sepay.vn) user API, which exposes the transactions of a Vietnamese bank
//! account over HTTP.
mod api;
mod config;
mod data_objects;
mod error;
mod helpers;

pub use api::SepayApi;
pub use config::SepayConfig;
pub use data_objects::{SepayTransaction, TransactionList};
pub use error::SepayApiError;
pub use helpers::parse_sepay_amount;
