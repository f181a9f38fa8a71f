//! The payment gateway: read-only access to the shop's bank account transactions.
//!
//! The engine never talks to a bank directly. Instead, a [`PaymentLedger`] implementation (the SePay adapter in the
//! server, or [`crate::test_utils::MockLedger`] in tests) lists recent incoming transfers, and
//! [`PaymentGatewayClient`] decides whether any of them pays for an order.
mod client;
mod errors;

pub use client::{LedgerTransaction, PaymentGatewayClient, PaymentLedger};
pub use errors::GatewayError;
