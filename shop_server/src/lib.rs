//! # Shop server
//! The HTTP face of the shop engine. It is responsible for:
//! * Accepting orders from the chat front end and returning the payment details the buyer needs.
//! * Running the background sweep that matches bank transfers (via SePay) to pending orders.
//! * Forwarding order notifications (goods delivered, expiry, shortfall alerts) to the chat front end's webhook.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! See [routes](routes/index.html). Everything except `/health` speaks JSON.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod notifications;
pub mod routes;
pub mod server;
pub mod sweep_worker;

#[cfg(test)]
mod endpoint_tests;
