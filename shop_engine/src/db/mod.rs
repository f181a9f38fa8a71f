//! #  Database management and control.
//!
//! This module defines the storage contracts the reconciliation engine depends on, along with the backends that
//! implement them. You should never need to access a backend directly; go through the engine and API types instead.
//! The exception is the data types used in the database, which live in [`crate::db_types`].
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;
