//! Outbound notifications.
//!
//! The engine publishes events when orders reach a terminal state (or fail to). It does not know how buyers or admins
//! are contacted; that is up to whoever registers the hooks.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
