//! Order reconciliation.
//!
//! Every order starts out `pending`. The [`ReconciliationEngine`] moves it to exactly one terminal state:
//! `completed` once a matching payment is found and the goods are handed over, `expired` once it is older than the
//! order timeout, or `cancelled` on request. Resolution is triggered by the periodic sweep or by an explicit recheck.
mod engine;
mod engine_config;
mod outcomes;
mod registry;

pub use engine::ReconciliationEngine;
pub use engine_config::{
    EngineConfig,
    DEFAULT_MAX_ORDER_QUANTITY,
    DEFAULT_ORDER_TIMEOUT_MINUTES,
    DEFAULT_SWEEP_INTERVAL_SECS,
};
pub use outcomes::{CancelOutcome, CheckOutcome, SweepReport};
pub use registry::{Acquisition, PendingRegistry, ResolutionGuard};
