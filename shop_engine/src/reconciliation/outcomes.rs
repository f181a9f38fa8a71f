use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The answer to "has my order been paid?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The order is not waiting for payment: it never existed, or it was already resolved.
    NotFound,
    /// Another check of the same order is running. Try again shortly.
    Processing,
    /// No matching payment yet.
    StillPending,
    /// Payment matched and every unit was delivered.
    Paid { payloads: Vec<String> },
    /// The order timed out before a payment was found.
    Expired,
    /// Payment matched but stock ran out. Only `delivered` could be handed over.
    Shortfall { delivered: Vec<String>, requested: i64 },
}

impl Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::NotFound => write!(f, "not found"),
            CheckOutcome::Processing => write!(f, "processing"),
            CheckOutcome::StillPending => write!(f, "still pending"),
            CheckOutcome::Paid { payloads } => write!(f, "paid ({} items)", payloads.len()),
            CheckOutcome::Expired => write!(f, "expired"),
            CheckOutcome::Shortfall { delivered, requested } => {
                write!(f, "shortfall ({} of {requested} items)", delivered.len())
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    Cancelled,
    NotFound,
}

/// What a single sweep pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub checked: usize,
    pub completed: usize,
    pub expired: usize,
    pub still_pending: usize,
    pub skipped: usize,
    pub shortfalls: usize,
    pub failed: usize,
}

impl SweepReport {
    pub(crate) fn record(&mut self, outcome: &CheckOutcome) {
        self.checked += 1;
        match outcome {
            CheckOutcome::Paid { .. } => self.completed += 1,
            CheckOutcome::Expired => self.expired += 1,
            CheckOutcome::StillPending => self.still_pending += 1,
            CheckOutcome::Shortfall { .. } => self.shortfalls += 1,
            CheckOutcome::NotFound | CheckOutcome::Processing => self.skipped += 1,
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.checked += 1;
        self.failed += 1;
    }
}

impl Display for SweepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} checked: {} completed, {} expired, {} still pending, {} skipped, {} short, {} failed",
            self.checked, self.completed, self.expired, self.still_pending, self.skipped, self.shortfalls, self.failed
        )
    }
}
