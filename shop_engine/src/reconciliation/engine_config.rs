use std::time::Duration as StdDuration;

use chrono::Duration;

pub const DEFAULT_ORDER_TIMEOUT_MINUTES: i64 = 20;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_MAX_ORDER_QUANTITY: i64 = 5;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Orders older than this are expired instead of being checked for payment.
    pub order_timeout: Duration,
    /// How often the background sweep runs.
    pub sweep_interval: StdDuration,
    /// The most units a single order may ask for.
    pub max_order_quantity: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order_timeout: Duration::minutes(DEFAULT_ORDER_TIMEOUT_MINUTES),
            sweep_interval: StdDuration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            max_order_quantity: DEFAULT_MAX_ORDER_QUANTITY,
        }
    }
}
