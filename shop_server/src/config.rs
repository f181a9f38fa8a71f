use std::{env, fmt::Display, str::FromStr, time::Duration as StdDuration};

use chrono::Duration;
use log::*;
use sepay_tools::SepayConfig;
use shop_common::{parse_list, Secret};
use shop_engine::{
    db_types::ChatAddress,
    payment_objects::PaymentDisplayConfig,
    reconciliation::{DEFAULT_MAX_ORDER_QUANTITY, DEFAULT_ORDER_TIMEOUT_MINUTES, DEFAULT_SWEEP_INTERVAL_SECS},
    EngineConfig,
};

const DEFAULT_SHOP_HOST: &str = "127.0.0.1";
const DEFAULT_SHOP_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/shop.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Order timeout, sweep interval and the per-order quantity cap.
    pub engine: EngineConfig,
    /// Chat ids that receive sale and shortfall alerts.
    pub admin_ids: Vec<ChatAddress>,
    /// Required in the `shop_admin_key` header for the /admin routes. When empty, the admin routes are disabled.
    pub admin_api_key: Secret<String>,
    /// If set, every notification is POSTed here as JSON.
    pub notify_webhook_url: Option<String>,
    /// The receiving bank account, as shown to buyers.
    pub payment_display: PaymentDisplayConfig,
    pub sepay: SepayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SHOP_HOST.to_string(),
            port: DEFAULT_SHOP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            engine: EngineConfig::default(),
            admin_ids: Vec::new(),
            admin_api_key: Secret::default(),
            notify_webhook_url: None,
            payment_display: PaymentDisplayConfig::default(),
            sepay: SepayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SHOP_HOST").ok().unwrap_or_else(|| DEFAULT_SHOP_HOST.into());
        let port = env::var("SHOP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SHOP_PORT. {e} Using the default, {DEFAULT_SHOP_PORT}, instead."
                    );
                    DEFAULT_SHOP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SHOP_PORT);
        let database_url = env::var("SHOP_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SHOP_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let engine = configure_engine();
        let admin_ids = env::var("SHOP_ADMIN_IDS").map(|s| parse_list::<ChatAddress>(&s)).unwrap_or_default();
        if admin_ids.is_empty() {
            warn!("🪛️ SHOP_ADMIN_IDS is empty. Nobody will be alerted about sales or stock shortfalls.");
        }
        let admin_api_key = Secret::new(env::var("SHOP_ADMIN_API_KEY").ok().unwrap_or_else(|| {
            info!("🪛️ SHOP_ADMIN_API_KEY is not set. The /admin routes are disabled.");
            String::default()
        }));
        let notify_webhook_url = env::var("SHOP_NOTIFY_WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty());
        if notify_webhook_url.is_none() {
            info!("🪛️ SHOP_NOTIFY_WEBHOOK_URL is not set. Notifications will only be logged.");
        }
        let payment_display = configure_payment_display();
        let sepay = SepayConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            engine,
            admin_ids,
            admin_api_key,
            notify_webhook_url,
            payment_display,
            sepay,
        }
    }
}

fn configure_engine() -> EngineConfig {
    let timeout_minutes = positive_value(
        "SHOP_ORDER_TIMEOUT",
        env::var("SHOP_ORDER_TIMEOUT").ok(),
        DEFAULT_ORDER_TIMEOUT_MINUTES,
        "minutes",
    );
    let sweep_secs = positive_value(
        "SHOP_SWEEP_INTERVAL",
        env::var("SHOP_SWEEP_INTERVAL").ok(),
        DEFAULT_SWEEP_INTERVAL_SECS,
        "seconds",
    );
    let max_order_quantity = positive_value(
        "SHOP_MAX_ORDER_QUANTITY",
        env::var("SHOP_MAX_ORDER_QUANTITY").ok(),
        DEFAULT_MAX_ORDER_QUANTITY,
        "units",
    );
    EngineConfig {
        order_timeout: Duration::minutes(timeout_minutes),
        sweep_interval: StdDuration::from_secs(sweep_secs),
        max_order_quantity,
    }
}

fn configure_payment_display() -> PaymentDisplayConfig {
    let var = |name: &str| env::var(name).ok().unwrap_or_default();
    let config = PaymentDisplayConfig {
        bank_bin: var("SHOP_BANK_BIN"),
        bank_account: var("SHOP_BANK_ACCOUNT"),
        bank_name: var("SHOP_BANK_NAME"),
        account_owner: var("SHOP_BANK_OWNER"),
    };
    if config.bank_bin.is_empty() || config.bank_account.is_empty() {
        error!(
            "🪛️ SHOP_BANK_BIN and SHOP_BANK_ACCOUNT must both be set. Buyers will not be shown a usable account or QR \
             code."
        );
    }
    config
}

/// Parses a strictly positive number from `value`, logging and falling back to `default` if it is missing or invalid.
fn positive_value<T>(name: &str, value: Option<String>, default: T, unit: &str) -> T
where
    T: FromStr + PartialOrd + Default + Display + Copy,
    T::Err: Display,
{
    let Some(s) = value else {
        info!("🪛️ {name} is not set. Using the default value of {default} {unit}.");
        return default;
    };
    match s.trim().parse::<T>() {
        Ok(v) if v > T::default() => v,
        Ok(v) => {
            warn!("🪛️ {name} must be greater than zero, but is {v}. Using the default value of {default} {unit}.");
            default
        },
        Err(e) => {
            warn!("🪛️ Invalid configuration value for {name} ({s}). {e}. Using the default value of {default} {unit}.");
            default
        },
    }
}
