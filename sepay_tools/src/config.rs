use log::*;
use shop_common::Secret;

pub const DEFAULT_SEPAY_API_URL: &str = "https://my.sepay.vn/userapi/transactions/list";
pub const DEFAULT_TRANSACTION_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct SepayConfig {
    /// The transaction list endpoint.
    pub api_url: String,
    pub api_key: Secret<String>,
    /// How many of the most recent transactions to ask for on each query.
    pub transaction_limit: u32,
}

impl SepayConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("SEPAY_API_URL").unwrap_or_else(|_| {
            debug!("🏦️ SEPAY_API_URL not set, using {DEFAULT_SEPAY_API_URL}");
            DEFAULT_SEPAY_API_URL.to_string()
        });
        let api_key = Secret::new(std::env::var("SEPAY_API_KEY").unwrap_or_else(|_| {
            warn!("🏦️ SEPAY_API_KEY not set. Payments will never be detected.");
            String::default()
        }));
        let transaction_limit = std::env::var("SEPAY_TRANSACTION_LIMIT")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🏦️ Invalid SEPAY_TRANSACTION_LIMIT ({s}): {e}. Using the default."))
                    .ok()
            })
            .unwrap_or(DEFAULT_TRANSACTION_LIMIT);
        Self { api_url, api_key, transaction_limit }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.reveal().is_empty()
    }
}
