use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    StatusCode,
};

use crate::{
    config::SepayConfig,
    data_objects::{SepayTransaction, TransactionList},
    SepayApiError,
};

#[derive(Clone)]
pub struct SepayApi {
    config: SepayConfig,
    client: Arc<Client>,
}

impl SepayApi {
    pub fn new(config: SepayConfig) -> Result<Self, SepayApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.reveal()))
            .map_err(|e| SepayApiError::Initialization(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| SepayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &SepayConfig {
        &self.config
    }

    /// Fetches the most recent transactions on the account, newest first.
    pub async fn fetch_transactions(&self) -> Result<Vec<SepayTransaction>, SepayApiError> {
        let limit = self.config.transaction_limit.to_string();
        trace!("🏦️ Fetching up to {limit} transactions from {}", self.config.api_url);
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| SepayApiError::RestResponseError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            let list = response.json::<TransactionList>().await.map_err(|e| SepayApiError::JsonError(e.to_string()))?;
            trace!("🏦️ SePay returned {} transactions", list.transactions.len());
            return Ok(list.transactions);
        }
        let message = response.text().await.map_err(|e| SepayApiError::RestResponseError(e.to_string()))?;
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SepayApiError::Unauthorized { status: status.as_u16(), message })
            },
            _ => Err(SepayApiError::QueryError { status: status.as_u16(), message }),
        }
    }
}
