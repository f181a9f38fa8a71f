use log::*;
use sepay_tools::{SepayApi, SepayApiError, SepayConfig, SepayTransaction};
use shop_engine::gateway::{GatewayError, LedgerTransaction, PaymentLedger};

/// The shop's bank account, read through SePay.
#[derive(Clone)]
pub struct SepayLedger {
    api: SepayApi,
}

impl SepayLedger {
    pub fn new(config: SepayConfig) -> Result<Self, SepayApiError> {
        if !config.has_api_key() {
            warn!("🏦️ No SePay API key is configured. Every payment check will fail until one is set.");
        }
        let api = SepayApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentLedger for SepayLedger {
    async fn fetch_transactions(&self) -> Result<Vec<LedgerTransaction>, GatewayError> {
        let transactions = self.api.fetch_transactions().await.map_err(to_gateway_error)?;
        let incoming = transactions
            .iter()
            .filter(|tx| tx.incoming_amount().is_positive())
            .map(to_ledger_transaction)
            .collect::<Vec<_>>();
        trace!("🏦️ SePay returned {} transactions, {} of them incoming", transactions.len(), incoming.len());
        Ok(incoming)
    }
}

pub fn to_ledger_transaction(tx: &SepayTransaction) -> LedgerTransaction {
    let result = LedgerTransaction::new(tx.txid(), tx.memo(), tx.incoming_amount());
    match tx.timestamp() {
        Some(ts) => result.with_timestamp(ts),
        None => result,
    }
}

fn to_gateway_error(e: SepayApiError) -> GatewayError {
    match e {
        SepayApiError::Unauthorized { .. } => GatewayError::Unauthorized(e.to_string()),
        SepayApiError::JsonError(_) | SepayApiError::InvalidCurrencyAmount(_) => {
            GatewayError::InvalidResponse(e.to_string())
        },
        e => GatewayError::Unavailable(e.to_string()),
    }
}
