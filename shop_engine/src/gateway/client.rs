use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Amount, ReferenceToken},
    gateway::GatewayError,
};

/// An incoming transfer as reported by the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub txid: String,
    /// The free-text description the sender typed. Banks often add their own prefixes and suffixes.
    pub memo: String,
    pub amount: Amount,
    pub timestamp: Option<DateTime<Utc>>,
}

impl LedgerTransaction {
    pub fn new<S1: Into<String>, S2: Into<String>>(txid: S1, memo: S2, amount: Amount) -> Self {
        Self { txid: txid.into(), memo: memo.into(), amount, timestamp: None }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// True if this transfer pays at least `min_amount` and carries `token` in its memo.
    pub fn pays_for(&self, token: &ReferenceToken, min_amount: Amount) -> bool {
        self.amount >= min_amount && token.is_contained_in(&self.memo)
    }
}

/// A source of recent incoming transactions.
#[allow(async_fn_in_trait)]
pub trait PaymentLedger: Clone {
    async fn fetch_transactions(&self) -> Result<Vec<LedgerTransaction>, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct PaymentGatewayClient<L> {
    ledger: L,
}

impl<L> PaymentGatewayClient<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }
}

impl<L: PaymentLedger> PaymentGatewayClient<L> {
    /// Lists recent transactions. Ledger failures are logged and reported as an empty list, so a flaky bank API
    /// looks the same as "no payment yet" and the order is simply checked again later.
    pub async fn list_recent_transactions(&self) -> Vec<LedgerTransaction> {
        match self.ledger.fetch_transactions().await {
            Ok(txs) => {
                trace!("🏦️ Fetched {} recent transactions", txs.len());
                txs
            },
            Err(e) => {
                warn!("🏦️ Could not fetch recent transactions. {e}");
                Vec::new()
            },
        }
    }

    /// Returns the first transaction that pays for the order identified by `token`.
    pub async fn find_matching_transaction(
        &self,
        token: &ReferenceToken,
        min_amount: Amount,
    ) -> Option<LedgerTransaction> {
        let found = self.list_recent_transactions().await.into_iter().find(|tx| tx.pays_for(token, min_amount));
        if let Some(tx) = &found {
            info!("🏦️ Transaction {} ({}) pays for reference {token}", tx.txid, tx.amount);
        }
        found
    }

    pub async fn find_match(&self, token: &ReferenceToken, min_amount: Amount) -> bool {
        self.find_matching_transaction(token, min_amount).await.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matching_rules() {
        let token = ReferenceToken::new("K3X9Q2AB");
        let exact = LedgerTransaction::new("1", "CT DEN:123 k3x9q2ab FT2409", Amount::from(100_000));
        let over = LedgerTransaction::new("2", "K3X9Q2AB", Amount::from(100_001));
        let under = LedgerTransaction::new("3", "K3X9Q2AB", Amount::from(99_999));
        let wrong_memo = LedgerTransaction::new("4", "K3X9Q2A", Amount::from(500_000));
        assert!(exact.pays_for(&token, Amount::from(100_000)));
        assert!(over.pays_for(&token, Amount::from(100_000)));
        assert!(!under.pays_for(&token, Amount::from(100_000)));
        assert!(!wrong_memo.pays_for(&token, Amount::from(100_000)));
    }
}
