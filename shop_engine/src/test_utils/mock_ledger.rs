use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
        Mutex,
        PoisonError,
    },
    time::Duration,
};

use crate::{
    db_types::Amount,
    gateway::{GatewayError, LedgerTransaction, PaymentLedger},
};

/// An in-memory [`PaymentLedger`]. Clones share the same transactions, so a test can keep one handle and give another
/// to the engine.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    transactions: Arc<Mutex<Vec<LedgerTransaction>>>,
    failing: Arc<AtomicBool>,
    latency_ms: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an incoming transfer.
    pub fn receive(&self, memo: &str, amount: i64) {
        let mut txs = self.transactions.lock().unwrap_or_else(PoisonError::into_inner);
        let txid = format!("mock-tx-{}", txs.len() + 1);
        txs.push(LedgerTransaction::new(txid, memo, Amount::from(amount)));
    }

    /// While `true`, every fetch fails as if the bank API were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every fetch sleeps this long before answering.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms.store(latency.as_millis() as usize, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentLedger for MockLedger {
    async fn fetch_transactions(&self) -> Result<Vec<LedgerTransaction>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency as u64)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("mock ledger is offline".into()));
        }
        let txs = self.transactions.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(txs)
    }
}
