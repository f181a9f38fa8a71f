//! Helpers for tests: throwaway SQLite databases and an in-memory payment ledger.
pub mod mock_ledger;
pub mod prepare_env;

pub use mock_ledger::MockLedger;
