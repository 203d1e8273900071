use chrono::Utc;
use tracing::{debug, warn};

use crate::ledger::LedgerState;

use super::{schema::PersistedLedger, KeyValueStore, Result};

/// Key the page script has always used for the ledger.
pub const DEFAULT_STORAGE_KEY: &str = "transactions";

const QUARANTINE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Loads and saves the whole ledger under a single key.
#[derive(Debug)]
pub struct LedgerStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_backend(self) -> S {
        self.store
    }

    /// `Ok(None)` means nothing was stored yet.
    pub fn load(&self) -> Result<Option<LedgerState>> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "no stored ledger");
            return Ok(None);
        };
        let state = PersistedLedger::from_json(&raw)?.into_state()?;
        debug!(
            key = %self.key,
            transactions = state.transaction_count(),
            "restored ledger"
        );
        Ok(Some(state))
    }

    /// Overwrites the stored value with the full ledger.
    pub fn save(&mut self, state: &LedgerState) -> Result<()> {
        let json = PersistedLedger::from_state(state).to_json()?;
        self.store.set(&self.key, &json)
    }

    /// Moves an unreadable value aside so a fresh ledger can take its key.
    pub fn quarantine(&mut self) -> Result<Option<String>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let target = format!(
            "{}.corrupt.{}",
            self.key,
            Utc::now().format(QUARANTINE_TIMESTAMP_FORMAT)
        );
        self.store.set(&target, &raw)?;
        self.store.remove(&self.key)?;
        warn!(key = %self.key, quarantined = %target, "moved unreadable ledger aside");
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::TransactionKind, storage::MemoryStore};

    #[test]
    fn empty_store_loads_as_absent() {
        let store = LedgerStore::new(MemoryStore::new());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_returns_equal_state() {
        let mut store = LedgerStore::new(MemoryStore::new());
        let mut state = LedgerState::new();
        state.record(TransactionKind::Income, "Salary", 1000.0);
        state.record(TransactionKind::Expense, "Rent", 300.0);
        state.record(TransactionKind::Expense, "Food", 120.25);
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn quarantine_moves_value_to_new_key() {
        let mut store = LedgerStore::new(MemoryStore::with_entry("transactions", "garbage"));
        assert!(store.load().unwrap_err().is_corrupt());
        let moved = store.quarantine().unwrap().expect("value moved");
        assert!(moved.starts_with("transactions.corrupt."));
        assert_eq!(store.backend().get(&moved).unwrap().as_deref(), Some("garbage"));
        assert!(store.load().unwrap().is_none());
    }
}
