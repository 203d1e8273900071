#![allow(dead_code)]

use cashbook::{
    controller::{StartupReport, Submission, SubmitOutcome, TransactionController},
    currency::CurrencyFormatter,
    errors::TrackerError,
    ledger::TransactionKind,
    render::HtmlPage,
    storage::{KeyValueStore, LedgerStore, MemoryStore},
};

/// Store whose reads and writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_get: bool,
    pub fail_set: bool,
    pub writes: usize,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        if self.fail_get {
            return Err(TrackerError::StorageUnavailable("read refused".into()));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        if self.fail_set {
            return Err(TrackerError::StorageUnavailable("quota exceeded".into()));
        }
        self.writes += 1;
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), TrackerError> {
        if self.fail_set {
            return Err(TrackerError::StorageUnavailable("quota exceeded".into()));
        }
        self.inner.remove(key)
    }
}

pub fn start_with<S: KeyValueStore>(
    store: S,
) -> (TransactionController<S, HtmlPage>, StartupReport) {
    TransactionController::start(
        LedgerStore::new(store),
        HtmlPage::default(),
        CurrencyFormatter::default(),
    )
}

pub fn fresh_controller() -> TransactionController<MemoryStore, HtmlPage> {
    start_with(MemoryStore::new()).0
}

pub fn income(description: &str, amount: &str) -> Submission {
    Submission::new(Some(TransactionKind::Income), description, amount)
}

pub fn expense(description: &str, amount: &str) -> Submission {
    Submission::new(Some(TransactionKind::Expense), description, amount)
}

pub fn assert_accepted(outcome: &SubmitOutcome) {
    assert!(outcome.is_accepted(), "expected acceptance, got {:?}", outcome);
}
