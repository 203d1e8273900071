use crate::errors::TrackerError;

use super::{KeyValueStore, Result};

/// Stand-in for a store that could not be opened; every access fails.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn error(&self) -> TrackerError {
        TrackerError::StorageUnavailable(self.reason.clone())
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(self.error())
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(self.error())
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LedgerStore;

    #[test]
    fn loads_fail_as_unavailable_not_corrupt() {
        let store = LedgerStore::new(UnavailableStore::new("no data directory"));
        let err = store.load().unwrap_err();
        assert!(!err.is_corrupt());
        assert!(err.to_string().contains("no data directory"));
    }
}
