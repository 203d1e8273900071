//! Key-value stores and the adapter that keeps the ledger in one of them.

pub mod json_file;
pub mod ledger_store;
pub mod memory;
pub mod schema;
pub mod unavailable;

use crate::errors::TrackerError;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Client-side key-value storage holding serialized text.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

pub use json_file::JsonFileStore;
pub use ledger_store::{LedgerStore, DEFAULT_STORAGE_KEY};
pub use memory::MemoryStore;
pub use schema::{PersistedEntry, PersistedLedger, CURRENT_SCHEMA_VERSION};
pub use unavailable::UnavailableStore;
