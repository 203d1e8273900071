//! Ledger state and the transactions it records.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;

pub use ledger::LedgerState;
pub use transaction::{Transaction, TransactionKind};
