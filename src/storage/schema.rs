use serde::{Deserialize, Serialize};

use crate::{
    errors::TrackerError,
    ledger::{LedgerState, Transaction, TransactionKind},
};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Stored layout of the ledger: `{version, bal, inc, exp, income, expense}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedLedger {
    #[serde(default = "PersistedLedger::legacy_version")]
    pub version: u32,
    pub bal: f64,
    pub inc: f64,
    pub exp: f64,
    #[serde(default)]
    pub income: Vec<PersistedEntry>,
    #[serde(default)]
    pub expense: Vec<PersistedEntry>,
}

/// One stored row; its kind is implied by the list holding it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedEntry {
    pub no: u32,
    pub desc: String,
    pub amt: f64,
}

impl PersistedLedger {
    /// Payloads written before versioning carry no `version` field.
    fn legacy_version() -> u32 {
        1
    }

    pub fn from_state(state: &LedgerState) -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            bal: state.balance(),
            inc: state.total_income(),
            exp: state.total_expense(),
            income: entries_of(state, TransactionKind::Income),
            expense: entries_of(state, TransactionKind::Expense),
        }
    }

    /// Rebuilds the ledger, rejecting payloads that break its invariants.
    pub fn into_state(self) -> Result<LedgerState, TrackerError> {
        if self.version > CURRENT_SCHEMA_VERSION {
            return Err(TrackerError::UnsupportedSchema {
                found: self.version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        let income = to_transactions(self.income, TransactionKind::Income);
        let expense = to_transactions(self.expense, TransactionKind::Expense);
        let state = LedgerState::from_parts(self.bal, self.inc, self.exp, income, expense);
        state
            .check_consistency()
            .map_err(TrackerError::CorruptState)?;
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, TrackerError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, TrackerError> {
        serde_json::from_str(data).map_err(|err| TrackerError::CorruptState(err.to_string()))
    }
}

fn entries_of(state: &LedgerState, kind: TransactionKind) -> Vec<PersistedEntry> {
    state
        .entries(kind)
        .iter()
        .map(|txn| PersistedEntry {
            no: txn.sequence_number(),
            desc: txn.description().to_string(),
            amt: txn.amount(),
        })
        .collect()
}

fn to_transactions(entries: Vec<PersistedEntry>, kind: TransactionKind) -> Vec<Transaction> {
    entries
        .into_iter()
        .map(|entry| Transaction::new(kind, entry.no, entry.desc, entry.amt))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_payloads_written_before_versioning() {
        let raw = r#"{"bal":700,"inc":1000,"exp":300,
            "income":[{"no":1,"desc":"Salary","amt":1000}],
            "expense":[{"no":1,"desc":"Rent","amt":300}]}"#;
        let persisted = PersistedLedger::from_json(raw).expect("parse");
        assert_eq!(persisted.version, 1);
        let state = persisted.into_state().expect("valid state");
        assert_eq!(state.balance(), 700.0);
        assert_eq!(state.entries(TransactionKind::Expense)[0].description(), "Rent");
        assert_eq!(
            state.entries(TransactionKind::Income)[0].kind(),
            TransactionKind::Income
        );
    }

    #[test]
    fn writes_the_documented_field_names() {
        let mut state = LedgerState::new();
        state.record(TransactionKind::Income, "Salary", 1000.0);
        let json = PersistedLedger::from_state(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["bal"], 1000.0);
        assert_eq!(value["inc"], 1000.0);
        assert_eq!(value["exp"], 0.0);
        assert_eq!(value["income"][0]["no"], 1);
        assert_eq!(value["income"][0]["desc"], "Salary");
        assert_eq!(value["income"][0]["amt"], 1000.0);
        assert_eq!(value["expense"], serde_json::json!([]));
    }

    #[test]
    fn newer_schema_is_rejected() {
        let raw = r#"{"version":9,"bal":0,"inc":0,"exp":0,"income":[],"expense":[]}"#;
        let err = PersistedLedger::from_json(raw)
            .unwrap()
            .into_state()
            .unwrap_err();
        assert!(matches!(err, TrackerError::UnsupportedSchema { found: 9, .. }));
    }

    #[test]
    fn malformed_json_is_corrupt() {
        let err = PersistedLedger::from_json("{not json").unwrap_err();
        assert!(err.is_corrupt());
    }
}
