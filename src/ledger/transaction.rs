use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Income or Expense classification of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "inc" => Ok(TransactionKind::Income),
            "expense" | "exp" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind `{}`", other)),
        }
    }
}

/// One recorded income or expense entry. Never changed after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    sequence_number: u32,
    description: String,
    amount: f64,
    kind: TransactionKind,
}

impl Transaction {
    pub(crate) fn new(
        kind: TransactionKind,
        sequence_number: u32,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            sequence_number,
            description: description.into(),
            amount,
            kind,
        }
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_short_and_long_names() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" exp ".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
