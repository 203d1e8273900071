use super::transaction::{Transaction, TransactionKind};

/// Float slack allowed when comparing stored totals against recomputed ones.
const TOTALS_TOLERANCE: f64 = 1e-6;

/// Running totals plus the two ordered transaction lists for one session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerState {
    balance: f64,
    total_income: f64,
    total_expense: f64,
    income: Vec<Transaction>,
    expense: Vec<Transaction>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        balance: f64,
        total_income: f64,
        total_expense: f64,
        income: Vec<Transaction>,
        expense: Vec<Transaction>,
    ) -> Self {
        Self {
            balance,
            total_income,
            total_expense,
            income,
            expense,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn total_income(&self) -> f64 {
        self.total_income
    }

    pub fn total_expense(&self) -> f64 {
        self.total_expense
    }

    pub fn entries(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expense,
        }
    }

    pub fn next_sequence_number(&self, kind: TransactionKind) -> u32 {
        self.entries(kind).len() as u32 + 1
    }

    pub fn transaction_count(&self) -> usize {
        self.income.len() + self.expense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count() == 0
    }

    /// Whether adding `amount` keeps every total finite.
    pub fn can_apply(&self, kind: TransactionKind, amount: f64) -> bool {
        let (total, balance) = match kind {
            TransactionKind::Income => (self.total_income + amount, self.balance + amount),
            TransactionKind::Expense => (self.total_expense + amount, self.balance - amount),
        };
        total.is_finite() && balance.is_finite()
    }

    /// Updates totals for one transaction. Callers guarantee `amount > 0`.
    pub fn apply_transaction(&mut self, kind: TransactionKind, amount: f64) {
        match kind {
            TransactionKind::Expense => {
                self.total_expense += amount;
                self.balance -= amount;
            }
            TransactionKind::Income => {
                self.total_income += amount;
                self.balance += amount;
            }
        }
    }

    /// Appends a new transaction to the matching list and applies its totals.
    pub fn record(
        &mut self,
        kind: TransactionKind,
        description: impl Into<String>,
        amount: f64,
    ) -> &Transaction {
        let transaction = Transaction::new(kind, self.next_sequence_number(kind), description, amount);
        let list = match kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Expense => &mut self.expense,
        };
        list.push(transaction);
        self.apply_transaction(kind, amount);
        let list = self.entries(kind);
        &list[list.len() - 1]
    }

    /// Verifies the invariants a restored ledger must satisfy.
    pub fn check_consistency(&self) -> Result<(), String> {
        for kind in TransactionKind::ALL {
            for (idx, txn) in self.entries(kind).iter().enumerate() {
                let expected = idx as u32 + 1;
                if txn.sequence_number() != expected {
                    return Err(format!(
                        "{} entry {} has sequence number {} (expected {})",
                        kind,
                        idx + 1,
                        txn.sequence_number(),
                        expected
                    ));
                }
                if !(txn.amount().is_finite() && txn.amount() > 0.0) {
                    return Err(format!(
                        "{} entry {} has non-positive amount {}",
                        kind,
                        expected,
                        txn.amount()
                    ));
                }
                if txn.description().is_empty() {
                    return Err(format!("{} entry {} has an empty description", kind, expected));
                }
            }
        }

        if !(self.total_income.is_finite()
            && self.total_expense.is_finite()
            && self.balance.is_finite())
        {
            return Err("totals must be finite".into());
        }
        if self.total_income < 0.0 || self.total_expense < 0.0 {
            return Err("totals must not be negative".into());
        }
        let income_sum: f64 = self.income.iter().map(Transaction::amount).sum();
        let expense_sum: f64 = self.expense.iter().map(Transaction::amount).sum();
        if !approx_eq(income_sum, self.total_income, self.total_income) {
            return Err(format!(
                "income total {} does not match entries ({})",
                self.total_income, income_sum
            ));
        }
        if !approx_eq(expense_sum, self.total_expense, self.total_expense) {
            return Err(format!(
                "expense total {} does not match entries ({})",
                self.total_expense, expense_sum
            ));
        }
        // The running balance drifts with the larger total, not with the difference.
        let scale = self.total_income.max(self.total_expense);
        if !approx_eq(self.balance, self.total_income - self.total_expense, scale) {
            return Err(format!(
                "balance {} is not income minus expense ({})",
                self.balance,
                self.total_income - self.total_expense
            ));
        }
        Ok(())
    }
}

fn approx_eq(left: f64, right: f64, scale: f64) -> bool {
    let scale = scale.abs().max(left.abs()).max(right.abs()).max(1.0);
    (left - right).abs() <= TOTALS_TOLERANCE * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_transaction_moves_balance_by_kind() {
        let mut state = LedgerState::new();
        state.apply_transaction(TransactionKind::Income, 1000.0);
        state.apply_transaction(TransactionKind::Expense, 300.0);
        assert_eq!(state.total_income(), 1000.0);
        assert_eq!(state.total_expense(), 300.0);
        assert_eq!(state.balance(), 700.0);
    }

    #[test]
    fn record_numbers_each_list_independently() {
        let mut state = LedgerState::new();
        assert_eq!(state.record(TransactionKind::Income, "Salary", 10.0).sequence_number(), 1);
        assert_eq!(state.record(TransactionKind::Expense, "Rent", 4.0).sequence_number(), 1);
        assert_eq!(state.record(TransactionKind::Income, "Bonus", 2.0).sequence_number(), 2);
        assert_eq!(state.entries(TransactionKind::Income).len(), 2);
        assert_eq!(state.next_sequence_number(TransactionKind::Expense), 2);
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn consistency_rejects_gaps_and_drifted_balance() {
        let gap = LedgerState::from_parts(
            5.0,
            5.0,
            0.0,
            vec![Transaction::new(TransactionKind::Income, 2, "Gift", 5.0)],
            Vec::new(),
        );
        assert!(gap.check_consistency().is_err());

        let drifted = LedgerState::from_parts(
            9.0,
            5.0,
            0.0,
            vec![Transaction::new(TransactionKind::Income, 1, "Gift", 5.0)],
            Vec::new(),
        );
        let err = drifted.check_consistency().unwrap_err();
        assert!(err.contains("balance"));
    }

    #[test]
    fn large_offsetting_totals_stay_consistent() {
        let mut state = LedgerState::new();
        state.record(TransactionKind::Income, "Sale", 1e16);
        state.record(TransactionKind::Expense, "Purchase", 1e16);
        state.record(TransactionKind::Income, "Tip", 0.5);
        assert_eq!(state.balance(), 0.5);
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn overflowing_amounts_cannot_be_applied() {
        let mut state = LedgerState::new();
        assert!(state.can_apply(TransactionKind::Income, 1.7e308));
        state.record(TransactionKind::Income, "Windfall", 1.7e308);
        assert!(!state.can_apply(TransactionKind::Income, 1.7e308));
        assert!(state.can_apply(TransactionKind::Expense, 1.7e308));

        let overflowed = LedgerState::from_parts(
            f64::INFINITY,
            f64::INFINITY,
            0.0,
            vec![Transaction::new(TransactionKind::Income, 1, "Windfall", 1.7e308)],
            Vec::new(),
        );
        assert!(overflowed.check_consistency().is_err());
    }

    #[test]
    fn whitespace_descriptions_from_older_saves_are_accepted() {
        let state = LedgerState::from_parts(
            5.0,
            5.0,
            0.0,
            vec![Transaction::new(TransactionKind::Income, 1, " ", 5.0)],
            Vec::new(),
        );
        assert!(state.check_consistency().is_ok());
    }
}
