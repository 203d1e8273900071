use tracing::debug;

use crate::{
    currency::CurrencyFormatter,
    ledger::{Transaction, TransactionKind},
};

use super::RenderSurface;

/// Cells of one table row: number, description, formatted amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub sequence_number: u32,
    pub description: String,
    pub amount: String,
}

impl TransactionRow {
    pub fn new(transaction: &Transaction, formatter: &CurrencyFormatter) -> Self {
        Self {
            sequence_number: transaction.sequence_number(),
            description: transaction.description().to_string(),
            amount: formatter.format(transaction.amount()),
        }
    }

    pub fn cells(&self) -> [String; 3] {
        [
            self.sequence_number.to_string(),
            self.description.clone(),
            self.amount.clone(),
        ]
    }
}

/// Appends the row to its table, revealing the table the first time.
pub fn render_transaction<R: RenderSurface + ?Sized>(
    kind: TransactionKind,
    transaction: &Transaction,
    formatter: &CurrencyFormatter,
    surface: &mut R,
) {
    if !surface.is_table_visible(kind) {
        debug!(%kind, "revealing table");
        surface.reveal_table(kind);
    }
    surface.append_row(kind, &TransactionRow::new(transaction, formatter));
}
