//! Rendering contract between the ledger logic and whatever displays it.

pub mod html;
pub mod summary;
pub mod transaction;

use crate::{ledger::TransactionKind, validation::InputField};

pub use html::{FieldState, HtmlPage, TableSection};
pub use summary::{expense_share, render_summary, SummaryView};
pub use transaction::{render_transaction, TransactionRow};

/// Display capabilities the controller drives.
pub trait RenderSurface {
    /// Writes the three total slots.
    fn render_summary(&mut self, summary: &SummaryView);
    fn is_table_visible(&self, kind: TransactionKind) -> bool;
    fn reveal_table(&mut self, kind: TransactionKind);
    /// Appends one row at the end of the kind's table.
    fn append_row(&mut self, kind: TransactionKind, row: &TransactionRow);
    /// Marks the field and swaps its placeholder for `hint`.
    fn show_error(&mut self, field: InputField, hint: &str);
    fn clear_error(&mut self, field: InputField);
    /// Empties both inputs and removes focus from them.
    fn reset_form(&mut self);
}

impl<R: RenderSurface + ?Sized> RenderSurface for &mut R {
    fn render_summary(&mut self, summary: &SummaryView) {
        (**self).render_summary(summary)
    }

    fn is_table_visible(&self, kind: TransactionKind) -> bool {
        (**self).is_table_visible(kind)
    }

    fn reveal_table(&mut self, kind: TransactionKind) {
        (**self).reveal_table(kind)
    }

    fn append_row(&mut self, kind: TransactionKind, row: &TransactionRow) {
        (**self).append_row(kind, row)
    }

    fn show_error(&mut self, field: InputField, hint: &str) {
        (**self).show_error(field, hint)
    }

    fn clear_error(&mut self, field: InputField) {
        (**self).clear_error(field)
    }

    fn reset_form(&mut self) {
        (**self).reset_form()
    }
}
