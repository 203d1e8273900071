use crate::{
    ledger::TransactionKind,
    render::{HtmlPage, RenderSurface, SummaryView, TransactionRow},
    validation::InputField,
};

use super::output;

/// Terminal surface: keeps the page model and echoes changes once live.
pub struct ConsoleSurface {
    page: HtmlPage,
    echo: bool,
}

impl ConsoleSurface {
    pub fn new(page: HtmlPage) -> Self {
        Self { page, echo: false }
    }

    /// Starts printing updates; startup replay stays silent.
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn page(&self) -> &HtmlPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut HtmlPage {
        &mut self.page
    }
}

impl RenderSurface for ConsoleSurface {
    fn render_summary(&mut self, summary: &SummaryView) {
        self.page.render_summary(summary);
        if self.echo {
            print_summary(summary);
        }
    }

    fn is_table_visible(&self, kind: TransactionKind) -> bool {
        self.page.is_table_visible(kind)
    }

    fn reveal_table(&mut self, kind: TransactionKind) {
        self.page.reveal_table(kind);
    }

    fn append_row(&mut self, kind: TransactionKind, row: &TransactionRow) {
        self.page.append_row(kind, row);
        if self.echo {
            output::success(format!(
                "Added {} #{}: {} {}",
                kind, row.sequence_number, row.description, row.amount
            ));
        }
    }

    fn show_error(&mut self, field: InputField, hint: &str) {
        self.page.show_error(field, hint);
        if self.echo {
            output::warning(format!("{}: {}", field, hint));
        }
    }

    fn clear_error(&mut self, field: InputField) {
        self.page.clear_error(field);
    }

    fn reset_form(&mut self) {
        self.page.reset_form();
    }
}

pub fn print_summary(summary: &SummaryView) {
    output::line(format!("Balance: {}", summary.balance));
    output::line(format!("Income:  {}", summary.income));
    output::line(format!("Expense: {}", summary.expense));
}
