use crate::{currency::CurrencyFormatter, ledger::LedgerState};

use super::RenderSurface;

/// Formatted text for the three total slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryView {
    pub income: String,
    pub expense: String,
    pub balance: String,
}

impl SummaryView {
    pub fn from_state(state: &LedgerState, formatter: &CurrencyFormatter) -> Self {
        let mut expense = formatter.format(state.total_expense());
        if let Some(share) = expense_share(state) {
            expense.push_str(&format!(" ({}%)", share));
        }
        Self {
            income: formatter.format(state.total_income()),
            expense,
            balance: formatter.format(state.balance()),
        }
    }
}

/// Expense as a whole percentage of income, halves rounded up.
///
/// `None` while there is no income to compare against.
pub fn expense_share(state: &LedgerState) -> Option<i64> {
    if state.total_income() <= 0.0 {
        return None;
    }
    let ratio = state.total_expense() / state.total_income() * 100.0;
    ratio.is_finite().then(|| (ratio + 0.5).floor() as i64)
}

pub fn render_summary<R: RenderSurface + ?Sized>(
    state: &LedgerState,
    formatter: &CurrencyFormatter,
    surface: &mut R,
) {
    surface.render_summary(&SummaryView::from_state(state, formatter));
}
