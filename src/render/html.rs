use std::fmt::Write as _;

use chrono::{Local, NaiveDateTime};

use crate::{ledger::TransactionKind, validation::InputField};

use super::{RenderSurface, SummaryView, TransactionRow};

const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One input of the add-transaction form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub placeholder: String,
    pub has_error: bool,
}

/// A transactions table and the container that hides it until first use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSection {
    pub visible: bool,
    pub rows: Vec<TransactionRow>,
}

/// In-memory model of the tracker page that can be written out as HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPage {
    title: String,
    summary: SummaryView,
    income: TableSection,
    expense: TableSection,
    description: FieldState,
    amount: FieldState,
    focused: Option<InputField>,
}

impl HtmlPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: SummaryView::default(),
            income: TableSection::default(),
            expense: TableSection::default(),
            description: FieldState::default(),
            amount: FieldState::default(),
            focused: None,
        }
    }

    pub fn summary(&self) -> &SummaryView {
        &self.summary
    }

    pub fn table(&self, kind: TransactionKind) -> &TableSection {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expense,
        }
    }

    fn table_mut(&mut self, kind: TransactionKind) -> &mut TableSection {
        match kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Expense => &mut self.expense,
        }
    }

    pub fn field(&self, field: InputField) -> &FieldState {
        match field {
            InputField::Description => &self.description,
            InputField::Amount => &self.amount,
        }
    }

    fn field_mut(&mut self, field: InputField) -> &mut FieldState {
        match field {
            InputField::Description => &mut self.description,
            InputField::Amount => &mut self.amount,
        }
    }

    /// Simulates typing into an input.
    pub fn type_into(&mut self, field: InputField, value: impl Into<String>) {
        self.focused = Some(field);
        self.field_mut(field).value = value.into();
    }

    pub fn set_focus(&mut self, field: Option<InputField>) {
        self.focused = field;
    }

    pub fn focused(&self) -> Option<InputField> {
        self.focused
    }

    /// Serializes the page, stamping the footer with the current local time.
    pub fn to_html(&self) -> String {
        self.to_html_at(Local::now().naive_local())
    }

    pub fn to_html_at(&self, exported_at: NaiveDateTime) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("  <meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "  <title>{}</title>", escape(&self.title));
        out.push_str("</head>\n<body>\n");

        out.push_str("  <section class=\"summary\">\n");
        let slots = [
            ("balance", &self.summary.balance),
            ("income", &self.summary.income),
            ("expense", &self.summary.expense),
        ];
        for (class, text) in slots {
            let _ = writeln!(out, "    <p class=\"{}\">{}</p>", class, escape(text));
        }
        out.push_str("  </section>\n");

        out.push_str("  <form>\n");
        out.push_str("    <input type=\"radio\" class=\"type\" name=\"type\" value=\"income\">\n");
        out.push_str("    <input type=\"radio\" class=\"type\" name=\"type\" value=\"expense\">\n");
        for field in InputField::ALL {
            let state = self.field(field);
            let input_type = match field {
                InputField::Description => "text",
                InputField::Amount => "number",
            };
            let style = if state.has_error {
                " style=\"border: red solid 2px\""
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "    <input type=\"{}\" id=\"{}\" value=\"{}\" placeholder=\"{}\"{}>",
                input_type,
                field.as_str(),
                escape(&state.value),
                escape(&state.placeholder),
                style
            );
        }
        out.push_str("    <button class=\"submit_button\">Add</button>\n");
        out.push_str("  </form>\n");

        for kind in TransactionKind::ALL {
            let section = self.table(kind);
            let style = if section.visible {
                " style=\"opacity: 1\""
            } else {
                ""
            };
            let _ = writeln!(out, "  <div class=\"hidden\"{}>", style);
            let _ = writeln!(out, "    <table class=\"all_{}s\">", kind.as_str());
            for row in &section.rows {
                let _ = writeln!(
                    out,
                    "      <tr><td class=\"serial_no\">{}</td><td>{}</td><td class=\"amt\">{}</td></tr>",
                    row.sequence_number,
                    escape(&row.description),
                    escape(&row.amount)
                );
            }
            out.push_str("    </table>\n  </div>\n");
        }

        let _ = writeln!(
            out,
            "  <footer>Exported {}</footer>",
            exported_at.format(EXPORT_TIMESTAMP_FORMAT)
        );
        out.push_str("</body>\n</html>\n");
        out
    }
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new("Cashbook")
    }
}

impl RenderSurface for HtmlPage {
    fn render_summary(&mut self, summary: &SummaryView) {
        self.summary = summary.clone();
    }

    fn is_table_visible(&self, kind: TransactionKind) -> bool {
        self.table(kind).visible
    }

    fn reveal_table(&mut self, kind: TransactionKind) {
        self.table_mut(kind).visible = true;
    }

    fn append_row(&mut self, kind: TransactionKind, row: &TransactionRow) {
        self.table_mut(kind).rows.push(row.clone());
    }

    fn show_error(&mut self, field: InputField, hint: &str) {
        let state = self.field_mut(field);
        state.has_error = true;
        state.placeholder = hint.to_string();
    }

    fn clear_error(&mut self, field: InputField) {
        let state = self.field_mut(field);
        state.has_error = false;
        state.placeholder.clear();
    }

    fn reset_form(&mut self) {
        self.description.value.clear();
        self.amount.value.clear();
        self.focused = None;
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
