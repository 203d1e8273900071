use std::{io, path::Path};

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::warn;

use crate::{
    config::{Config, ConfigManager},
    controller::{
        PersistenceMode, Rejection, StartupReport, Submission, SubmitOutcome,
        TransactionController,
    },
    currency::CurrencyFormatter,
    errors::TrackerError,
    ledger::TransactionKind,
    render::{HtmlPage, TransactionRow},
    storage::{JsonFileStore, KeyValueStore, LedgerStore, UnavailableStore},
    utils::paths::write_atomic,
    validation::InputField,
};

use super::{
    console::{print_summary, ConsoleSurface},
    output,
};

type SessionController = TransactionController<Box<dyn KeyValueStore>, ConsoleSurface>;

const DEFAULT_PAGE_TITLE: &str = "Cashbook";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub(crate) struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub(crate) const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "income",
        usage: "income <description> <amount>",
        summary: "Record an income transaction",
    },
    CommandSpec {
        name: "expense",
        usage: "expense <description> <amount>",
        summary: "Record an expense transaction",
    },
    CommandSpec {
        name: "add",
        usage: "add [income|expense] [description] [amount]",
        summary: "Record a transaction, prompting for missing parts",
    },
    CommandSpec {
        name: "summary",
        usage: "summary",
        summary: "Show balance, income and expense totals",
    },
    CommandSpec {
        name: "list",
        usage: "list [income|expense]",
        summary: "List recorded transactions",
    },
    CommandSpec {
        name: "focus",
        usage: "focus <description|amount>",
        summary: "Focus a form field, clearing its error",
    },
    CommandSpec {
        name: "page",
        usage: "page <path>",
        summary: "Write the current page as an HTML file",
    },
    CommandSpec {
        name: "config",
        usage: "config [key [value]]",
        summary: "Show or change settings",
    },
    CommandSpec {
        name: "version",
        usage: "version",
        summary: "Show build information",
    },
    CommandSpec {
        name: "help",
        usage: "help [command]",
        summary: "Show available commands",
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
    },
];

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    config_manager: ConfigManager,
    config: Config,
    controller: SessionController,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load().unwrap_or_else(|err| {
            output::warning(format!(
                "Could not read {}: {}. Using default settings.",
                config_manager.path().display(),
                err
            ));
            Config::default()
        });
        let controller = open_session(&config_manager, &config);
        Ok(Self {
            mode,
            running: true,
            config_manager,
            config,
            controller,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = COMMANDS.iter().map(|spec| spec.name).collect();
        names.push("quit");
        names
    }

    pub fn prompt(&self) -> String {
        let balance = self
            .controller
            .formatter()
            .format(self.controller.ledger().balance());
        format!("cashbook [{}]> ", balance)
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match command {
            "income" => self.cmd_record(Some(TransactionKind::Income), args),
            "expense" => self.cmd_record(Some(TransactionKind::Expense), args),
            "add" => self.cmd_add(args),
            "summary" => {
                self.cmd_summary();
                Ok(LoopControl::Continue)
            }
            "list" => self.cmd_list(args),
            "focus" => self.cmd_focus(args),
            "page" => self.cmd_page(args),
            "config" => self.cmd_config(args),
            "version" => {
                self.cmd_version();
                Ok(LoopControl::Continue)
            }
            "help" => {
                self.cmd_help(args);
                Ok(LoopControl::Continue)
            }
            "exit" | "quit" => Ok(LoopControl::Exit),
            _ => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    fn cmd_record(
        &mut self,
        kind: Option<TransactionKind>,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if args.len() > 2 {
            return Err(CommandError::InvalidArguments(
                "expected a description and an amount (quote descriptions with spaces)".into(),
            ));
        }
        let description = args.first().copied().unwrap_or_default();
        let amount = args.get(1).copied().unwrap_or_default();
        self.submit(Submission::new(kind, description, amount));
        Ok(LoopControl::Continue)
    }

    fn cmd_add(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let (kind, rest) = match args.first() {
            Some(first) => match first.parse::<TransactionKind>() {
                Ok(kind) => (Some(kind), &args[1..]),
                Err(_) => (None, args),
            },
            None => (None, args),
        };
        if self.mode == CliMode::Script {
            return self.cmd_record(kind, rest);
        }

        let theme = ColorfulTheme::default();
        let kind = match kind {
            Some(kind) => Some(kind),
            None => {
                let labels: Vec<&str> = TransactionKind::ALL.iter().map(|k| k.as_str()).collect();
                Select::with_theme(&theme)
                    .with_prompt("Transaction type")
                    .items(&labels)
                    .default(0)
                    .interact_opt()?
                    .map(|idx| TransactionKind::ALL[idx])
            }
        };
        let description = match rest.first() {
            Some(value) => value.to_string(),
            None => Input::<String>::with_theme(&theme)
                .with_prompt("Description")
                .allow_empty(true)
                .interact_text()?,
        };
        let amount = match rest.get(1) {
            Some(value) => value.to_string(),
            None => Input::<String>::with_theme(&theme)
                .with_prompt("Amount")
                .allow_empty(true)
                .interact_text()?,
        };
        self.submit(Submission::new(kind, description, amount));
        Ok(LoopControl::Continue)
    }

    fn submit(&mut self, submission: Submission) {
        match self.controller.submit(&submission) {
            SubmitOutcome::Accepted { persisted, .. } => {
                if !persisted {
                    output::warning("Not saved: storage is unavailable for this session.");
                }
            }
            SubmitOutcome::Rejected(Rejection::MissingKind) => {
                output::warning("Choose income or expense before adding a transaction.");
            }
            SubmitOutcome::Rejected(Rejection::Invalid(_)) => {
                output::info("Use `focus <field>` to clear the error, then try again.");
            }
        }
    }

    fn cmd_summary(&self) {
        output::section("Summary");
        print_summary(self.controller.surface().page().summary());
    }

    fn cmd_list(&self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let kinds: Vec<TransactionKind> = match args.first() {
            Some(value) => vec![value
                .parse::<TransactionKind>()
                .map_err(CommandError::InvalidArguments)?],
            None => TransactionKind::ALL.to_vec(),
        };
        let page = self.controller.surface().page();
        for kind in kinds {
            output::section(format!("{} transactions", capitalize(kind.as_str())));
            let table = page.table(kind);
            if table.rows.is_empty() {
                output::info("No transactions recorded.");
                continue;
            }
            for line in render_rows(&table.rows) {
                output::line(line);
            }
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_focus(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let field = match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("description") | Some("desc") => InputField::Description,
            Some("amount") | Some("amt") => InputField::Amount,
            _ => {
                return Err(CommandError::InvalidArguments(
                    "usage: focus <description|amount>".into(),
                ))
            }
        };
        self.controller.clear_field_error(field);
        self.controller
            .surface_mut()
            .page_mut()
            .set_focus(Some(field));
        Ok(LoopControl::Continue)
    }

    fn cmd_page(&self, args: &[&str]) -> Result<LoopControl, CommandError> {
        let [path] = args else {
            return Err(CommandError::InvalidArguments("usage: page <path>".into()));
        };
        let html = self.controller.surface().page().to_html();
        write_atomic(Path::new(path), &html)?;
        output::success(format!("Page written to {}", path));
        Ok(LoopControl::Continue)
    }

    fn cmd_config(&mut self, args: &[&str]) -> Result<LoopControl, CommandError> {
        match args {
            [] => {
                output::section("Configuration");
                for key in Config::KEYS {
                    let value = self.config.get(key).unwrap_or_else(|| "(unset)".into());
                    output::line(format!("{} = {}", key, value));
                }
            }
            [key] => match self.config.get(key) {
                Some(value) => output::line(format!("{} = {}", key, value)),
                None => output::line(format!("{} = (unset)", key)),
            },
            [key, value] => {
                let mut updated = self.config.clone();
                updated.set(key, value)?;
                CurrencyFormatter::from_config(&updated)?;
                self.config_manager.save(&updated)?;
                self.config = updated;
                output::success(format!("Saved {} to {}", key, self.config_manager.path().display()));
                self.reopen();
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "usage: config [key [value]]".into(),
                ))
            }
        }
        Ok(LoopControl::Continue)
    }

    /// Rebuilds the session so new settings take effect.
    fn reopen(&mut self) {
        if self.controller.persistence() == PersistenceMode::InMemoryOnly {
            output::warning("Storage is unavailable; restart to apply the new settings.");
            return;
        }
        self.controller = open_session(&self.config_manager, &self.config);
    }

    fn cmd_version(&self) {
        output::line(format!(
            "cashbook {} ({}, {} build, {})",
            env!("CARGO_PKG_VERSION"),
            env!("CASHBOOK_BUILD_HASH"),
            env!("CASHBOOK_BUILD_PROFILE"),
            env!("CASHBOOK_BUILD_TIMESTAMP"),
        ));
    }

    fn cmd_help(&self, args: &[&str]) {
        if let Some(name) = args.first() {
            match COMMANDS.iter().find(|spec| spec.name == *name) {
                Some(spec) => {
                    output::line(format!("usage: {}", spec.usage));
                    output::line(spec.summary);
                }
                None => self.suggest_command(name),
            }
            return;
        }
        output::section("Commands");
        let width = COMMANDS.iter().map(|spec| spec.usage.len()).max().unwrap_or(0);
        for spec in COMMANDS {
            output::line(format!("  {:<width$}  {}", spec.usage, spec.summary, width = width));
        }
    }

    fn suggest_command(&self, input: &str) {
        output::error(format!("Unknown command `{}`.", input));
        let mut suggestions: Vec<_> = self
            .command_names()
            .into_iter()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);
        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
        Ok(())
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }
}

/// Opens the ledger for `config`. Storage problems leave an unsaved session.
fn open_session(manager: &ConfigManager, config: &Config) -> SessionController {
    let formatter = CurrencyFormatter::from_config(config).unwrap_or_else(|err| {
        output::warning(format!("{}. Using the default currency format.", err));
        CurrencyFormatter::default()
    });
    let store: Box<dyn KeyValueStore> = match JsonFileStore::in_data_dir(manager.base_dir()) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "ledger store could not be opened");
            let reason = match err {
                TrackerError::StorageUnavailable(reason) => reason,
                other => other.to_string(),
            };
            Box::new(UnavailableStore::new(reason))
        }
    };
    let title = config
        .page_title
        .clone()
        .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string());
    let (mut controller, report) = TransactionController::start(
        LedgerStore::with_key(store, config.storage_key.clone()),
        ConsoleSurface::new(HtmlPage::new(title)),
        formatter,
    );
    match report {
        StartupReport::Restored { transactions } => {
            output::info(format!("Loaded {} transaction(s).", transactions))
        }
        StartupReport::Fresh => output::info("Starting a new ledger."),
        StartupReport::Recovered {
            quarantined: Some(key),
        } => output::warning(format!(
            "Stored ledger was unreadable and was moved to `{}`. Starting a new ledger.",
            key
        )),
        StartupReport::Recovered { quarantined: None } => output::warning(
            "Stored ledger was unreadable. Starting a new ledger without saving.",
        ),
        StartupReport::StorageUnavailable => {
            output::warning("Storage is unavailable. Changes will not be saved.")
        }
    }
    controller.surface_mut().set_echo(true);
    controller
}

fn render_rows(rows: &[TransactionRow]) -> Vec<String> {
    let headers = ["No", "Description", "Amount"];
    let cells: Vec<[String; 3]> = rows.iter().map(TransactionRow::cells).collect();
    let mut widths = headers.map(str::len);
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    let mut lines = vec![format!(
        "{:>w0$}  {:<w1$}  {:>w2$}",
        headers[0],
        headers[1],
        headers[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    )];
    lines.push("-".repeat(widths.iter().sum::<usize>() + 4));
    for row in cells {
        lines.push(format!(
            "{:>w0$}  {:<w1$}  {:>w2$}",
            row[0],
            row[1],
            row[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        ));
    }
    lines
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_align_under_headers() {
        let rows = vec![TransactionRow {
            sequence_number: 1,
            description: "Salary".into(),
            amount: "₹1,000.00".into(),
        }];
        let lines = render_rows(&rows);
        assert_eq!(lines[0], "No  Description     Amount");
        assert_eq!(lines[2], " 1  Salary       ₹1,000.00");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("income"), "Income");
        assert_eq!(capitalize(""), "");
    }
}
