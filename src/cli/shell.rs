//! Line sources for the shell: a rustyline prompt for people, stdin for scripts.

use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, Validator,
};

use crate::{config::Config, ledger::TransactionKind, validation::InputField};

use super::core::{CliError, CliMode, CommandError, LoopControl, ShellContext, COMMANDS};
use super::output::{self, OutputPreferences};

const SCRIPT_MODE_ENV: &str = "CASHBOOK_CLI_SCRIPT";

enum Input {
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    Closed,
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_preferences(OutputPreferences {
        plain: mode == CliMode::Script || std::env::var_os("NO_COLOR").is_some(),
    });

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => {
            let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
            editor.set_helper(Some(ShellHelper));
            drive(&mut context, |context| prompt_line(&mut editor, context))
        }
        CliMode::Script => {
            let mut lines = io::stdin().lock().lines();
            drive(&mut context, |_| match lines.next() {
                Some(line) => Ok(Input::Line(line?)),
                None => Ok(Input::Closed),
            })
        }
    }
}

fn drive<F>(context: &mut ShellContext, mut next: F) -> Result<(), CliError>
where
    F: FnMut(&ShellContext) -> Result<Input, CliError>,
{
    while context.running {
        match next(context)? {
            Input::Line(line) => match execute(context, &line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => context.running = false,
                Err(err) => context.report_error(err)?,
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    context.running = false;
                }
            }
            Input::Closed => break,
        }
    }
    Ok(())
}

fn prompt_line(
    editor: &mut Editor<ShellHelper, DefaultHistory>,
    context: &ShellContext,
) -> Result<Input, CliError> {
    match editor.readline(&context.prompt()) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.trim()).ok();
            }
            Ok(Input::Line(line))
        }
        Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
        Err(ReadlineError::Eof) => Ok(Input::Closed),
        Err(err) => Err(err.into()),
    }
}

/// Runs one shell line. Blank lines and `#` comments are skipped.
fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read `{}`: {}", line, err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

/// Completes command names, then the first argument of commands that take a fixed set.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct ShellHelper;

impl ShellHelper {
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<&'static str>) {
        let before = &line[..pos];
        let start = before.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
        let word = before[start..].to_ascii_lowercase();
        let preceding: Vec<&str> = before[..start].split_whitespace().collect();
        let choices = match preceding.as_slice() {
            [] => command_words(),
            [command] => argument_words(&command.to_ascii_lowercase()),
            _ => Vec::new(),
        };
        let matches = choices
            .into_iter()
            .filter(|choice| choice.starts_with(word.as_str()))
            .collect();
        (start, matches)
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(line, pos);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: format!("{} ", word),
            })
            .collect();
        Ok((start, pairs))
    }
}

fn command_words() -> Vec<&'static str> {
    COMMANDS.iter().map(|spec| spec.name).collect()
}

fn argument_words(command: &str) -> Vec<&'static str> {
    match command {
        "add" | "list" => TransactionKind::ALL.iter().map(|kind| kind.as_str()).collect(),
        "focus" => InputField::ALL.iter().map(|field| field.as_str()).collect(),
        "config" => Config::KEYS.to_vec(),
        "help" => command_words(),
        _ => Vec::new(),
    }
}
