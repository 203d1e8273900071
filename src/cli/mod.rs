//! Terminal front end driving the transaction controller.

mod console;
mod core;
pub mod output;
mod shell;

pub use self::console::ConsoleSurface;
pub use self::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
pub use shell::run_cli;
