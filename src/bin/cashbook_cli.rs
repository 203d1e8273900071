use std::process::ExitCode;

fn main() -> ExitCode {
    cashbook::init();
    match cashbook::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cashbook::cli::output::error(&err);
            ExitCode::FAILURE
        }
    }
}
