use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    match inventory_console::app::run_cli() {
        Ok(code) => code,
        Err(e) => {
            eprintln!(
                "{}{}{} {}",
                "[".bold().white(),
                "ERR".bold().red(),
                "]".bold().white(),
                e
            );
            ExitCode::FAILURE
        }
    }
}
