use std::process::ExitCode;

use clap::Parser;

use aide::cli::commands::Cli;
use aide::cli::handlers;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Some(command) => handlers::dispatch(command, cli.config.as_deref()),
        None => aide::tui::run(cli.config.as_deref()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("aide: {e}");
            ExitCode::FAILURE
        }
    }
}
