use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use json_edit_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "JSON_EDIT_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "json_edit_cli=warn",
        1 => "json_edit_cli=debug",
        _ => "json_edit_cli=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    // An interactive terminal is not a document source.
    let stdin = io::stdin();
    let response = if stdin.is_terminal() {
        json_edit_cli::execute(&cli, &mut io::empty())
    } else {
        json_edit_cli::execute(&cli, &mut stdin.lock())
    };

    println!("{}", response.render(cli.pretty));
    if response.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
