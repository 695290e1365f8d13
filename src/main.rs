mod cli;
mod config;
mod core;
mod error;
mod format;
mod reporter;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Commands};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("TSREPORT_LOG", "warn"))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    // Preprocess argv: if first arg is not a known subcommand or flag, insert "report"
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first) = args.get(1) {
        if !matches!(
            first.as_str(),
            "report" | "reporters" | "config" | "help" | "--help" | "-h" | "--version" | "-V"
        ) {
            args.insert(1, "report".to_string());
        }
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(c) => c,
        Err(e) => {
            e.print().ok();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    let result = match cli.command {
        Commands::Report(report_args) => cli::handle_report(report_args),
        Commands::Reporters => cli::handle_reporters(),
        Commands::Config { action } => cli::handle_config(action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
