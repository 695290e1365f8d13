use std::io::Read;
use std::path::Path;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    config_path, load_config, load_config_from, parse_options, save_config_to, Config,
};
use crate::core::FetchResult;
use crate::error::{Result, ReportError};
use crate::reporter::{find_reporter, registered_reporters, DEFAULT_REPORTER};

#[derive(Parser)]
#[command(
    name = "tsreport",
    version,
    about = "Print a monthly time-tracking report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish the report for a fetched month
    Report(ReportArgs),
    /// List available reporters
    Reporters,
    /// Manage tsreport stored config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct ReportArgs {
    /// Fetched month as JSON (path, or - for stdin)
    pub input: String,

    /// Reporter to publish with (or env TSREPORT_REPORTER)
    #[arg(short, long)]
    pub reporter: Option<String>,

    /// Context passed to the reporter (KEY=VALUE, repeatable)
    #[arg(short, long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print config file path
    Path,
    /// Show stored config values
    Show,
    /// Set stored config values
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Default reporter
    #[arg(long)]
    pub reporter: Option<String>,

    /// Reporter option (KEY=VALUE, repeatable)
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Remove stored reporter
    #[arg(long)]
    pub clear_reporter: bool,

    /// Remove a stored option (repeatable)
    #[arg(long, value_name = "KEY")]
    pub unset: Vec<String>,
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn resolve_from_env(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .as_deref()
        .and_then(non_empty)
        .map(str::to_owned)
}

fn resolve_reporter(args_reporter: Option<&str>, config: &Config) -> String {
    args_reporter
        .and_then(non_empty)
        .or_else(|| config.reporter.as_deref().and_then(non_empty))
        .map(str::to_owned)
        .or_else(|| resolve_from_env("TSREPORT_REPORTER"))
        .unwrap_or_else(|| DEFAULT_REPORTER.to_string())
}

fn update_reporter(target: &mut Option<String>, value: Option<&str>, clear: bool) -> Result<bool> {
    if clear && value.is_some() {
        return Err(ReportError::ConflictingFlags(
            "cannot use --reporter and --clear-reporter together".to_string(),
        ));
    }
    if clear {
        *target = None;
        return Ok(true);
    }
    match value {
        None => Ok(false),
        Some(v) => {
            *target = non_empty(v).map(str::to_owned);
            Ok(true)
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(input)?)
}

pub fn handle_reporters() -> Result<()> {
    for reporter in registered_reporters() {
        println!("{reporter}");
    }
    Ok(())
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    handle_config_with_path(action, &config_path())
}

pub fn handle_config_with_path(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config_from(path);
            println!("path: {}", path.display());
            println!(
                "reporter: {}",
                config.reporter.as_deref().unwrap_or("(unset)")
            );
            if config.options.is_empty() {
                println!("options: (none)");
            } else {
                println!("options:");
                for (key, value) in &config.options {
                    println!("  {key}={value}");
                }
            }
            Ok(())
        }
        ConfigAction::Set(args) => {
            let mut config = load_config_from(path);
            if let Some(key) = args.unset.iter().find(|k| {
                args.options
                    .iter()
                    .any(|o| o.split_once('=').map(|(ok, _)| ok.trim()) == Some(k.trim()))
            }) {
                return Err(ReportError::ConflictingFlags(format!(
                    "cannot use --option {key}=... and --unset {key} together"
                )));
            }

            let mut updated = update_reporter(
                &mut config.reporter,
                args.reporter.as_deref(),
                args.clear_reporter,
            )?;
            for (key, value) in parse_options(&args.options)? {
                config.options.insert(key, value);
                updated = true;
            }
            for key in &args.unset {
                config.options.remove(key.trim());
                updated = true;
            }
            if !updated {
                return Err(ReportError::NothingToUpdate);
            }
            save_config_to(path, &config)?;
            Ok(())
        }
    }
}

pub fn handle_report(args: ReportArgs) -> Result<()> {
    handle_report_with_config(args, &load_config())
}

pub fn handle_report_with_config(args: ReportArgs, config: &Config) -> Result<()> {
    let name = resolve_reporter(args.reporter.as_deref(), config);
    let mut reporter = find_reporter(&name)?;
    log::debug!("selected reporter {reporter}");

    let context = parse_options(&args.options)?;
    let text = read_input(&args.input)?;
    let result = FetchResult::from_json(&text)?;
    log::debug!(
        "loaded {} prestations for {} from {}",
        result.prestations.len(),
        result.fetched_month,
        args.input
    );

    reporter.init(&config.options);
    reporter.publish(&result, &context)
}
