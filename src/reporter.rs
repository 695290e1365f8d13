use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use chrono::{Duration, Locale};

use crate::core::{FetchResult, STANDARD_DAY_HOURS};
use crate::error::{Result, ReportError};
use crate::format::build_lines;

/// Option name to value, used both for reporter configuration and for the
/// per-publish context.
pub type Options = BTreeMap<String, String>;

pub const DEFAULT_REPORTER: &str = CommandLineReporter::NAME;

/// A sink that turns a fetched month into a report.
pub trait Reporter: fmt::Display {
    /// Identifier used to select this reporter.
    fn name(&self) -> &'static str;

    fn init(&mut self, config: &Options);

    fn publish(&self, result: &FetchResult, context: &Options) -> Result<()>;
}

/// Prints the report as plain text on stdout.
pub struct CommandLineReporter {
    locale: Locale,
    standard_day: Duration,
}

impl CommandLineReporter {
    pub const NAME: &'static str = "commandLine";

    pub fn new() -> Self {
        Self {
            locale: Locale::nl_BE,
            standard_day: Duration::hours(STANDARD_DAY_HOURS),
        }
    }

    pub fn render(&self, result: &FetchResult) -> Result<Vec<String>> {
        build_lines(result, self.standard_day, self.locale)
    }
}

impl Default for CommandLineReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommandLineReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Reporter for CommandLineReporter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&mut self, _config: &Options) {}

    fn publish(&self, result: &FetchResult, _context: &Options) -> Result<()> {
        log::debug!(
            "publishing {} prestations for {}",
            result.prestations.len(),
            result.fetched_month
        );
        let lines = self.render(result)?;
        let mut out = std::io::stdout().lock();
        for line in lines {
            writeln!(out, "{line}").map_err(|e| ReportError::Publish(e.to_string()))?;
        }
        out.flush().map_err(|e| ReportError::Publish(e.to_string()))
    }
}

pub fn registered_reporters() -> Vec<Box<dyn Reporter>> {
    vec![Box::new(CommandLineReporter::new()) as Box<dyn Reporter>]
}

pub fn find_reporter(name: &str) -> Result<Box<dyn Reporter>> {
    registered_reporters()
        .into_iter()
        .find(|r| r.name() == name)
        .ok_or_else(|| ReportError::UnknownReporter(name.to_string()))
}
