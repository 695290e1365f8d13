use std::io;

use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report failure: {0}")]
    Publish(String),

    #[error("unknown reporter `{0}` (run `tsreport reporters` to list them)")]
    UnknownReporter(String),

    #[error("duration must be in <hours>u<minutes> format (e.g. 8u00), got `{0}`")]
    InvalidDuration(String),

    #[error("duration for {0} must not be negative")]
    NegativeDuration(NaiveDate),

    #[error("total duration is out of range")]
    TotalOutOfRange,

    #[error("fetch date must be YYYY-MM-DDTHH:MM[:SS], got `{0}`")]
    InvalidFetchDate(String),

    #[error("option must be in KEY=VALUE format, got `{0}`")]
    InvalidOption(String),

    #[error("{0}")]
    ConflictingFlags(String),

    #[error("nothing to update: provide --reporter/--option/--clear-reporter/--unset")]
    NothingToUpdate,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
