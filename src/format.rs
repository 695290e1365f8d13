use chrono::{Duration, Locale, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::core::{delta_duration, is_sunday, FetchResult, Totals};
use crate::error::Result;

pub const SEPARATOR: &str = "------------------------------------------------------";

/// Abbreviated weekday, two-digit day, full month name.
pub const DAY_PATTERN: &str = "%a %d %B";

pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    let sign = if total_minutes < 0 { "-" } else { "" };
    let minutes = total_minutes.abs();
    format!("{sign}{}u{:02}", minutes / 60, minutes % 60)
}

pub fn format_day(day: NaiveDate, locale: Locale) -> String {
    let midnight = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    midnight.format_localized(DAY_PATTERN, locale).to_string()
}

pub fn format_fetch_date(fetch_date: NaiveDateTime) -> String {
    fetch_date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn build_lines(
    result: &FetchResult,
    standard_day: Duration,
    locale: Locale,
) -> Result<Vec<String>> {
    let mut lines = vec![
        SEPARATOR.to_string(),
        format!("Report for {}", result.fetched_month),
        SEPARATOR.to_string(),
    ];

    let mut totals = Totals::default();
    for prestation in &result.prestations {
        let delta = delta_duration(prestation.duration, standard_day);
        totals.add(prestation.duration, delta)?;
        lines.push(format!(
            "{}: {}\t\t{}",
            format_day(prestation.day, locale),
            format_duration(prestation.duration),
            format_duration(delta),
        ));
        if is_sunday(prestation.day) {
            lines.push(String::new());
        }
    }

    lines.push(SEPARATOR.to_string());
    lines.push(format!("Total time : {}", format_duration(totals.time)));
    lines.push(format!("Total delta: {}", format_duration(totals.delta)));

    lines.push(SEPARATOR.to_string());
    lines.push(format!("Fetched at {}", format_fetch_date(result.fetch_date)));
    lines.push(SEPARATOR.to_string());
    Ok(lines)
}
