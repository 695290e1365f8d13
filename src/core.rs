use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::Deserialize;

use crate::error::{Result, ReportError};

/// Length of a standard working day.
pub const STANDARD_DAY_HOURS: i64 = 8;

const FETCH_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, Deserialize)]
pub struct RawPrestation {
    pub day: NaiveDate,
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFetchResult {
    pub fetched_month: String,
    pub fetch_date: String,
    #[serde(default)]
    pub prestations: Vec<RawPrestation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prestation {
    pub day: NaiveDate,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub fetched_month: String,
    pub fetch_date: NaiveDateTime,
    pub prestations: Vec<Prestation>,
}

/// Running sums of worked time and of deltas against the standard day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub time: Duration,
    pub delta: Duration,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            time: Duration::zero(),
            delta: Duration::zero(),
        }
    }
}

impl Totals {
    pub fn add(&mut self, duration: Duration, delta: Duration) -> Result<()> {
        self.time = self
            .time
            .checked_add(&duration)
            .ok_or(ReportError::TotalOutOfRange)?;
        self.delta = self
            .delta
            .checked_add(&delta)
            .ok_or(ReportError::TotalOutOfRange)?;
        Ok(())
    }
}

/// Parses `<hours>u<minutes>` (e.g. `8u00`, `-1u30`) into a duration.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let invalid = || ReportError::InvalidDuration(value.to_string());
    let trimmed = value.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (hours_str, minutes_str) = body.split_once('u').ok_or_else(invalid)?;

    if hours_str.is_empty() || !hours_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if minutes_str.len() != 2 || !minutes_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i64 = hours_str.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes_str.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    let total = Duration::try_hours(hours)
        .zip(Duration::try_minutes(minutes))
        .and_then(|(h, m)| h.checked_add(&m))
        .ok_or_else(invalid)?;
    Ok(if negative { -total } else { total })
}

pub fn parse_fetch_date(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    FETCH_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ReportError::InvalidFetchDate(value.to_string()))
}

/// Difference against the standard day. A day without any recorded time
/// yields zero instead of a full-day deficit.
pub fn delta_duration(duration: Duration, standard_day: Duration) -> Duration {
    if duration > Duration::zero() {
        duration - standard_day
    } else {
        Duration::zero()
    }
}

pub fn is_sunday(day: NaiveDate) -> bool {
    day.weekday() == Weekday::Sun
}

impl FetchResult {
    pub fn from_raw(raw: RawFetchResult) -> Result<Self> {
        let fetch_date = parse_fetch_date(&raw.fetch_date)?;
        let prestations = raw
            .prestations
            .into_iter()
            .map(|p| {
                let duration = parse_duration(&p.duration)?;
                if duration < Duration::zero() {
                    return Err(ReportError::NegativeDuration(p.day));
                }
                Ok(Prestation {
                    day: p.day,
                    duration,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fetched_month: raw.fetched_month,
            fetch_date,
            prestations,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawFetchResult = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn eight_hours() -> Duration {
        Duration::hours(STANDARD_DAY_HOURS)
    }

    #[test]
    fn parse_duration_standard_day() {
        assert_eq!(parse_duration("8u00").unwrap(), eight_hours());
    }

    #[test]
    fn parse_duration_rejects_out_of_range_hours() {
        assert!(matches!(
            parse_duration("9999999999999u00"),
            Err(ReportError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_duration("99999999999999999999u00"),
            Err(ReportError::InvalidDuration(_))
        ));
    }

    #[test]
    fn parse_duration_hours_and_minutes() {
        assert_eq!(
            parse_duration("7u45").unwrap(),
            Duration::hours(7) + Duration::minutes(45)
        );
    }

    #[test]
    fn parse_duration_zero() {
        assert_eq!(parse_duration("0u00").unwrap(), Duration::zero());
    }

    #[test]
    fn parse_duration_negative() {
        assert_eq!(parse_duration("-1u30").unwrap(), -Duration::minutes(90));
    }

    #[test]
    fn parse_duration_many_hours() {
        assert_eq!(parse_duration("17u00").unwrap(), Duration::hours(17));
    }

    #[test]
    fn parse_duration_rejects_missing_separator() {
        assert!(parse_duration("800").is_err());
    }

    #[test]
    fn parse_duration_rejects_single_digit_minutes() {
        assert!(parse_duration("8u0").is_err());
    }

    #[test]
    fn parse_duration_rejects_minutes_overflow() {
        assert!(parse_duration("8u60").is_err());
    }

    #[test]
    fn parse_duration_rejects_empty_hours() {
        assert!(parse_duration("u30").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn parse_fetch_date_without_seconds() {
        assert_eq!(
            parse_fetch_date("2024-03-31T10:00").unwrap(),
            date(2024, 3, 31).and_hms_opt(10, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_fetch_date_with_seconds() {
        assert_eq!(
            parse_fetch_date("2024-03-31T10:00:15").unwrap(),
            date(2024, 3, 31).and_hms_opt(10, 0, 15).unwrap()
        );
    }

    #[test]
    fn parse_fetch_date_invalid() {
        assert!(parse_fetch_date("31/03/2024").is_err());
    }

    #[test]
    fn delta_zero_duration_is_zero() {
        assert_eq!(
            delta_duration(Duration::zero(), eight_hours()),
            Duration::zero()
        );
    }

    #[test]
    fn delta_overtime_is_positive() {
        let worked = parse_duration("9u15").unwrap();
        assert_eq!(
            delta_duration(worked, eight_hours()),
            Duration::minutes(75)
        );
    }

    #[test]
    fn delta_undertime_is_negative() {
        let worked = parse_duration("6u30").unwrap();
        assert_eq!(
            delta_duration(worked, eight_hours()),
            -Duration::minutes(90)
        );
    }

    #[test]
    fn delta_short_day_is_nearly_full_deficit() {
        assert_eq!(
            delta_duration(Duration::minutes(1), eight_hours()),
            Duration::minutes(1) - Duration::hours(8)
        );
    }

    #[test]
    fn is_sunday_detects_sunday() {
        // Mar 10 2024 is Sunday
        assert!(is_sunday(date(2024, 3, 10)));
        assert!(!is_sunday(date(2024, 3, 9)));
        assert!(!is_sunday(date(2024, 3, 11)));
    }

    #[test]
    fn totals_accumulate() {
        let mut totals = Totals::default();
        totals.add(Duration::hours(8), Duration::zero()).unwrap();
        totals.add(Duration::hours(9), Duration::hours(1)).unwrap();
        totals
            .add(Duration::minutes(390), -Duration::minutes(90))
            .unwrap();
        assert_eq!(totals.time, Duration::minutes(23 * 60 + 30));
        assert_eq!(totals.delta, -Duration::minutes(30));
    }

    #[test]
    fn totals_overflow_is_an_error() {
        let huge = parse_duration("2000000000000u00").unwrap();
        let mut totals = Totals::default();
        totals.add(huge, huge - eight_hours()).unwrap();
        assert!(matches!(
            totals.add(huge, huge - eight_hours()),
            Err(ReportError::TotalOutOfRange)
        ));
    }

    #[test]
    fn from_json_valid() {
        let json = r#"{
            "fetched_month": "March 2024",
            "fetch_date": "2024-03-31T10:00",
            "prestations": [
                {"day": "2024-03-04", "duration": "8u00"},
                {"day": "2024-03-10", "duration": "0u00"}
            ]
        }"#;
        let result = FetchResult::from_json(json).unwrap();
        assert_eq!(result.fetched_month, "March 2024");
        assert_eq!(
            result.prestations,
            vec![
                Prestation {
                    day: date(2024, 3, 4),
                    duration: Duration::hours(8),
                },
                Prestation {
                    day: date(2024, 3, 10),
                    duration: Duration::zero(),
                },
            ]
        );
    }

    #[test]
    fn from_json_keeps_supplied_order() {
        let json = r#"{
            "fetched_month": "March 2024",
            "fetch_date": "2024-03-31T10:00",
            "prestations": [
                {"day": "2024-03-11", "duration": "8u00"},
                {"day": "2024-03-04", "duration": "8u00"}
            ]
        }"#;
        let result = FetchResult::from_json(json).unwrap();
        assert_eq!(result.prestations[0].day, date(2024, 3, 11));
        assert_eq!(result.prestations[1].day, date(2024, 3, 4));
    }

    #[test]
    fn from_json_missing_prestations_is_empty() {
        let json = r#"{"fetched_month": "May 2024", "fetch_date": "2024-05-31T18:00"}"#;
        let result = FetchResult::from_json(json).unwrap();
        assert!(result.prestations.is_empty());
    }

    #[test]
    fn from_json_rejects_negative_duration() {
        let json = r#"{
            "fetched_month": "March 2024",
            "fetch_date": "2024-03-31T10:00",
            "prestations": [{"day": "2024-03-04", "duration": "-1u00"}]
        }"#;
        let err = FetchResult::from_json(json).unwrap_err();
        assert!(matches!(err, ReportError::NegativeDuration(d) if d == date(2024, 3, 4)));
    }

    #[test]
    fn from_json_rejects_bad_duration() {
        let json = r#"{
            "fetched_month": "March 2024",
            "fetch_date": "2024-03-31T10:00",
            "prestations": [{"day": "2024-03-04", "duration": "8h"}]
        }"#;
        assert!(matches!(
            FetchResult::from_json(json),
            Err(ReportError::InvalidDuration(_))
        ));
    }

    #[test]
    fn from_json_rejects_invalid_json() {
        assert!(matches!(
            FetchResult::from_json("not json"),
            Err(ReportError::Parse(_))
        ));
    }
}
