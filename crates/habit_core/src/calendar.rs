//! Calendar helpers shared by streak and progress computation.
//!
//! # Responsibility
//! - Map calendar dates onto their week bucket for a chosen first weekday.
//! - Provide the `Clock` capability that supplies "today" to the store.
//! - Parse and format the ISO `YYYY-MM-DD` date keys used on the wire.
//!
//! # Invariants
//! - All arithmetic is on `NaiveDate`; no timezone math happens here.
//! - A week bucket key is always the first day of its 7-day window.

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// ISO date format used for completion-date keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// First day of a 7-day week window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// Number of days `date` lies after the start of its week.
    fn offset_of(self, date: NaiveDate) -> u64 {
        let weekday = date.weekday();
        let offset = match self {
            Self::Monday => weekday.num_days_from_monday(),
            Self::Sunday => weekday.num_days_from_sunday(),
        };
        u64::from(offset)
    }
}

/// Returns the week bucket key (first day of the week) containing `date`.
pub fn week_start_of(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    days_before(date, week_start.offset_of(date))
}

/// Returns `date` shifted back by `days`, saturating at the calendar minimum.
pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Parses one `YYYY-MM-DD` date key.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Formats one date as its `YYYY-MM-DD` key.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock source using the host's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{days_before, format_date, parse_date, week_start_of, WeekStart};
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        parse_date(value).expect("test date should parse")
    }

    #[test]
    fn monday_weeks_bucket_sunday_into_previous_monday() {
        // 2026-10-18 is a Sunday.
        assert_eq!(
            week_start_of(date("2026-10-18"), WeekStart::Monday),
            date("2026-10-12")
        );
        assert_eq!(
            week_start_of(date("2026-10-19"), WeekStart::Monday),
            date("2026-10-19")
        );
    }

    #[test]
    fn sunday_weeks_start_on_sunday() {
        assert_eq!(
            week_start_of(date("2026-10-18"), WeekStart::Sunday),
            date("2026-10-18")
        );
        assert_eq!(
            week_start_of(date("2026-10-24"), WeekStart::Sunday),
            date("2026-10-18")
        );
    }

    #[test]
    fn parse_and_format_use_iso_keys() {
        let parsed = parse_date(" 2026-02-28 ").expect("trimmed input should parse");
        assert_eq!(format_date(parsed), "2026-02-28");
        assert!(parse_date("2026-02-30").is_none());
        assert!(parse_date("28/02/2026").is_none());
    }

    #[test]
    fn days_before_saturates_at_minimum() {
        assert_eq!(days_before(NaiveDate::MIN, 3), NaiveDate::MIN);
        assert_eq!(days_before(date("2026-03-01"), 1), date("2026-02-28"));
    }
}
