//! Weekly progress and recent completion history projections.

use crate::calendar::{days_before, week_start_of, WeekStart};
use crate::config::MAX_HISTORY_DAYS;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Completions inside the current week against the weekly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    /// First day of the week window the counts refer to.
    #[serde(rename = "weekStart")]
    pub week_start: NaiveDate,
    pub completed: u32,
    pub target: u8,
}

impl WeeklyProgress {
    /// Fill ratio in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        let target = f64::from(self.target.max(1));
        (f64::from(self.completed) / target).min(1.0)
    }

    pub fn is_satisfied(&self) -> bool {
        self.completed >= u32::from(self.target.max(1))
    }
}

/// One day of the recent-history strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDay {
    pub date: NaiveDate,
    pub is_completed: bool,
    /// Day of month, `1..=31`.
    pub day_number: u32,
    pub is_today: bool,
}

/// Counts completions inside the week window containing `today`.
pub fn weekly_progress(
    dates: &BTreeSet<NaiveDate>,
    target: u8,
    today: NaiveDate,
    week_start: WeekStart,
) -> WeeklyProgress {
    let first = week_start_of(today, week_start);
    let completed = match first.checked_add_days(Days::new(6)) {
        Some(last) => dates.range(first..=last).count(),
        None => dates.range(first..).count(),
    };

    WeeklyProgress {
        week_start: first,
        completed: u32::try_from(completed).unwrap_or(u32::MAX),
        target,
    }
}

/// Returns the last `days` days ending at `today`, oldest first.
///
/// The window is capped at `MAX_HISTORY_DAYS`.
pub fn completion_history(
    dates: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    days: u32,
) -> Vec<HistoryDay> {
    (0..u64::from(days.min(MAX_HISTORY_DAYS)))
        .rev()
        .map(|offset| days_before(today, offset))
        .map(|date| HistoryDay {
            date,
            is_completed: dates.contains(&date),
            day_number: date.day(),
            is_today: date == today,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{completion_history, weekly_progress, WeeklyProgress};
    use crate::calendar::{parse_date, WeekStart};
    use crate::config::MAX_HISTORY_DAYS;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn date(value: &str) -> NaiveDate {
        parse_date(value).expect("test date should parse")
    }

    #[test]
    fn progress_counts_only_current_week() {
        let dates: BTreeSet<_> = ["2026-10-18", "2026-10-19", "2026-10-25", "2026-10-26"]
            .into_iter()
            .map(date)
            .collect();
        let progress = weekly_progress(&dates, 3, date("2026-10-21"), WeekStart::Monday);
        assert_eq!(progress.week_start, date("2026-10-19"));
        assert_eq!(progress.completed, 2);
        assert!(!progress.is_satisfied());
    }

    #[test]
    fn ratio_is_capped_at_one() {
        let progress = WeeklyProgress {
            week_start: date("2026-10-19"),
            completed: 5,
            target: 2,
        };
        assert!((progress.ratio() - 1.0).abs() < f64::EPSILON);
        assert!(progress.is_satisfied());
    }

    #[test]
    fn history_is_oldest_first_and_marks_today() {
        let dates: BTreeSet<_> = [date("2026-10-18")].into_iter().collect();
        let history = completion_history(&dates, date("2026-10-19"), 3);

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].date, date("2026-10-17"));
        assert!(history[1].is_completed);
        assert_eq!(history[1].day_number, 18);
        assert!(history[2].is_today);
        assert!(!history[0].is_today);
    }

    #[test]
    fn oversized_history_window_is_capped() {
        let history = completion_history(&BTreeSet::new(), date("2026-10-19"), u32::MAX);
        assert_eq!(history.len(), MAX_HISTORY_DAYS as usize);
        assert_eq!(history[0].date, date("2025-10-19"));
        assert!(history[history.len() - 1].is_today);
    }

    #[test]
    fn zero_day_history_is_empty() {
        assert!(completion_history(&BTreeSet::new(), date("2026-10-19"), 0).is_empty());
    }
}
