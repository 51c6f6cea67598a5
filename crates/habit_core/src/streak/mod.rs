//! Streak computation over completion-date sets.
//!
//! # Responsibility
//! - Compute current/maximum streaks for daily and weekly cadences.
//! - Derive weekly progress and recent completion history for display.
//!
//! # Invariants
//! - Every function here is pure: output depends only on its arguments.
//! - An empty completion set always yields `Streak::default()`.
//! - Current streaks tolerate one unmarked period (today / this week) and
//!   stop at the first gap behind the anchor.

pub mod daily;
pub mod progress;
pub mod weekly;

use crate::calendar::WeekStart;
use crate::model::habit::Cadence;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use daily::daily_streak;
pub use progress::{completion_history, weekly_progress, HistoryDay, WeeklyProgress};
pub use weekly::weekly_streak;

/// Streak pair derived from one completion set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Run length ending at the current period (or the one before it).
    pub current: u32,
    /// Longest run anywhere in history.
    pub maximum: u32,
}

/// Cadence-dispatching streak calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakCalculator {
    week_start: WeekStart,
}

impl StreakCalculator {
    pub fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Computes the streak pair for `cadence`.
    ///
    /// `target_weekly` is ignored for daily habits; for weekly habits a
    /// non-positive target is treated as 1.
    pub fn compute(
        &self,
        cadence: Cadence,
        dates: &BTreeSet<NaiveDate>,
        target_weekly: i64,
        today: NaiveDate,
    ) -> Streak {
        match cadence {
            Cadence::Daily => daily_streak(dates, today),
            Cadence::Weekly => weekly_streak(dates, target_weekly, today, self.week_start),
        }
    }
}

/// Length of the longest run in ascending `keys` where neighbours are
/// exactly `step_days` apart.
pub(crate) fn longest_run<'a, I>(keys: I, step_days: i64) -> u32
where
    I: IntoIterator<Item = &'a NaiveDate>,
{
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for key in keys {
        run = match previous {
            Some(prev) if key.signed_duration_since(prev).num_days() == step_days => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*key);
    }

    longest
}

/// Counts consecutive members of `keys` walking back from `anchor` in
/// `step_days` strides, stopping at the first missing key.
pub(crate) fn run_ending_at(keys: &BTreeSet<NaiveDate>, anchor: NaiveDate, step_days: u64) -> u32 {
    let mut count = 0;
    let mut cursor = Some(anchor);

    while let Some(key) = cursor {
        if !keys.contains(&key) {
            break;
        }
        count += 1;
        cursor = key.checked_sub_days(chrono::Days::new(step_days));
    }

    count
}

#[cfg(test)]
mod tests {
    use super::{longest_run, run_ending_at, StreakCalculator};
    use crate::calendar::{parse_date, WeekStart};
    use crate::model::habit::Cadence;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn dates(values: &[&str]) -> BTreeSet<NaiveDate> {
        values
            .iter()
            .map(|value| parse_date(value).expect("test date should parse"))
            .collect()
    }

    #[test]
    fn longest_run_counts_single_key_as_one() {
        assert_eq!(longest_run(&dates(&["2026-10-01"]), 1), 1);
        assert_eq!(longest_run(&BTreeSet::new(), 1), 0);
    }

    #[test]
    fn run_ending_at_stops_at_first_gap() {
        let keys = dates(&["2026-10-19", "2026-10-18", "2026-10-16"]);
        let anchor = parse_date("2026-10-19").expect("valid date");
        assert_eq!(run_ending_at(&keys, anchor, 1), 2);
    }

    #[test]
    fn compute_dispatches_on_cadence() {
        let calculator = StreakCalculator::new(WeekStart::Monday);
        let today = parse_date("2026-10-19").expect("valid date");
        let set = dates(&["2026-10-19"]);

        let daily = calculator.compute(Cadence::Daily, &set, 3, today);
        assert_eq!((daily.current, daily.maximum), (1, 1));

        let weekly = calculator.compute(Cadence::Weekly, &set, 3, today);
        assert_eq!((weekly.current, weekly.maximum), (0, 0));
    }
}
