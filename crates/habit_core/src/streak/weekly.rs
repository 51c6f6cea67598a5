//! Weekly cadence streaks.
//!
//! A week counts toward a streak when the number of completions inside its
//! window reaches the habit's weekly target.

use super::{longest_run, run_ending_at, Streak};
use crate::calendar::{days_before, week_start_of, WeekStart};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Completion counts keyed by week bucket.
pub fn week_buckets(
    dates: &BTreeSet<NaiveDate>,
    week_start: WeekStart,
) -> BTreeMap<NaiveDate, u32> {
    let mut buckets = BTreeMap::new();
    for date in dates {
        *buckets.entry(week_start_of(*date, week_start)).or_insert(0) += 1;
    }
    buckets
}

/// Week buckets whose completion count reaches `target`.
pub fn satisfied_weeks(
    dates: &BTreeSet<NaiveDate>,
    target: i64,
    week_start: WeekStart,
) -> BTreeSet<NaiveDate> {
    let target = target.max(1);
    week_buckets(dates, week_start)
        .into_iter()
        .filter(|(_, count)| i64::from(*count) >= target)
        .map(|(week, _)| week)
        .collect()
}

/// Computes the weekly streak pair for `dates` as seen on `today`.
///
/// The current run is anchored on this week when satisfied, else on the
/// previous week when satisfied, else it is zero.
pub fn weekly_streak(
    dates: &BTreeSet<NaiveDate>,
    target: i64,
    today: NaiveDate,
    week_start: WeekStart,
) -> Streak {
    let weeks = satisfied_weeks(dates, target, week_start);
    if weeks.is_empty() {
        return Streak::default();
    }

    let this_week = week_start_of(today, week_start);
    let last_week = days_before(this_week, 7);
    let current = [this_week, last_week]
        .into_iter()
        .find(|week| weeks.contains(week))
        .map_or(0, |anchor| run_ending_at(&weeks, anchor, 7));

    Streak {
        current,
        maximum: longest_run(&weeks, 7),
    }
}
