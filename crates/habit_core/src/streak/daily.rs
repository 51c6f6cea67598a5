//! Daily cadence streaks.

use super::{longest_run, run_ending_at, Streak};
use crate::calendar::days_before;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Computes the daily streak pair for `dates` as seen on `today`.
///
/// The current run is anchored on today when completed, else on yesterday
/// when completed, else it is zero.
pub fn daily_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Streak {
    if dates.is_empty() {
        return Streak::default();
    }

    let yesterday = days_before(today, 1);
    let current = [today, yesterday]
        .into_iter()
        .find(|day| dates.contains(day))
        .map_or(0, |anchor| run_ending_at(dates, anchor, 1));

    Streak {
        current,
        maximum: longest_run(dates, 1),
    }
}
