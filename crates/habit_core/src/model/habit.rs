//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its wire shape.
//! - Own completion-set mutation and the single streak recompute path.
//!
//! # Invariants
//! - `streak_current` / `streak_maximum` are caches derived from
//!   `dates_completed`, `cadence` and `target_weekly`; they are private and
//!   only written by `recompute_streaks`.
//! - `target_weekly` is always within `MIN_WEEKLY_TARGET..=MAX_WEEKLY_TARGET`.
//! - `name` is never blank for habits created or renamed through the API.

use crate::config::DEFAULT_WEEKLY_TARGET;
use crate::streak::{Streak, StreakCalculator};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub const MIN_WEEKLY_TARGET: u8 = 1;
pub const MAX_WEEKLY_TARGET: u8 = 7;

/// Opaque, stable habit identifier.
///
/// Generated ids are UUIDv7 strings (millisecond timestamp prefix). Any
/// string is accepted on load to keep older epoch-millisecond ids valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generates a fresh time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HabitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How often a habit is expected to be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// One completion per calendar day.
    Daily,
    /// `target_weekly` completions per week window.
    Weekly,
}

impl Cadence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl FromStr for Cadence {
    type Err = HabitValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(HabitValidationError::UnknownCadence(other.to_string())),
        }
    }
}

/// Validation failures for habit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyName,
    InvalidWeeklyTarget(i64),
    UnknownCadence(String),
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name cannot be empty"),
            Self::InvalidWeeklyTarget(value) => write!(
                f,
                "weekly target must be within {MIN_WEEKLY_TARGET}..={MAX_WEEKLY_TARGET}, got {value}"
            ),
            Self::UnknownCadence(value) => {
                write!(f, "unknown cadence `{value}`; expected daily|weekly")
            }
        }
    }
}

impl Error for HabitValidationError {}

/// Validates a weekly target supplied at a mutation boundary.
pub fn validate_weekly_target(value: i64) -> Result<u8, HabitValidationError> {
    if (i64::from(MIN_WEEKLY_TARGET)..=i64::from(MAX_WEEKLY_TARGET)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(HabitValidationError::InvalidWeeklyTarget(value))
    }
}

/// Trims a display name and rejects blank input.
pub fn normalize_name(value: &str) -> Result<String, HabitValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HabitValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Canonical habit record.
///
/// Field names on the wire follow the persisted blob schema
/// (`habitId`, `habitName`, `trackingType`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    #[serde(rename = "habitId")]
    id: HabitId,
    #[serde(rename = "habitName")]
    name: String,
    #[serde(rename = "trackingType")]
    cadence: Cadence,
    /// Serialized as a sorted array of `YYYY-MM-DD` strings.
    #[serde(rename = "datesCompleted", default)]
    dates_completed: BTreeSet<NaiveDate>,
    #[serde(
        rename = "streakCurrent",
        default,
        deserialize_with = "deserialize_streak_cache"
    )]
    streak_current: u32,
    #[serde(
        rename = "streakMaximum",
        default,
        deserialize_with = "deserialize_streak_cache"
    )]
    streak_maximum: u32,
    #[serde(
        rename = "targetWeekly",
        default = "default_weekly_target",
        deserialize_with = "deserialize_clamped_target"
    )]
    target_weekly: u8,
}

impl Habit {
    /// Creates a habit with a generated id, no completions and zero streaks.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank after trimming.
    /// - `InvalidWeeklyTarget` when `target_weekly` is outside `1..=7`.
    pub fn new(
        name: &str,
        cadence: Cadence,
        target_weekly: i64,
    ) -> Result<Self, HabitValidationError> {
        Self::with_id(HabitId::generate(), name, cadence, target_weekly)
    }

    /// Creates a habit with a caller-provided id.
    pub fn with_id(
        id: HabitId,
        name: &str,
        cadence: Cadence,
        target_weekly: i64,
    ) -> Result<Self, HabitValidationError> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            cadence,
            dates_completed: BTreeSet::new(),
            streak_current: 0,
            streak_maximum: 0,
            target_weekly: validate_weekly_target(target_weekly)?,
        })
    }

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn target_weekly(&self) -> u8 {
        self.target_weekly
    }

    /// Completion dates in ascending order.
    pub fn dates_completed(&self) -> &BTreeSet<NaiveDate> {
        &self.dates_completed
    }

    pub fn streak_current(&self) -> u32 {
        self.streak_current
    }

    pub fn streak_maximum(&self) -> u32 {
        self.streak_maximum
    }

    /// Cached streak pair.
    pub fn streak(&self) -> Streak {
        Streak {
            current: self.streak_current,
            maximum: self.streak_maximum,
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.dates_completed.contains(&date)
    }

    /// Flips completion for `date`; returns the new completion state.
    pub(crate) fn toggle_date(&mut self, date: NaiveDate) -> bool {
        if self.dates_completed.remove(&date) {
            false
        } else {
            self.dates_completed.insert(date);
            true
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_cadence(&mut self, cadence: Cadence) {
        self.cadence = cadence;
    }

    pub(crate) fn set_target_weekly(&mut self, target: u8) {
        self.target_weekly = target;
    }

    /// Rewrites the cached streak fields from the completion set.
    ///
    /// This is the only writer of `streak_current` / `streak_maximum`.
    pub(crate) fn recompute_streaks(&mut self, calculator: &StreakCalculator, today: NaiveDate) {
        let streak = calculator.compute(
            self.cadence,
            &self.dates_completed,
            i64::from(self.target_weekly),
            today,
        );
        self.streak_current = streak.current;
        self.streak_maximum = streak.maximum;
    }
}

fn default_weekly_target() -> u8 {
    DEFAULT_WEEKLY_TARGET
}

/// Accepts any JSON number (rounded, then clamped to `1..=7`); non-numbers
/// fall back to the default target.
fn deserialize_clamped_target<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let Some(value) = raw.as_f64().filter(|value| value.is_finite()) else {
        return Ok(DEFAULT_WEEKLY_TARGET);
    };
    let clamped = value
        .round()
        .clamp(f64::from(MIN_WEEKLY_TARGET), f64::from(MAX_WEEKLY_TARGET));
    Ok(clamped as u8)
}

// Streak caches are rewritten on open, so a bad cached value reads as 0.
fn deserialize_streak_cache<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw
        .as_u64()
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::{Cadence, Habit, HabitValidationError};
    use crate::calendar::{parse_date, WeekStart};
    use crate::streak::StreakCalculator;

    #[test]
    fn toggle_date_flips_membership() {
        let mut habit = Habit::new("Read", Cadence::Daily, 3).expect("valid habit");
        let day = parse_date("2026-10-19").expect("valid date");

        assert!(habit.toggle_date(day));
        assert!(habit.is_completed_on(day));
        assert!(!habit.toggle_date(day));
        assert!(habit.dates_completed().is_empty());
    }

    #[test]
    fn recompute_streaks_writes_cache_fields() {
        let mut habit = Habit::new("Walk", Cadence::Daily, 3).expect("valid habit");
        let today = parse_date("2026-10-19").expect("valid date");
        habit.toggle_date(today);
        habit.toggle_date(parse_date("2026-10-18").expect("valid date"));

        habit.recompute_streaks(&StreakCalculator::new(WeekStart::Monday), today);
        assert_eq!(habit.streak_current(), 2);
        assert_eq!(habit.streak_maximum(), 2);
    }

    #[test]
    fn cadence_parses_case_insensitively() {
        assert_eq!(" Weekly ".parse::<Cadence>(), Ok(Cadence::Weekly));
        assert_eq!(
            "monthly".parse::<Cadence>(),
            Err(HabitValidationError::UnknownCadence("monthly".to_string()))
        );
    }
}
