//! Habit store use-cases.
//!
//! # Responsibility
//! - Own the in-memory habit collection and expose its use-case APIs.
//! - Refresh derived streak fields and persist after every mutation.
//!
//! # Invariants
//! - Mutations go through `apply`, the single recompute + persist path, so
//!   no caller can observe streak caches out of sync with completions.
//! - Persistence is best-effort: a failed save is logged and the in-memory
//!   collection stays authoritative.
//! - Unknown ids make mutators no-ops and queries return absence.

use crate::calendar::{Clock, SystemClock};
use crate::config::{ConfigError, StoreConfig, MAX_HISTORY_DAYS};
use crate::model::habit::{
    normalize_name, validate_weekly_target, Cadence, Habit, HabitId, HabitValidationError,
};
use crate::repo::habit_repo::HabitRepository;
use crate::streak::{
    completion_history, weekly_progress, HistoryDay, StreakCalculator, WeeklyProgress,
};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Input failed habit validation; prior state is unchanged.
    Validation(HabitValidationError),
    /// Store configuration is unusable.
    Config(ConfigError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "invalid store config: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<HabitValidationError> for StoreError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Ordering applied by `list_with`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HabitOrder {
    /// Creation order.
    #[default]
    Created,
    /// Habits not completed today first, creation order within each group.
    PendingFirst,
}

/// Filter and ordering options for listing habits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitListQuery {
    pub cadence: Option<Cadence>,
    pub order: HabitOrder,
}

/// Process-wide owner of the habit collection.
pub struct HabitStore<R: HabitRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    calculator: StreakCalculator,
    config: StoreConfig,
    habits: Vec<Habit>,
}

impl<R: HabitRepository, C: Clock> HabitStore<R, C> {
    /// Opens a store, loading the persisted collection.
    ///
    /// Streak caches are recomputed against today's date on open, since
    /// current streaks may have lapsed since the last write.
    ///
    /// # Errors
    /// - `StoreError::Config` when `config` fails validation, or when the
    ///   repository persists under a key other than `config.storage_key`.
    pub fn open(repo: R, clock: C, config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        if let Some(key) = repo.storage_key() {
            if key != config.storage_key {
                warn!("event=store_open module=store status=rejected reason=storage_key_mismatch");
                return Err(ConfigError::StorageKeyMismatch {
                    configured: config.storage_key.clone(),
                    repository: key.to_string(),
                }
                .into());
            }
        }

        let habits = repo.load();
        let mut store = Self {
            calculator: StreakCalculator::new(config.week_start),
            repo,
            clock,
            config,
            habits,
        };
        store.refresh();
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Creates a habit with empty history and returns its id.
    ///
    /// `target_weekly` defaults to the configured default when `None`.
    ///
    /// # Errors
    /// - `EmptyName` for a blank name; nothing is created.
    /// - `InvalidWeeklyTarget` for a target outside `1..=7`.
    pub fn create(
        &mut self,
        name: &str,
        cadence: Cadence,
        target_weekly: Option<i64>,
    ) -> Result<HabitId, StoreError> {
        let target =
            target_weekly.unwrap_or_else(|| i64::from(self.config.default_weekly_target));
        let habit = Habit::new(name, cadence, target).map_err(|err| {
            warn!("event=habit_create module=store status=rejected reason={err}");
            err
        })?;

        let id = habit.id().clone();
        self.habits.push(habit);
        info!(
            "event=habit_create module=store status=ok habit_id={id} cadence={}",
            cadence.as_str()
        );
        self.persist("create");
        Ok(id)
    }

    /// Permanently removes a habit. Returns `false` for unknown ids.
    pub fn delete(&mut self, id: &HabitId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=habit_delete module=store status=noop habit_id={id}");
            return false;
        };

        self.habits.remove(index);
        info!("event=habit_delete module=store status=ok habit_id={id}");
        self.persist("delete");
        true
    }

    /// Flips completion for `date` (today when `None`).
    ///
    /// Returns the new completion state, or `None` for unknown ids.
    pub fn toggle(&mut self, id: &HabitId, date: Option<NaiveDate>) -> Option<bool> {
        let date = date.unwrap_or_else(|| self.clock.today());
        let completed = self.apply(id, "toggle", |habit| habit.toggle_date(date))?;
        debug!("event=habit_toggle module=store status=ok habit_id={id} date={date} completed={completed}");
        Some(completed)
    }

    /// Renames a habit. Returns `Ok(false)` for unknown ids.
    ///
    /// # Errors
    /// - `EmptyName` for a blank name; the old name is kept.
    pub fn rename(&mut self, id: &HabitId, name: &str) -> Result<bool, StoreError> {
        let name = normalize_name(name)?;
        Ok(self
            .apply(id, "rename", move |habit| habit.set_name(name))
            .is_some())
    }

    /// Switches cadence and recomputes streaks under the new rules.
    pub fn set_cadence(&mut self, id: &HabitId, cadence: Cadence) -> bool {
        self.apply(id, "set_cadence", |habit| habit.set_cadence(cadence))
            .is_some()
    }

    /// Changes the weekly target. Returns `Ok(false)` for unknown ids.
    ///
    /// # Errors
    /// - `InvalidWeeklyTarget` for a target outside `1..=7`; the old target
    ///   and streaks are kept.
    pub fn set_weekly_target(&mut self, id: &HabitId, target: i64) -> Result<bool, StoreError> {
        let target = validate_weekly_target(target).map_err(|err| {
            warn!("event=habit_set_target module=store status=rejected habit_id={id} reason={err}");
            err
        })?;
        Ok(self
            .apply(id, "set_weekly_target", |habit| {
                habit.set_target_weekly(target)
            })
            .is_some())
    }

    /// Returns one habit by id.
    pub fn query(&self, id: &HabitId) -> Option<Habit> {
        self.find(id).cloned()
    }

    /// Returns all habits in creation order.
    pub fn list(&self) -> Vec<Habit> {
        self.habits.clone()
    }

    /// Returns habits filtered and ordered by `query`.
    pub fn list_with(&self, query: &HabitListQuery) -> Vec<Habit> {
        let mut habits = self
            .habits
            .iter()
            .filter(|habit| query.cadence.is_none_or(|cadence| habit.cadence() == cadence))
            .cloned()
            .collect::<Vec<_>>();

        if query.order == HabitOrder::PendingFirst {
            let today = self.clock.today();
            // Stable sort keeps creation order inside each group.
            habits.sort_by_key(|habit| habit.is_completed_on(today));
        }

        habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Whether `id` has a completion on `date`; `false` for unknown ids.
    pub fn is_completed_on(&self, id: &HabitId, date: NaiveDate) -> bool {
        self.find(id)
            .is_some_and(|habit| habit.is_completed_on(date))
    }

    pub fn is_done_today(&self, id: &HabitId) -> bool {
        self.is_completed_on(id, self.clock.today())
    }

    /// Recent completion strip ending today, oldest first.
    ///
    /// Uses the configured window when `days` is `None` and caps any window
    /// at `MAX_HISTORY_DAYS`; empty for unknown ids.
    pub fn history(&self, id: &HabitId, days: Option<u32>) -> Vec<HistoryDay> {
        let days = days
            .unwrap_or(self.config.history_days)
            .min(MAX_HISTORY_DAYS);
        self.find(id).map_or_else(Vec::new, |habit| {
            completion_history(habit.dates_completed(), self.clock.today(), days)
        })
    }

    /// Current-week progress for weekly habits; `None` otherwise.
    pub fn weekly_progress(&self, id: &HabitId) -> Option<WeeklyProgress> {
        let habit = self.find(id)?;
        if habit.cadence() != Cadence::Weekly {
            return None;
        }
        Some(weekly_progress(
            habit.dates_completed(),
            habit.target_weekly(),
            self.clock.today(),
            self.calculator.week_start(),
        ))
    }

    /// Recomputes every habit against today's date.
    ///
    /// Persists only when some cached streak changed. Returns the number of
    /// habits whose streaks changed.
    pub fn refresh(&mut self) -> usize {
        let today = self.clock.today();
        let mut changed = 0;
        for habit in &mut self.habits {
            let before = habit.streak();
            habit.recompute_streaks(&self.calculator, today);
            if habit.streak() != before {
                changed += 1;
            }
        }

        debug!(
            "event=habits_refresh module=store status=ok count={} changed={changed}",
            self.habits.len()
        );
        if changed > 0 {
            self.persist("refresh");
        }
        changed
    }

    /// Applies `mutate` to one habit, refreshes its streaks and persists.
    fn apply<T, F>(&mut self, id: &HabitId, op: &'static str, mutate: F) -> Option<T>
    where
        F: FnOnce(&mut Habit) -> T,
    {
        let today = self.clock.today();
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id() == id) else {
            debug!("event=habit_{op} module=store status=noop habit_id={id}");
            return None;
        };

        let output = mutate(habit);
        habit.recompute_streaks(&self.calculator, today);
        self.persist(op);
        Some(output)
    }

    fn persist(&self, op: &'static str) {
        match self.repo.save(&self.habits) {
            Ok(()) => debug!(
                "event=habits_persist module=store status=ok op={op} count={}",
                self.habits.len()
            ),
            Err(err) => error!(
                "event=habits_persist module=store status=error op={op} count={} error={err}",
                self.habits.len()
            ),
        }
    }

    fn find(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id() == id)
    }

    fn position(&self, id: &HabitId) -> Option<usize> {
        self.habits.iter().position(|habit| habit.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{HabitStore, StoreError};
    use crate::calendar::{parse_date, FixedClock};
    use crate::config::StoreConfig;
    use crate::model::habit::{Cadence, HabitValidationError};
    use crate::repo::habit_repo::BlobHabitRepository;
    use crate::repo::kv_store::MemoryKeyValueStore;

    fn open_store() -> HabitStore<BlobHabitRepository<MemoryKeyValueStore>, FixedClock> {
        let repo = BlobHabitRepository::new(MemoryKeyValueStore::new(), "habitsData");
        let clock = FixedClock(parse_date("2026-10-19").expect("valid date"));
        HabitStore::open(repo, clock, StoreConfig::default()).expect("store should open")
    }

    #[test]
    fn create_uses_configured_default_target() {
        let mut store = open_store();
        let id = store
            .create("Journal", Cadence::Weekly, None)
            .expect("create should succeed");
        let habit = store.query(&id).expect("habit should exist");
        assert_eq!(habit.target_weekly(), 3);
        assert_eq!(habit.name(), "Journal");
    }

    #[test]
    fn open_rejects_invalid_config() {
        let repo = BlobHabitRepository::new(MemoryKeyValueStore::new(), "habitsData");
        let clock = FixedClock(parse_date("2026-10-19").expect("valid date"));
        let config = StoreConfig {
            default_weekly_target: 9,
            ..StoreConfig::default()
        };
        assert!(matches!(
            HabitStore::open(repo, clock, config),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn rename_rejects_blank_and_keeps_old_name() {
        let mut store = open_store();
        let id = store
            .create("Meditate", Cadence::Daily, None)
            .expect("create should succeed");

        let err = store.rename(&id, "   ").expect_err("blank rename should fail");
        assert_eq!(err, StoreError::Validation(HabitValidationError::EmptyName));
        assert_eq!(store.query(&id).expect("habit exists").name(), "Meditate");

        assert!(store.rename(&id, " Sit ").expect("rename should succeed"));
        assert_eq!(store.query(&id).expect("habit exists").name(), "Sit");
    }
}
