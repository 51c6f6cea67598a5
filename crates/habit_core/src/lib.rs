//! Core domain logic for habit tracking.
//! This crate is the single source of truth for habit and streak invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod streak;

pub use calendar::{format_date, parse_date, Clock, FixedClock, SystemClock, WeekStart};
pub use config::{ConfigError, StoreConfig, MAX_HISTORY_DAYS};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::habit::{Cadence, Habit, HabitId, HabitValidationError};
pub use repo::habit_repo::{BlobHabitRepository, HabitRepository};
pub use repo::kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use repo::{RepoError, RepoResult};
pub use service::habit_store::{HabitListQuery, HabitOrder, HabitStore, StoreError};
pub use streak::{HistoryDay, Streak, StreakCalculator, WeeklyProgress};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
