//! Store configuration.
//!
//! # Responsibility
//! - Hold the tunables a host may override when opening a habit store.
//! - Reject configurations that would break streak or persistence contracts.
//!
//! # Invariants
//! - `default_weekly_target` is always within `1..=7` after `validate()`.
//! - `history_days` is within `1..=MAX_HISTORY_DAYS` after `validate()`.
//! - Missing fields in a host-provided document fall back to defaults.

use crate::calendar::WeekStart;
use crate::model::habit::{MAX_WEEKLY_TARGET, MIN_WEEKLY_TARGET};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key the habit collection blob is stored under by default.
pub const DEFAULT_STORAGE_KEY: &str = "habitsData";
/// Weekly target assigned when creation input omits one.
pub const DEFAULT_WEEKLY_TARGET: u8 = 3;
/// Default number of days returned by completion history queries.
pub const DEFAULT_HISTORY_DAYS: u32 = 14;
/// Upper bound for any completion history window (one leap year).
pub const MAX_HISTORY_DAYS: u32 = 366;

/// Host-tunable store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Durable-store key holding the serialized collection.
    pub storage_key: String,
    /// Target used by `create` when none is supplied.
    pub default_weekly_target: u8,
    /// First day of the week for weekly buckets and progress.
    pub week_start: WeekStart,
    /// Window length for `history` when the caller passes no explicit value.
    pub history_days: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_weekly_target: DEFAULT_WEEKLY_TARGET,
            week_start: WeekStart::default(),
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

/// Configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
    InvalidDefaultTarget(u8),
    EmptyHistoryWindow,
    HistoryWindowTooLarge(u32),
    /// The repository persists under a different key than configured.
    StorageKeyMismatch {
        configured: String,
        repository: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
            Self::InvalidDefaultTarget(value) => write!(
                f,
                "default_weekly_target must be within {MIN_WEEKLY_TARGET}..={MAX_WEEKLY_TARGET}, got {value}"
            ),
            Self::EmptyHistoryWindow => write!(f, "history_days must be positive"),
            Self::HistoryWindowTooLarge(value) => write!(
                f,
                "history_days must be at most {MAX_HISTORY_DAYS}, got {value}"
            ),
            Self::StorageKeyMismatch {
                configured,
                repository,
            } => write!(
                f,
                "storage_key `{configured}` does not match repository key `{repository}`"
            ),
        }
    }
}

impl Error for ConfigError {}

impl StoreConfig {
    /// Checks config invariants before a store is opened with it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if !(MIN_WEEKLY_TARGET..=MAX_WEEKLY_TARGET).contains(&self.default_weekly_target) {
            return Err(ConfigError::InvalidDefaultTarget(
                self.default_weekly_target,
            ));
        }
        if self.history_days == 0 {
            return Err(ConfigError::EmptyHistoryWindow);
        }
        if self.history_days > MAX_HISTORY_DAYS {
            return Err(ConfigError::HistoryWindowTooLarge(self.history_days));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY, MAX_HISTORY_DAYS};
    use crate::calendar::WeekStart;

    #[test]
    fn defaults_are_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.week_start, WeekStart::Monday);
        config.validate().expect("default config should validate");
    }

    #[test]
    fn partial_document_falls_back_to_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"week_start":"sunday"}"#).expect("config should parse");
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.default_weekly_target, 3);
        assert_eq!(config.history_days, 14);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let blank_key = StoreConfig {
            storage_key: "  ".to_string(),
            ..StoreConfig::default()
        };
        assert_eq!(blank_key.validate(), Err(ConfigError::EmptyStorageKey));

        let zero_target = StoreConfig {
            default_weekly_target: 0,
            ..StoreConfig::default()
        };
        assert_eq!(
            zero_target.validate(),
            Err(ConfigError::InvalidDefaultTarget(0))
        );

        let no_history = StoreConfig {
            history_days: 0,
            ..StoreConfig::default()
        };
        assert_eq!(no_history.validate(), Err(ConfigError::EmptyHistoryWindow));
    }

    #[test]
    fn validate_bounds_history_window() {
        let full_year = StoreConfig {
            history_days: MAX_HISTORY_DAYS,
            ..StoreConfig::default()
        };
        full_year.validate().expect("a full year window should validate");

        let huge = StoreConfig {
            history_days: 5_000_000,
            ..StoreConfig::default()
        };
        assert_eq!(
            huge.validate(),
            Err(ConfigError::HistoryWindowTooLarge(5_000_000))
        );
    }
}
