//! Habit collection repository over a key/value blob.
//!
//! # Responsibility
//! - Serialize the whole habit collection as one JSON array.
//! - Read it back, treating absence or corruption as an empty collection.
//!
//! # Invariants
//! - `save` writes the full collection under one key; no partial writes.
//! - `load` never returns an error; failures are logged and yield `[]`.
//! - A record that fails to decode is dropped on its own; the rest load.

use super::kv_store::KeyValueStore;
use super::RepoResult;
use crate::config::StoreConfig;
use crate::model::habit::Habit;
use log::{error, info, warn};

/// Persistence capability used by `HabitStore`.
pub trait HabitRepository {
    /// Loads the full collection; never fails.
    fn load(&self) -> Vec<Habit>;
    /// Replaces the persisted collection.
    fn save(&self, habits: &[Habit]) -> RepoResult<()>;
    /// Durable key the collection lives under, for key-addressed backends.
    fn storage_key(&self) -> Option<&str> {
        None
    }
}

/// Stores the collection as a JSON array under a fixed key.
pub struct BlobHabitRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> BlobHabitRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Builds a repository keyed by `config.storage_key`.
    pub fn from_config(store: S, config: &StoreConfig) -> Self {
        Self::new(store, config.storage_key.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying key/value store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> HabitRepository for BlobHabitRepository<S> {
    fn load(&self) -> Vec<Habit> {
        let blob = match self.store.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                info!("event=habits_load module=repo status=empty reason=missing_blob");
                return Vec::new();
            }
            Err(err) => {
                error!("event=habits_load module=repo status=error reason=store_read error={err}");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&blob) {
            Ok(records) => records,
            Err(err) => {
                // serde_json errors carry only position info, not blob text.
                warn!(
                    "event=habits_load module=repo status=error reason=malformed_blob bytes={} error={err}",
                    blob.len()
                );
                return Vec::new();
            }
        };

        let total = records.len();
        let habits = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Habit>(record) {
                Ok(habit) => Some(habit),
                Err(err) => {
                    warn!("event=habit_decode module=repo status=dropped error={err}");
                    None
                }
            })
            .collect::<Vec<_>>();

        let dropped = total - habits.len();
        if dropped > 0 {
            warn!(
                "event=habits_load module=repo status=partial count={} dropped={dropped} bytes={}",
                habits.len(),
                blob.len()
            );
        } else {
            info!(
                "event=habits_load module=repo status=ok count={} bytes={}",
                habits.len(),
                blob.len()
            );
        }
        habits
    }

    fn save(&self, habits: &[Habit]) -> RepoResult<()> {
        let blob = serde_json::to_string(habits)?;
        self.store.set(&self.key, &blob)
    }

    fn storage_key(&self) -> Option<&str> {
        Some(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobHabitRepository, HabitRepository};
    use crate::config::StoreConfig;
    use crate::model::habit::{Cadence, Habit};
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn load_without_blob_is_empty() {
        let repo = BlobHabitRepository::new(MemoryKeyValueStore::new(), "habitsData");
        assert!(repo.load().is_empty());
    }

    #[test]
    fn malformed_blob_loads_as_empty() {
        let kv = MemoryKeyValueStore::new();
        kv.set("habitsData", "{not json").expect("memory set never fails");
        let repo = BlobHabitRepository::new(kv, "habitsData");
        assert!(repo.load().is_empty());
    }

    #[test]
    fn save_then_load_restores_collection() {
        let kv = MemoryKeyValueStore::new();
        let repo = BlobHabitRepository::new(kv.clone(), "habitsData");
        let habits = vec![
            Habit::new("Stretch", Cadence::Daily, 3).expect("valid habit"),
            Habit::new("Gym", Cadence::Weekly, 4).expect("valid habit"),
        ];

        repo.save(&habits).expect("save should succeed");
        assert_eq!(repo.load(), habits);

        let raw = kv
            .get("habitsData")
            .expect("memory get never fails")
            .expect("blob should exist");
        assert!(raw.starts_with('['));
    }

    #[test]
    fn one_undecodable_record_does_not_drop_the_rest() {
        let kv = MemoryKeyValueStore::new();
        kv.set(
            "habitsData",
            r#"[
                {"habitId":"1","habitName":"Read","trackingType":"daily","datesCompleted":["2026-10-19"]},
                {"habitId":"2","habitName":"Bad","trackingType":"monthly"},
                {"habitId":"3","habitName":"Gym","trackingType":"weekly","targetWeekly":4}
            ]"#,
        )
        .expect("memory set never fails");
        let repo = BlobHabitRepository::new(kv, "habitsData");

        let names = repo
            .load()
            .iter()
            .map(|habit| habit.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Read".to_string(), "Gym".to_string()]);
    }

    #[test]
    fn from_config_uses_configured_key() {
        let config = StoreConfig {
            storage_key: "customKey".to_string(),
            ..StoreConfig::default()
        };
        let repo = BlobHabitRepository::from_config(MemoryKeyValueStore::new(), &config);
        assert_eq!(repo.key(), "customKey");
        assert_eq!(repo.storage_key(), Some("customKey"));
    }
}
