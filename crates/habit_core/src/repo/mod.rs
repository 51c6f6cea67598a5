//! Persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the `KeyValueStore` and `HabitRepository` capabilities.
//! - Isolate SQLite and JSON details from the store orchestration.
//!
//! # Invariants
//! - The habit collection is always read and written as one blob.
//! - Load never fails; unreadable state degrades to an empty collection.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod habit_repo;
pub mod kv_store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure for key/value and habit repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode habit collection: {err}"),
            Self::Unavailable(message) => write!(f, "durable store unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
