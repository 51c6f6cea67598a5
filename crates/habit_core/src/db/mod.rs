//! Database file handling for the habit key/value store.
//!
//! The whole habit collection lives in one `kv_store` row, so this layer
//! only has to hand out a migrated connection and say why it could not.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - `open_db*` only returns connections whose schema is fully migrated.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate the habit database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file carries a schema this build does not know how to read.
    SchemaFromNewerBuild { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaFromNewerBuild { found, supported } => write!(
                f,
                "habit database is at schema v{found}; this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use std::error::Error;

    #[test]
    fn newer_schema_error_names_both_versions() {
        let err = DbError::SchemaFromNewerBuild {
            found: 4,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "habit database is at schema v4; this build reads up to v1"
        );
        assert!(err.source().is_none());
    }
}
