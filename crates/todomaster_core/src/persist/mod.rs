//! Snapshot persistence contracts and backends.
//!
//! # Responsibility
//! - Define the two-operation storage contract the task store depends on.
//! - Keep serialization and SQL details out of store/business logic.
//!
//! # Invariants
//! - A save always carries the entire current collection, never a delta.
//! - Restore paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::task::TaskValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod snapshot;
mod sqlite_store;

pub use snapshot::{decode_snapshot, encode_snapshot};
pub use sqlite_store::SqliteSnapshotStore;

/// Storage key under which the serialized task collection lives.
///
/// Matches the layout the presentation stack has always used; renaming it
/// orphans every existing snapshot.
pub const SNAPSHOT_KEY: &str = "todoTasks";

pub type PersistResult<T> = Result<T, PersistError>;

/// Failures on the persistence boundary.
///
/// None of these are fatal to the session: the in-memory collection stays
/// authoritative, the durable copy merely lags.
#[derive(Debug)]
pub enum PersistError {
    /// Transport failure in the backing key-value store.
    Db(DbError),
    /// The stored snapshot exists but cannot be decoded into valid tasks.
    Corrupt(String),
    /// The current collection failed to serialize.
    Encode(serde_json::Error),
    /// The connection was never taken through `db::open_db` migrations.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// A table the backend depends on is absent.
    MissingRequiredTable(&'static str),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Corrupt(message) => write!(f, "corrupt snapshot: {message}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection reports schema version {actual_version}, expected {expected_version}; \
                 open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Corrupt(_) => None,
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<TaskValidationError> for PersistError {
    fn from(value: TaskValidationError) -> Self {
        Self::Corrupt(value.to_string())
    }
}

/// Key-value collaborator the task store persists through.
///
/// The contract mirrors browser local storage: `load` returns the last saved
/// value or absent, `save` overwrites the prior value in full.
pub trait SnapshotStore {
    /// Returns the last-written snapshot, or `None` when nothing was saved.
    fn load(&self) -> PersistResult<Option<String>>;

    /// Durably stores `snapshot`, replacing any prior value.
    fn save(&mut self, snapshot: &str) -> PersistResult<()>;
}
