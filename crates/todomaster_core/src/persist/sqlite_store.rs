//! SQLite-backed snapshot store.
//!
//! # Responsibility
//! - Implement the key-value snapshot contract over the `snapshots` table.
//! - Verify at construction that the connection is migrated and usable.
//!
//! # Invariants
//! - `save` overwrites the single row for `SNAPSHOT_KEY` in place.
//! - Construction fails on an unmigrated connection instead of failing later
//!   on the first read or write.

use super::{PersistError, PersistResult, SnapshotStore, SNAPSHOT_KEY};
use crate::db::migrations::latest_version;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable snapshot storage over a migrated SQLite connection.
#[derive(Debug)]
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    /// Wraps a connection after checking it was opened through `db::open_db`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match,
    ///   which means migrations never ran here.
    /// - `MissingRequiredTable` when the `snapshots` table is absent.
    pub fn try_new(conn: Connection) -> PersistResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version != latest_version() {
            return Err(PersistError::UninitializedConnection {
                expected_version: latest_version(),
                actual_version: version,
            });
        }

        let has_table: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'snapshots';",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_table.is_none() {
            return Err(PersistError::MissingRequiredTable("snapshots"));
        }

        Ok(Self { conn })
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> PersistResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1;",
                params![SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, snapshot: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![SNAPSHOT_KEY, snapshot],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSnapshotStore;
    use crate::db::open_db_in_memory;
    use crate::persist::{PersistError, SnapshotStore};
    use rusqlite::Connection;

    #[test]
    fn load_is_absent_before_any_save() {
        let store = SqliteSnapshotStore::try_new(open_db_in_memory().unwrap()).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_overwrites_the_previous_value() {
        let mut store = SqliteSnapshotStore::try_new(open_db_in_memory().unwrap()).unwrap();

        store.save("[]").unwrap();
        store.save(r#"[{"id":1,"title":"t","description":"","completed":false}]"#)
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.contains("\"id\":1"));
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteSnapshotStore::try_new(conn).unwrap_err();
        match err {
            PersistError::UninitializedConnection {
                expected_version,
                actual_version: 0,
            } => assert!(expected_version > 0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn try_new_rejects_connection_without_snapshots_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&format!(
            "PRAGMA user_version = {};",
            crate::db::migrations::latest_version()
        ))
        .unwrap();

        let err = SqliteSnapshotStore::try_new(conn).unwrap_err();
        assert!(matches!(err, PersistError::MissingRequiredTable("snapshots")));
    }
}
