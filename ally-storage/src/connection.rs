//! `DatabaseManager` — single guarded connection with read/write routing.
//!
//! All reads go through `with_reader()`, all writes through `with_writer()`.
//! No code outside this crate touches a raw `&Connection`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ally_core::StorageError;
use rusqlite::Connection;

use crate::migrations;

pub struct DatabaseManager {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open (or create) a file-backed database, apply pragmas, and run
    /// migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(sqe)?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// In-memory database for tests and ephemeral embedding.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(sqe)?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    fn initialize(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            PRAGMA temp_store = MEMORY;
            ",
        )
        .map_err(sqe)?;
        migrations::migrate(conn)
    }

    /// Database file path (`None` for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.conn.lock().map_err(|_| StorageError::DbBusy)?;
        f(&conn)
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.conn.lock().map_err(|_| StorageError::DbBusy)?;
        f(&conn)
    }
}

/// StorageError from a rusqlite error.
pub(crate) fn sqe(e: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_migrates() {
        let db = DatabaseManager::open_in_memory().unwrap();
        let version: u32 = db
            .with_reader(|conn| {
                conn.pragma_query_value(None, "user_version", |row| row.get(0))
                    .map_err(sqe)
            })
            .unwrap();
        assert_eq!(version, migrations::SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ally.db");
        drop(DatabaseManager::open(&path).unwrap());
        let db = DatabaseManager::open(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
    }
}
