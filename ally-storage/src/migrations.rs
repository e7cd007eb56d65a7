//! Schema migration, tracked via PRAGMA user_version.

use ally_core::StorageError;
use rusqlite::Connection;

use crate::connection::sqe;

pub const SCHEMA_VERSION: u32 = 1;

/// Schema SQL — dismissal records and per-page last-seen totals.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS dismissals (
    page TEXT NOT NULL,
    kind TEXT NOT NULL,
    key TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('ok', 'hide')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (page, kind, key)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_dismissals_page ON dismissals(page);

CREATE TABLE IF NOT EXISTS seen_counts (
    page TEXT PRIMARY KEY,
    total INTEGER NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
) STRICT;
"#;

/// Bring the database up to `SCHEMA_VERSION`. Idempotent.
pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(sqe)?;

    if current > SCHEMA_VERSION {
        return Err(StorageError::MigrationFailed {
            version: current,
            message: format!("database is newer than this build (supports {SCHEMA_VERSION})"),
        });
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| StorageError::MigrationFailed {
            version: SCHEMA_VERSION,
            message: e.to_string(),
        })?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(sqe)?;
    tracing::debug!(from = current, to = SCHEMA_VERSION, "schema migrated");
    Ok(())
}
