//! seen_counts table queries.

use ally_core::StorageError;
use rusqlite::{params, Connection};

use crate::connection::sqe;

/// Last-seen alert total for a page, if one was recorded.
pub fn load(conn: &Connection, page: &str) -> Result<Option<i64>, StorageError> {
    use rusqlite::OptionalExtension;

    conn.prepare_cached("SELECT total FROM seen_counts WHERE page = ?1")
        .map_err(sqe)?
        .query_row(params![page], |row| row.get(0))
        .optional()
        .map_err(sqe)
}

/// Record the alert total observed on a page.
pub fn save(conn: &Connection, page: &str, total: i64) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO seen_counts (page, total)
         VALUES (?1, ?2)
         ON CONFLICT (page)
         DO UPDATE SET total = excluded.total, updated_at = datetime('now')",
    )
    .map_err(sqe)?
    .execute(params![page, total])
    .map_err(sqe)?;
    Ok(())
}
