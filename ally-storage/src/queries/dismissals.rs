//! dismissals table queries.

use ally_core::traits::persistence::DismissalRow;
use ally_core::types::check::{CheckKind, DismissalStatus};
use ally_core::StorageError;
use rusqlite::{params, Connection};

use crate::connection::sqe;

/// Load every stored dismissal record.
///
/// Rows whose kind or status no longer parses (written by a newer build)
/// are skipped with a warning rather than failing the load.
pub fn load_all(conn: &Connection) -> Result<Vec<DismissalRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT page, kind, key, status FROM dismissals ORDER BY page, kind, key")
        .map_err(sqe)?;

    let mut rows = Vec::new();
    let mapped = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(sqe)?;

    for record in mapped {
        let (page, kind_name, key, status_name) = record.map_err(sqe)?;
        let (Some(kind), Some(status)) = (
            CheckKind::parse_str(&kind_name),
            DismissalStatus::parse_str(&status_name),
        ) else {
            tracing::warn!(page, kind = kind_name, "skipping unrecognized dismissal row");
            continue;
        };
        rows.push(DismissalRow {
            page,
            kind,
            key,
            status,
        });
    }
    Ok(rows)
}

/// Insert or update one dismissal record.
pub fn upsert(conn: &Connection, row: &DismissalRow) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO dismissals (page, kind, key, status)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (page, kind, key)
         DO UPDATE SET status = excluded.status, updated_at = datetime('now')",
    )
    .map_err(sqe)?
    .execute(params![
        row.page,
        row.kind.name(),
        row.key,
        row.status.name()
    ])
    .map_err(sqe)?;
    Ok(())
}

/// Delete one dismissal record. Deleting a missing row is not an error.
pub fn delete(
    conn: &Connection,
    page: &str,
    kind: CheckKind,
    key: &str,
) -> Result<(), StorageError> {
    conn.prepare_cached("DELETE FROM dismissals WHERE page = ?1 AND kind = ?2 AND key = ?3")
        .map_err(sqe)?
        .execute(params![page, kind.name(), key])
        .map_err(sqe)?;
    Ok(())
}
