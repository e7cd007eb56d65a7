//! Dismissal persistence trait.
//!
//! Implemented by the SQLite engine in `ally-storage`, by its sync-channel
//! adapter, and by `MemoryPersistence` for tests. Persistence is
//! best-effort: callers log failures and keep their in-memory state intact.

use crate::errors::StorageError;
use crate::types::check::{CheckKind, DismissalStatus};

/// One persisted dismissal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissalRow {
    pub page: String,
    pub kind: CheckKind,
    pub key: String,
    pub status: DismissalStatus,
}

/// Durable storage for dismissal decisions and per-page last-seen totals.
pub trait DismissalPersistence: Send + Sync {
    /// Load every stored dismissal. Called once at initialization.
    fn load_all(&self) -> Result<Vec<DismissalRow>, StorageError>;

    /// Insert or update one dismissal record.
    fn upsert(&self, row: &DismissalRow) -> Result<(), StorageError>;

    /// Delete one dismissal record (restore).
    fn delete(&self, page: &str, kind: CheckKind, key: &str) -> Result<(), StorageError>;

    /// The total alert count last seen on a page, if recorded.
    fn load_seen_total(&self, page: &str) -> Result<Option<i64>, StorageError>;

    /// Record the total alert count for a page.
    fn save_seen_total(&self, page: &str, total: i64) -> Result<(), StorageError>;
}

/// In-memory persistence for tests and headless embedding.
pub mod test_helpers {
    use std::sync::Mutex;

    use super::*;
    use crate::types::collections::FxHashMap;

    /// Volatile `DismissalPersistence` backed by a `Mutex<Vec<_>>`.
    #[derive(Default)]
    pub struct MemoryPersistence {
        rows: Mutex<Vec<DismissalRow>>,
        seen: Mutex<FxHashMap<String, i64>>,
    }

    impl MemoryPersistence {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn row_count(&self) -> usize {
            self.rows.lock().expect("poisoned").len()
        }
    }

    impl DismissalPersistence for MemoryPersistence {
        fn load_all(&self) -> Result<Vec<DismissalRow>, StorageError> {
            Ok(self.rows.lock().expect("poisoned").clone())
        }

        fn upsert(&self, row: &DismissalRow) -> Result<(), StorageError> {
            let mut rows = self.rows.lock().expect("poisoned");
            match rows
                .iter_mut()
                .find(|r| r.page == row.page && r.kind == row.kind && r.key == row.key)
            {
                Some(existing) => existing.status = row.status,
                None => rows.push(row.clone()),
            }
            Ok(())
        }

        fn delete(&self, page: &str, kind: CheckKind, key: &str) -> Result<(), StorageError> {
            self.rows
                .lock()
                .expect("poisoned")
                .retain(|r| !(r.page == page && r.kind == kind && r.key == key));
            Ok(())
        }

        fn load_seen_total(&self, page: &str) -> Result<Option<i64>, StorageError> {
            Ok(self.seen.lock().expect("poisoned").get(page).copied())
        }

        fn save_seen_total(&self, page: &str, total: i64) -> Result<(), StorageError> {
            self.seen
                .lock()
                .expect("poisoned")
                .insert(page.to_string(), total);
            Ok(())
        }
    }
}
