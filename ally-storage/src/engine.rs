//! `DismissalStorageEngine` — the SQLite-backed `DismissalPersistence`.

use std::path::Path;

use ally_core::config::CheckerConfig;
use ally_core::traits::persistence::{DismissalPersistence, DismissalRow};
use ally_core::types::check::CheckKind;
use ally_core::StorageError;
use crossbeam_channel::Receiver;

use crate::connection::DatabaseManager;
use crate::queries;
use crate::sync::{SyncChannelAdapter, SyncMessage};

/// Select the persistence backend from the config's external-sync flag.
///
/// With `external_sync` off this opens (or creates) the SQLite store at
/// `db_path` and `seed` is ignored. With it on, dismissals live with the
/// host: `seed` is the host's current row set and the returned receiver
/// carries every subsequent change for the host to apply.
pub fn open_persistence(
    config: &CheckerConfig,
    db_path: &Path,
    seed: Vec<DismissalRow>,
) -> Result<(Box<dyn DismissalPersistence>, Option<Receiver<SyncMessage>>), StorageError> {
    if config.effective_external_sync() {
        let (adapter, receiver) = SyncChannelAdapter::new(seed);
        Ok((Box::new(adapter), Some(receiver)))
    } else {
        Ok((Box::new(DismissalStorageEngine::open(db_path)?), None))
    }
}

pub struct DismissalStorageEngine {
    db: DatabaseManager,
}

impl DismissalStorageEngine {
    /// Open (or create) the dismissal database at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open(path)?,
        })
    }

    /// In-memory engine for tests and ephemeral embedding.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.db.path()
    }
}

impl DismissalPersistence for DismissalStorageEngine {
    fn load_all(&self) -> Result<Vec<DismissalRow>, StorageError> {
        self.db.with_reader(queries::dismissals::load_all)
    }

    fn upsert(&self, row: &DismissalRow) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::dismissals::upsert(conn, row))
    }

    fn delete(&self, page: &str, kind: CheckKind, key: &str) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::dismissals::delete(conn, page, kind, key))
    }

    fn load_seen_total(&self, page: &str) -> Result<Option<i64>, StorageError> {
        self.db.with_reader(|conn| queries::seen::load(conn, page))
    }

    fn save_seen_total(&self, page: &str, total: i64) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::seen::save(conn, page, total))
    }
}
