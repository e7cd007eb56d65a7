//! Sync-channel persistence for hosts that store dismissals elsewhere.
//!
//! Instead of writing to SQLite, the adapter forwards every mutation over a
//! crossbeam channel. The host drains the receiver and applies the changes
//! to its own backend (a CMS database, a REST endpoint). Initial state is
//! supplied up front, so `load_all()` never blocks on the host.

use std::sync::Mutex;

use ally_core::traits::persistence::{DismissalPersistence, DismissalRow};
use ally_core::types::check::CheckKind;
use ally_core::StorageError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use rustc_hash::FxHashMap;

/// One outbound mutation for the host to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    Upsert(DismissalRow),
    Delete {
        page: String,
        kind: CheckKind,
        key: String,
    },
    SeenTotal {
        page: String,
        total: i64,
    },
}

pub struct SyncChannelAdapter {
    initial: Vec<DismissalRow>,
    sender: Sender<SyncMessage>,
    // Seen totals are queried synchronously during scans, so they are
    // mirrored locally as well as forwarded.
    seen: Mutex<FxHashMap<String, i64>>,
}

impl SyncChannelAdapter {
    /// Build an adapter seeded with the host's current dismissal rows.
    /// Returns the adapter and the receiver the host drains.
    pub fn new(initial: Vec<DismissalRow>) -> (Self, Receiver<SyncMessage>) {
        let (sender, receiver) = unbounded();
        (
            Self {
                initial,
                sender,
                seen: Mutex::new(FxHashMap::default()),
            },
            receiver,
        )
    }

    fn send(&self, message: SyncMessage) -> Result<(), StorageError> {
        self.sender
            .send(message)
            .map_err(|_| StorageError::SyncChannelClosed)
    }
}

impl DismissalPersistence for SyncChannelAdapter {
    fn load_all(&self) -> Result<Vec<DismissalRow>, StorageError> {
        Ok(self.initial.clone())
    }

    fn upsert(&self, row: &DismissalRow) -> Result<(), StorageError> {
        self.send(SyncMessage::Upsert(row.clone()))
    }

    fn delete(&self, page: &str, kind: CheckKind, key: &str) -> Result<(), StorageError> {
        self.send(SyncMessage::Delete {
            page: page.to_string(),
            kind,
            key: key.to_string(),
        })
    }

    fn load_seen_total(&self, page: &str) -> Result<Option<i64>, StorageError> {
        Ok(self
            .seen
            .lock()
            .map_err(|_| StorageError::DbBusy)?
            .get(page)
            .copied())
    }

    fn save_seen_total(&self, page: &str, total: i64) -> Result<(), StorageError> {
        self.seen
            .lock()
            .map_err(|_| StorageError::DbBusy)?
            .insert(page.to_string(), total);
        self.send(SyncMessage::SeenTotal {
            page: page.to_string(),
            total,
        })
    }
}
