//! Storage-layer errors for SQLite and sync-channel persistence.

use super::error_code::{self, AllyErrorCode};

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Database busy (another operation in progress)")]
    DbBusy,

    #[error("Sync channel disconnected")]
    SyncChannelClosed,
}

impl AllyErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::SyncChannelClosed => error_code::SYNC_CHANNEL_CLOSED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
