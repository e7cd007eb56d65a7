//! # ally-storage
//!
//! Durable persistence for the Ally accessibility checker: a SQLite-backed
//! dismissal store (rusqlite, WAL) and an event-channel adapter for hosts
//! that synchronize dismissals externally.

pub mod connection;
pub mod engine;
pub mod migrations;
pub mod queries;
pub mod sync;

pub use connection::DatabaseManager;
pub use engine::{open_persistence, DismissalStorageEngine};
pub use sync::{SyncChannelAdapter, SyncMessage};
