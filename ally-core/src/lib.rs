//! # ally-core
//!
//! Foundation crate for the Ally accessibility checking engine.
//! Defines the document model, configuration, errors, events, persistence
//! traits, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod dom;
pub mod errors;
pub mod events;
pub mod tracing_init;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{AlertMode, CheckerConfig, WatchScope};
pub use dom::{DocumentTree, MutationRecord, NodeData, NodeId, Rect};
pub use errors::error_code::AllyErrorCode;
pub use errors::{CheckerError, StorageError};
pub use events::dispatcher::EventDispatcher;
pub use events::handler::CheckerEventHandler;
pub use events::CheckerEvent;
pub use types::check::{AlertCounts, CheckKind, CheckModule, DismissalAction, DismissalStatus};
pub use types::collections::{FxHashMap, FxHashSet};
