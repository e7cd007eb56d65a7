//! Incremental recheck scheduling.

pub mod debounce;
pub mod recheck;

pub use debounce::Debounce;
pub use recheck::{RecheckScheduler, SchedulerAction};
