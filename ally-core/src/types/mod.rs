//! Shared type aliases and small value types.

pub mod check;
pub mod collections;
pub mod keys;

pub use check::{AlertCounts, CheckKind, CheckModule, DismissalAction, DismissalStatus};
