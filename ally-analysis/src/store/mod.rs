//! Result aggregation, dismissal map, and the issue record.

pub mod dismissal;
pub mod issue;
pub mod results;

pub use dismissal::DismissalMap;
pub use issue::{InsertionHint, Issue};
pub use results::ResultStore;
