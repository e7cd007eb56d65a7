//! Element collection.

pub mod categories;
pub mod collector;

pub use categories::{Category, ElementRegistry};
pub use collector::{selector_matches_any, Collector};
