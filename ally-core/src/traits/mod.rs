//! Traits at the crate seams.

pub mod persistence;

pub use persistence::{DismissalPersistence, DismissalRow};
