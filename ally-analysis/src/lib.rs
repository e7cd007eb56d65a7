//! # ally-analysis
//!
//! Analysis engine for the Ally accessibility checker: element collector,
//! check modules, result store and dismissal engine, scan orchestrator,
//! incremental recheck scheduler, annotation layout, and jump list.

#![allow(clippy::module_inception)]

pub mod checker;
pub mod checks;
pub mod collector;
pub mod jump;
pub mod layout;
pub mod orchestrator;
pub mod scheduler;
pub mod store;

pub use checker::Checker;
pub use store::issue::{InsertionHint, Issue};
