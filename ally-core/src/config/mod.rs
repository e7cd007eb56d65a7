//! Checker configuration.

pub mod checker_config;

pub use checker_config::{AlertMode, CheckerConfig, WatchScope};
