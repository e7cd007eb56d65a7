//! Error types for the Ally engine.

pub mod checker_error;
pub mod error_code;
pub mod storage_error;

pub use checker_error::CheckerError;
pub use storage_error::StorageError;
