//! Engine-level errors.
//!
//! None of these propagate out of a scan to the host: configuration errors
//! disable the checker and are logged, timeouts are logged and aggregation
//! proceeds without the missing contributions.

use super::error_code::{self, AllyErrorCode};

/// Errors that can occur while running the checker.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("No root container matched selector {selector:?}; checker disabled")]
    NoRootContainer { selector: String },

    #[error("Checking prevented: selector {selector:?} {condition} on this page")]
    CheckingPrevented { selector: String, condition: &'static str },

    #[error("A scan is already running")]
    ScanInProgress,

    #[error("Scan rejected: a tooltip is open")]
    TooltipOpen,

    #[error("Custom tests did not report within {waited_ms}ms ({missing} outstanding)")]
    CustomTestTimeout { waited_ms: u64, missing: usize },

    #[error("Selector parse error in {selector:?}: {message}")]
    SelectorParse { selector: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] super::StorageError),
}

impl AllyErrorCode for CheckerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoRootContainer { .. } => error_code::NO_ROOT_CONTAINER,
            Self::CheckingPrevented { .. } => error_code::CHECKING_PREVENTED,
            Self::ScanInProgress => error_code::SCAN_IN_PROGRESS,
            Self::TooltipOpen => error_code::TOOLTIP_OPEN,
            Self::CustomTestTimeout { .. } => error_code::CUSTOM_TEST_TIMEOUT,
            Self::SelectorParse { .. } => error_code::SELECTOR_PARSE_ERROR,
            Self::Config { .. } => error_code::CONFIG_ERROR,
            Self::Storage(e) => e.error_code(),
        }
    }
}
