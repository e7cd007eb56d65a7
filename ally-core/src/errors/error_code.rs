//! Stable error codes, surfaced to host integrations alongside messages.

/// Trait for errors that carry a stable machine-readable code.
pub trait AllyErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const NO_ROOT_CONTAINER: &str = "ALLY_NO_ROOT_CONTAINER";
pub const CHECKING_PREVENTED: &str = "ALLY_CHECKING_PREVENTED";
pub const SCAN_IN_PROGRESS: &str = "ALLY_SCAN_IN_PROGRESS";
pub const TOOLTIP_OPEN: &str = "ALLY_TOOLTIP_OPEN";
pub const CUSTOM_TEST_TIMEOUT: &str = "ALLY_CUSTOM_TEST_TIMEOUT";
pub const SELECTOR_PARSE_ERROR: &str = "ALLY_SELECTOR_PARSE_ERROR";
pub const CONFIG_ERROR: &str = "ALLY_CONFIG_ERROR";

pub const STORAGE_ERROR: &str = "ALLY_STORAGE_ERROR";
pub const DB_BUSY: &str = "ALLY_DB_BUSY";
pub const MIGRATION_FAILED: &str = "ALLY_MIGRATION_FAILED";
pub const SYNC_CHANNEL_CLOSED: &str = "ALLY_SYNC_CHANNEL_CLOSED";
