//! Tracing subscriber initialization.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber from `ALLY_LOG` (falling back
/// to `warn`). Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env("ALLY_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
