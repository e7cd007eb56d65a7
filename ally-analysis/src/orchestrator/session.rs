//! Scan state machine and per-scan session data.

use ally_core::AlertCounts;

/// The orchestrator's state. `Disabled` is terminal until an explicit
/// re-enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Collecting,
    Testing,
    Aggregating,
    Rendering,
    Disabled,
}

/// Transient data of one orchestrator pass. Exactly one session is alive
/// at a time; the outcome carries the counts produced by the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub counts: AlertCounts,
    pub incremental: bool,
}
