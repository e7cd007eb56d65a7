//! Event handler trait.

use super::CheckerEvent;

/// Implemented by anything that wants to observe engine events — the host
/// page bridge, the external dismissal-sync channel, test probes.
pub trait CheckerEventHandler: Send + Sync {
    /// Handle one event. Must not block; must not panic (a panic is
    /// contained by the dispatcher and logged).
    fn on_event(&self, event: &CheckerEvent);
}
