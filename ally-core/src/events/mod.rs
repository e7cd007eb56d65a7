//! Typed events emitted by the engine.
//!
//! Events are fire-and-observe: no handler return value is awaited, and a
//! panicking handler never takes down a scan.

pub mod dispatcher;
pub mod handler;

use serde::{Deserialize, Serialize};

use crate::types::check::{AlertCounts, CheckKind, DismissalAction};

/// Identity of one issue, stable enough for hosts to correlate
/// tooltip-opened/closed pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub kind: CheckKind,
    pub dismissal_key: Option<String>,
    pub sort_pos: u32,
}

/// Everything the engine announces to the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CheckerEvent {
    /// A full or incremental scan finished and counts are available.
    ScanCompleted {
        counts: AlertCounts,
        incremental: bool,
    },
    /// The summary panel was opened (by the user or by a new-alert auto-open).
    PanelOpened,
    /// A detail tooltip was opened for an issue.
    TooltipOpened { issue: IssueRef },
    /// A detail tooltip was closed.
    TooltipClosed { issue: IssueRef },
    /// A dismissal record changed. This is the integration point for an
    /// external sync channel, which is expected to call back into
    /// `dismiss_one`.
    DismissalUpdated {
        page: String,
        kind: CheckKind,
        key: String,
        action: DismissalAction,
    },
}

impl CheckerEvent {
    /// Serialize for hosts that forward events over a string boundary
    /// (postMessage-style bridges, log sinks).
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "event serialization failed");
            String::from("{}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_round_trip() {
        let event = CheckerEvent::DismissalUpdated {
            page: "/about".to_string(),
            kind: CheckKind::AltLong,
            key: "abc123".to_string(),
            action: DismissalAction::Hide,
        };
        let parsed: CheckerEvent = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(parsed, event);
    }
}
