//! The issue record emitted by check modules.

use ally_core::{CheckKind, DismissalStatus, NodeId};
use serde::{Deserialize, Serialize};

/// Where an annotation marker attaches relative to the flagged element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertionHint {
    Before,
    After,
    Inside,
}

/// One detected (or potential) accessibility defect tied to one element.
///
/// Issues are rebuilt from scratch at the start of every scan. The store
/// resolves `dismissal_status` and fills `sort_pos`/`scrollable_parent`
/// during finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub element: NodeId,
    pub kind: CheckKind,
    /// The content that triggered the flag (alt text, link text, ...).
    pub content: String,
    pub position: InsertionHint,
    /// `None` for non-dismissable kinds and for empty derived keys.
    pub dismissal_key: Option<String>,
    pub dismissal_status: Option<DismissalStatus>,
    pub sort_pos: u32,
    pub scrollable_parent: Option<NodeId>,
}

impl Issue {
    /// Build an issue. The dismissal key is discarded for non-dismissable
    /// kinds and for keys that sanitize down to nothing.
    pub fn new(element: NodeId, kind: CheckKind, content: &str, key: Option<String>) -> Self {
        let dismissal_key = if kind.is_dismissable() {
            key.filter(|k| !k.is_empty())
        } else {
            None
        };
        Self {
            element,
            kind,
            content: content.to_string(),
            position: InsertionHint::Before,
            dismissal_key,
            dismissal_status: None,
            sort_pos: 0,
            scrollable_parent: None,
        }
    }

    pub fn with_position(mut self, position: InsertionHint) -> Self {
        self.position = position;
        self
    }

    /// Whether this issue counts as a hard error after status resolution.
    /// Non-dismissable kinds are always errors.
    pub fn is_error(&self) -> bool {
        !self.kind.is_dismissable()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissal_status.is_some()
    }
}
