//! The jump list: position-ordered navigation over visible markers.

use ally_core::constants::SCROLLABLE_SORT_SKEW;
use ally_core::{CheckKind, NodeId};

use crate::store::issue::Issue;

#[derive(Debug, Clone, PartialEq)]
pub struct JumpEntry {
    pub element: NodeId,
    pub kind: CheckKind,
    pub dismissal_key: Option<String>,
    pub sort_key: u64,
}

/// Ordered sequence of marker handles for next/previous navigation.
///
/// Issues inside scrollable containers are floated to the end via a
/// position skew: containers cluster together while intra-container
/// document order is preserved. Rebuilt on every panel-open and after
/// every dismissal action.
#[derive(Debug, Default)]
pub struct JumpList {
    entries: Vec<JumpEntry>,
    cursor: Option<usize>,
}

impl JumpList {
    /// Build from the finalized issue set. Dismissed issues are skipped
    /// unless `show_dismissed` is active.
    pub fn rebuild(issues: &[Issue], show_dismissed: bool) -> Self {
        let mut entries: Vec<JumpEntry> = issues
            .iter()
            .filter(|issue| show_dismissed || !issue.is_dismissed())
            .map(|issue| {
                let mut sort_key = u64::from(issue.sort_pos);
                if issue.scrollable_parent.is_some() {
                    sort_key += u64::from(SCROLLABLE_SORT_SKEW);
                }
                JumpEntry {
                    element: issue.element,
                    kind: issue.kind,
                    dismissal_key: issue.dismissal_key.clone(),
                    sort_key,
                }
            })
            .collect();
        entries.sort_by_key(|e| e.sort_key);
        Self {
            entries,
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[JumpEntry] {
        &self.entries
    }

    pub fn current(&self) -> Option<&JumpEntry> {
        self.cursor.map(|i| &self.entries[i])
    }

    /// Advance, wrapping past the end.
    pub fn next(&mut self) -> Option<&JumpEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        };
        self.cursor = Some(next);
        Some(&self.entries[next])
    }

    /// Step back, wrapping before the start.
    pub fn previous(&mut self) -> Option<&JumpEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let prev = match self.cursor {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        };
        self.cursor = Some(prev);
        Some(&self.entries[prev])
    }
}
