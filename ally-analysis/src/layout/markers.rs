//! Marker placement with collision avoidance.
//!
//! Layout is read-then-write batched: every anchor rectangle is measured
//! first, then positions are computed in one pass, so the host applies all
//! style writes together without interleaved re-measurement.

use ally_core::config::CheckerConfig;
use ally_core::{CheckKind, DocumentTree, NodeId, Rect};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::store::issue::Issue;

/// Where markers live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Anchored to each flagged element's own position.
    Inline,
    /// Anchored to a fixed overlay tracking measured target positions
    /// (editable regions, off-document content).
    Overlay,
}

/// One placed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub element: NodeId,
    pub kind: CheckKind,
    pub rect: Rect,
    pub mode: LayoutMode,
    pub dismissed: bool,
}

/// Outcome of syncing placements into the retained marker set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

pub struct MarkerLayout {
    collision_window: usize,
    nudge_px: f32,
    overlap_px: f32,
}

impl MarkerLayout {
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            collision_window: config.effective_marker_collision_window(),
            nudge_px: config.effective_marker_nudge_px(),
            overlap_px: config.effective_marker_overlap_px(),
        }
    }

    /// Compute marker positions for the given issues, in document order.
    ///
    /// Each marker is nudged while its origin sits within the overlap
    /// threshold of any of the previous `collision_window` placed markers;
    /// offsets accumulate so a pile of colliders fans out instead of
    /// stacking.
    pub fn place(&self, doc: &DocumentTree, issues: &[Issue]) -> Vec<Marker> {
        // Measure pass.
        let measured: Vec<(usize, Rect, LayoutMode)> = issues
            .iter()
            .enumerate()
            .map(|(i, issue)| {
                let mode = if doc
                    .closest(issue.element, |d, n| d.is_editable_region(n))
                    .is_some()
                    || doc.is_editable_region(issue.element)
                {
                    LayoutMode::Overlay
                } else {
                    LayoutMode::Inline
                };
                (i, doc.rect(issue.element), mode)
            })
            .collect();

        // Placement pass.
        let mut placed: Vec<Marker> = Vec::with_capacity(measured.len());
        for (i, anchor, mode) in measured {
            let issue = &issues[i];
            let mut rect = anchor;
            let mut moved = true;
            let mut passes = 0;
            while moved && passes <= self.collision_window {
                moved = false;
                passes += 1;
                let window_start = placed.len().saturating_sub(self.collision_window);
                for prior in &placed[window_start..] {
                    if rect.origin_within(&prior.rect, self.overlap_px) {
                        rect.x += self.nudge_px;
                        moved = true;
                    }
                }
            }
            placed.push(Marker {
                element: issue.element,
                kind: issue.kind,
                rect,
                mode,
                dismissed: issue.is_dismissed(),
            });
        }
        placed
    }
}

/// Retained markers across renders, keyed by (element, kind).
///
/// Re-rendering with unchanged issues must not re-create markers; `sync`
/// only updates the ones whose placement or dismissal state changed.
#[derive(Default)]
pub struct MarkerSet {
    by_key: FxHashMap<(NodeId, CheckKind), Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn get(&self, element: NodeId, kind: CheckKind) -> Option<&Marker> {
        self.by_key.get(&(element, kind))
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.by_key.values()
    }

    /// Reconcile freshly placed markers against the retained set.
    pub fn sync(&mut self, placed: Vec<Marker>) -> SyncStats {
        let mut stats = SyncStats::default();
        let mut seen: FxHashSet<(NodeId, CheckKind)> = FxHashSet::default();

        for marker in placed {
            let key = (marker.element, marker.kind);
            seen.insert(key);
            match self.by_key.get_mut(&key) {
                Some(existing) if *existing == marker => {}
                Some(existing) => {
                    *existing = marker;
                    stats.updated += 1;
                }
                None => {
                    self.by_key.insert(key, marker);
                    stats.created += 1;
                }
            }
        }

        let before = self.by_key.len();
        self.by_key.retain(|key, _| seen.contains(key));
        stats.removed = before - self.by_key.len();
        stats
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> MarkerLayout {
        MarkerLayout::new(&CheckerConfig::default())
    }

    fn issue_at(doc: &mut DocumentTree, rect: Rect) -> Issue {
        let img = doc.append_element(doc.root(), "img");
        doc.set_rect(img, rect);
        Issue::new(img, CheckKind::AltNull, "", Some(format!("k{}", img.0)))
    }

    #[test]
    fn test_three_colliding_markers_fan_out() {
        let mut doc = DocumentTree::new("/t");
        let rect = Rect::new(100.0, 100.0, 32.0, 32.0);
        let issues = vec![
            issue_at(&mut doc, rect),
            issue_at(&mut doc, rect),
            issue_at(&mut doc, rect),
        ];
        let markers = layout().place(&doc, &issues);
        assert_eq!(markers.len(), 3);
        let threshold = CheckerConfig::default().effective_marker_overlap_px();
        for i in 0..markers.len() {
            for j in i + 1..markers.len() {
                assert!(
                    !markers[i].rect.origin_within(&markers[j].rect, threshold),
                    "markers {i} and {j} still overlap"
                );
            }
        }
    }

    #[test]
    fn test_distant_markers_stay_put() {
        let mut doc = DocumentTree::new("/t");
        let issues = vec![
            issue_at(&mut doc, Rect::new(0.0, 0.0, 32.0, 32.0)),
            issue_at(&mut doc, Rect::new(300.0, 0.0, 32.0, 32.0)),
        ];
        let markers = layout().place(&doc, &issues);
        assert_eq!(markers[0].rect.x, 0.0);
        assert_eq!(markers[1].rect.x, 300.0);
    }

    #[test]
    fn test_collision_window_is_bounded() {
        let mut doc = DocumentTree::new("/t");
        let rect = Rect::new(50.0, 50.0, 32.0, 32.0);
        // Five markers in a pile; only the previous three are considered.
        let issues: Vec<Issue> = (0..5).map(|_| issue_at(&mut doc, rect)).collect();
        let markers = layout().place(&doc, &issues);
        assert_eq!(markers.len(), 5);
        // The first marker never moves.
        assert_eq!(markers[0].rect.x, 50.0);
    }

    #[test]
    fn test_editable_region_uses_overlay_mode() {
        let mut doc = DocumentTree::new("/t");
        let region = doc.append_element(doc.root(), "div");
        doc.set_editable(region, true);
        let img = doc.append_element(region, "img");
        doc.set_rect(img, Rect::new(10.0, 10.0, 32.0, 32.0));
        let issues = vec![Issue::new(img, CheckKind::AltNull, "", Some("k".into()))];
        let markers = layout().place(&doc, &issues);
        assert_eq!(markers[0].mode, LayoutMode::Overlay);
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut doc = DocumentTree::new("/t");
        let issues = vec![
            issue_at(&mut doc, Rect::new(0.0, 0.0, 32.0, 32.0)),
            issue_at(&mut doc, Rect::new(100.0, 0.0, 32.0, 32.0)),
        ];
        let layout = layout();
        let mut set = MarkerSet::new();

        let first = set.sync(layout.place(&doc, &issues));
        assert_eq!(first.created, 2);

        let second = set.sync(layout.place(&doc, &issues));
        assert_eq!(second, SyncStats::default());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sync_removes_stale_markers() {
        let mut doc = DocumentTree::new("/t");
        let issues = vec![
            issue_at(&mut doc, Rect::new(0.0, 0.0, 32.0, 32.0)),
            issue_at(&mut doc, Rect::new(100.0, 0.0, 32.0, 32.0)),
        ];
        let layout = layout();
        let mut set = MarkerSet::new();
        set.sync(layout.place(&doc, &issues));

        let stats = set.sync(layout.place(&doc, &issues[..1]));
        assert_eq!(stats.removed, 1);
        assert_eq!(set.len(), 1);
    }
}
