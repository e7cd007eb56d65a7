//! Result aggregation and the dismissal engine.

use ally_core::traits::persistence::{DismissalPersistence, DismissalRow};
use ally_core::{AlertCounts, CheckKind, DismissalAction, DocumentTree, StorageError};
use rustc_hash::FxHashSet;

use super::dismissal::DismissalMap;
use super::issue::Issue;

/// Aggregates the issues from one scan and resolves them against the
/// persisted dismissal map.
pub struct ResultStore {
    issues: Vec<Issue>,
    dismissals: DismissalMap,
    disabled_kinds: FxHashSet<CheckKind>,
    persistence: Box<dyn DismissalPersistence>,
}

impl ResultStore {
    /// Load the dismissal map once from the adapter. A failed load starts
    /// with an empty map rather than failing initialization.
    pub fn new(
        persistence: Box<dyn DismissalPersistence>,
        disabled_kinds: FxHashSet<CheckKind>,
    ) -> Self {
        let dismissals = match persistence.load_all() {
            Ok(rows) => DismissalMap::from_rows(rows),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load dismissals; starting empty");
                DismissalMap::new()
            }
        };
        Self {
            issues: Vec::new(),
            dismissals,
            disabled_kinds,
            persistence,
        }
    }

    /// Drop the previous scan's issues. Called at the start of every scan.
    pub fn begin_scan(&mut self) {
        self.issues.clear();
    }

    pub fn absorb(&mut self, issues: Vec<Issue>) {
        self.issues.extend(issues);
    }

    /// Assign document-order sort positions and scrollable parents, then
    /// order the set. Runs once per scan, after all modules have reported.
    pub fn finalize(&mut self, doc: &DocumentTree) {
        let positions = doc.document_positions();
        for issue in &mut self.issues {
            issue.sort_pos = positions.get(&issue.element).copied().unwrap_or(u32::MAX);
            issue.scrollable_parent = doc.scrollable_parent(issue.element);
        }
        self.issues
            .sort_by_key(|issue| (issue.sort_pos, issue.kind.name()));
    }

    /// Resolve dismissal statuses and count alerts.
    ///
    /// Iterates back-to-front so in-place removal of globally ignored kinds
    /// stays index-safe. Exactly one of {dismissed, warning, error} is
    /// incremented per surviving issue; `errors + warnings == total` while
    /// `dismissed` is tracked independently. An active ignore-all condition
    /// folds everything into `dismissed` without touching the map.
    pub fn count_alerts(&mut self, page: &str, ignore_all: bool) -> AlertCounts {
        let mut counts = AlertCounts::default();
        for i in (0..self.issues.len()).rev() {
            if self.disabled_kinds.contains(&self.issues[i].kind) {
                self.issues.remove(i);
                continue;
            }
            let issue = &mut self.issues[i];
            issue.dismissal_status = match &issue.dismissal_key {
                Some(key) => self.dismissals.get(page, issue.kind, key),
                None => None,
            };
            if issue.dismissal_status.is_some() {
                counts.dismissed += 1;
            } else if issue.is_error() {
                counts.errors += 1;
            } else {
                counts.warnings += 1;
            }
        }
        counts.total = counts.errors + counts.warnings;

        if ignore_all {
            counts.dismissed += counts.total;
            counts.total = 0;
            counts.errors = 0;
            counts.warnings = 0;
        }
        counts
    }

    /// Apply one dismissal action and flush it through the adapter.
    ///
    /// The in-memory map is updated first; a flush failure is reported but
    /// never rolls the map back.
    pub fn dismiss_one(
        &mut self,
        page: &str,
        kind: CheckKind,
        key: &str,
        action: DismissalAction,
    ) -> Result<(), StorageError> {
        match action.as_status() {
            Some(status) => {
                self.dismissals.set(page, kind, key, status);
                self.persistence.upsert(&DismissalRow {
                    page: page.to_string(),
                    kind,
                    key: key.to_string(),
                    status,
                })
            }
            None => {
                self.dismissals.remove(page, kind, key);
                self.persistence.delete(page, kind, key)
            }
        }
    }

    /// Whether a page's total exceeds its last recorded total ("new since
    /// last visit"); records the new total either way.
    pub fn has_new_alerts(&self, page: &str, total: usize) -> bool {
        let seen = match self.persistence.load_seen_total(page) {
            Ok(seen) => seen,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read seen total");
                None
            }
        };
        if let Err(err) = self.persistence.save_seen_total(page, total as i64) {
            tracing::warn!(error = %err, "failed to record seen total");
        }
        seen.map_or(total > 0, |last| (total as i64) > last)
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issues_mut(&mut self) -> &mut [Issue] {
        &mut self.issues
    }

    pub fn dismissals(&self) -> &DismissalMap {
        &self.dismissals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ally_core::traits::persistence::test_helpers::MemoryPersistence;
    use ally_core::NodeId;

    fn store() -> ResultStore {
        ResultStore::new(Box::new(MemoryPersistence::new()), FxHashSet::default())
    }

    fn issue(kind: CheckKind, key: Option<&str>) -> Issue {
        Issue::new(NodeId(1), kind, "x", key.map(str::to_string))
    }

    #[test]
    fn test_counting_invariant() {
        let mut store = store();
        store.absorb(vec![
            issue(CheckKind::AltMissing, None),
            issue(CheckKind::AltNull, Some("k1")),
            issue(CheckKind::AltLong, Some("k2")),
        ]);
        let counts = store.count_alerts("/p", false);
        assert_eq!(counts.errors, 1);
        assert_eq!(counts.warnings, 2);
        assert_eq!(counts.total, counts.errors + counts.warnings);
        assert_eq!(counts.dismissed, 0);
    }

    #[test]
    fn test_dismissed_issue_leaves_total() {
        let mut store = store();
        store.absorb(vec![issue(CheckKind::AltNull, Some("k1"))]);
        store
            .dismiss_one("/p", CheckKind::AltNull, "k1", DismissalAction::Ok)
            .unwrap();
        let counts = store.count_alerts("/p", false);
        assert_eq!(counts.total, 0);
        assert_eq!(counts.dismissed, 1);
    }

    #[test]
    fn test_dismissal_for_other_kind_does_not_suppress() {
        let mut store = store();
        store.absorb(vec![issue(CheckKind::AltLong, Some("k1"))]);
        store
            .dismiss_one("/p", CheckKind::AltNull, "k1", DismissalAction::Ok)
            .unwrap();
        let counts = store.count_alerts("/p", false);
        assert_eq!(counts.warnings, 1);
        assert_eq!(counts.dismissed, 0);
    }

    #[test]
    fn test_globally_ignored_kind_removed_in_place() {
        let mut disabled = FxHashSet::default();
        disabled.insert(CheckKind::EmbedCustom);
        let mut store =
            ResultStore::new(Box::new(MemoryPersistence::new()), disabled);
        store.absorb(vec![
            issue(CheckKind::EmbedCustom, Some("a")),
            issue(CheckKind::AltNull, Some("b")),
            issue(CheckKind::EmbedCustom, Some("c")),
        ]);
        let counts = store.count_alerts("/p", false);
        assert_eq!(counts.total, 1);
        assert_eq!(store.issues().len(), 1);
    }

    #[test]
    fn test_ignore_all_folds_into_dismissed() {
        let mut store = store();
        store.absorb(vec![
            issue(CheckKind::AltMissing, None),
            issue(CheckKind::AltNull, Some("k")),
        ]);
        let counts = store.count_alerts("/p", true);
        assert_eq!(counts.total, 0);
        assert_eq!(counts.errors, 0);
        assert_eq!(counts.warnings, 0);
        assert_eq!(counts.dismissed, 2);
        assert!(store.dismissals().is_empty());
    }

    #[test]
    fn test_dismiss_round_trip_restores_map() {
        let mut store = store();
        let before = store.dismissals().clone();
        store
            .dismiss_one("/p", CheckKind::AltNull, "k", DismissalAction::Ok)
            .unwrap();
        store
            .dismiss_one("/p", CheckKind::AltNull, "k", DismissalAction::Reset)
            .unwrap();
        assert_eq!(store.dismissals(), &before);
    }

    #[test]
    fn test_new_alerts_since_last_visit() {
        let store = store();
        assert!(store.has_new_alerts("/p", 3));
        assert!(!store.has_new_alerts("/p", 3));
        assert!(store.has_new_alerts("/p", 4));
        assert!(!store.has_new_alerts("/p", 2));
    }
}
