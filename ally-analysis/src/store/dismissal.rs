//! The in-memory dismissal map.
//!
//! Nested page → kind → key → status. The map never retains empty leaves:
//! removing the last key under a (page, kind) pair removes the now-empty
//! nested maps as well.

use ally_core::traits::persistence::DismissalRow;
use ally_core::{CheckKind, DismissalStatus};
use rustc_hash::FxHashMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DismissalMap {
    pages: FxHashMap<String, FxHashMap<CheckKind, FxHashMap<String, DismissalStatus>>>,
}

impl DismissalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted rows, loaded once at initialization.
    pub fn from_rows(rows: Vec<DismissalRow>) -> Self {
        let mut map = Self::new();
        for row in rows {
            map.set(&row.page, row.kind, &row.key, row.status);
        }
        map
    }

    /// Flatten for persistence or external sync.
    pub fn to_rows(&self) -> Vec<DismissalRow> {
        let mut rows = Vec::new();
        for (page, kinds) in &self.pages {
            for (kind, keys) in kinds {
                for (key, status) in keys {
                    rows.push(DismissalRow {
                        page: page.clone(),
                        kind: *kind,
                        key: key.clone(),
                        status: *status,
                    });
                }
            }
        }
        rows
    }

    pub fn get(&self, page: &str, kind: CheckKind, key: &str) -> Option<DismissalStatus> {
        self.pages.get(page)?.get(&kind)?.get(key).copied()
    }

    pub fn set(&mut self, page: &str, kind: CheckKind, key: &str, status: DismissalStatus) {
        self.pages
            .entry(page.to_string())
            .or_default()
            .entry(kind)
            .or_default()
            .insert(key.to_string(), status);
    }

    /// Delete one record, pruning empty nested maps.
    pub fn remove(&mut self, page: &str, kind: CheckKind, key: &str) -> bool {
        let Some(kinds) = self.pages.get_mut(page) else {
            return false;
        };
        let Some(keys) = kinds.get_mut(&kind) else {
            return false;
        };
        let removed = keys.remove(key).is_some();
        if keys.is_empty() {
            kinds.remove(&kind);
        }
        if kinds.is_empty() {
            self.pages.remove(page);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of stored records across all pages.
    pub fn record_count(&self) -> usize {
        self.pages
            .values()
            .flat_map(|kinds| kinds.values())
            .map(FxHashMap::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_leaves_map_identical() {
        let mut map = DismissalMap::new();
        map.set("/a", CheckKind::AltNull, "k1", DismissalStatus::Ok);
        let before = map.clone();

        map.set("/a", CheckKind::AltLong, "k2", DismissalStatus::Hide);
        assert!(map.remove("/a", CheckKind::AltLong, "k2"));
        assert_eq!(map, before);
    }

    #[test]
    fn test_no_empty_leaves_after_last_removal() {
        let mut map = DismissalMap::new();
        map.set("/a", CheckKind::AltNull, "k", DismissalStatus::Ok);
        map.remove("/a", CheckKind::AltNull, "k");
        assert!(map.is_empty());
        assert_eq!(map, DismissalMap::new());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut map = DismissalMap::new();
        assert!(!map.remove("/a", CheckKind::AltNull, "k"));
        map.set("/a", CheckKind::AltNull, "k", DismissalStatus::Ok);
        assert!(!map.remove("/a", CheckKind::AltLong, "k"));
        assert_eq!(map.record_count(), 1);
    }

    #[test]
    fn test_rows_round_trip() {
        let mut map = DismissalMap::new();
        map.set("/a", CheckKind::AltNull, "k1", DismissalStatus::Ok);
        map.set("/b", CheckKind::LinkDocument, "k2", DismissalStatus::Hide);
        assert_eq!(DismissalMap::from_rows(map.to_rows()), map);
    }
}
