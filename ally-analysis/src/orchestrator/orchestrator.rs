//! The scan orchestrator: collect → test → aggregate → render.

use std::collections::VecDeque;

use ally_core::config::CheckerConfig;
use ally_core::dom::SelectorList;
use ally_core::traits::persistence::DismissalPersistence;
use ally_core::{
    CheckKind, CheckModule, CheckerError, DismissalAction, DocumentTree, NodeId,
};
use rustc_hash::FxHashSet;

use super::custom::{CustomTestBridge, CustomTestContributor};
use super::session::{ScanOutcome, ScanState};
use crate::checks::{CheckContext, CheckRegistry};
use crate::collector::{selector_matches_any, Collector};
use crate::store::ResultStore;

pub struct ScanOrchestrator {
    config: CheckerConfig,
    state: ScanState,
    registry: CheckRegistry,
    store: ResultStore,
    bridge: CustomTestBridge,
    tooltip_open: bool,
    /// Why the checker entered `Disabled`, replayed on re-entry attempts.
    disabled_reason: Option<(String, &'static str)>,
    /// Roots resolved by the last successful collection.
    roots: Vec<NodeId>,
}

impl ScanOrchestrator {
    pub fn new(config: CheckerConfig, persistence: Box<dyn DismissalPersistence>) -> Self {
        let mut disabled_kinds = FxHashSet::default();
        for name in &config.disabled_kinds {
            match CheckKind::parse_str(name) {
                Some(kind) => {
                    disabled_kinds.insert(kind);
                }
                None => tracing::warn!(kind = name.as_str(), "unknown disabled check kind"),
            }
        }
        let bridge = CustomTestBridge::new(config.effective_custom_test_count());
        Self {
            state: ScanState::Idle,
            registry: crate::checks::create_default_registry(),
            store: ResultStore::new(persistence, disabled_kinds),
            bridge,
            tooltip_open: false,
            disabled_reason: None,
            roots: Vec::new(),
            config,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ResultStore {
        &mut self.store
    }

    pub fn set_tooltip_open(&mut self, open: bool) {
        self.tooltip_open = open;
    }

    pub fn contributor(&self) -> CustomTestContributor {
        self.bridge.contributor()
    }

    /// The page identity dismissals are recorded under.
    pub fn page_for(&self, doc: &DocumentTree) -> String {
        self.config
            .current_page
            .clone()
            .unwrap_or_else(|| doc.page_path().to_string())
    }

    /// Exit `Disabled`. Called by dismissal actions, which force one more
    /// scan after re-enabling.
    pub fn re_enable(&mut self) {
        if self.state == ScanState::Disabled {
            self.state = ScanState::Idle;
            self.disabled_reason = None;
        }
    }

    /// Run one full pipeline pass.
    ///
    /// The rendered outcome always carries the counts aggregated by this
    /// same pass; re-entrant calls are rejected while a pass is running.
    pub fn run_scan(
        &mut self,
        doc: &mut DocumentTree,
        incremental: bool,
    ) -> Result<ScanOutcome, CheckerError> {
        match self.state {
            ScanState::Idle => {}
            ScanState::Disabled => {
                let (selector, condition) = self
                    .disabled_reason
                    .clone()
                    .unwrap_or((String::new(), "disabled"));
                return Err(CheckerError::CheckingPrevented {
                    selector,
                    condition,
                });
            }
            _ => return Err(CheckerError::ScanInProgress),
        }
        if self.tooltip_open {
            return Err(CheckerError::TooltipOpen);
        }
        if let Err(err) = self.check_prevented(doc) {
            self.state = ScanState::Disabled;
            tracing::warn!(error = %err, "checking prevented; checker disabled");
            return Err(err);
        }

        self.state = ScanState::Collecting;
        let collector = match Collector::from_config(doc, &self.config) {
            Ok(collector) => collector,
            Err(err) => {
                self.state = ScanState::Disabled;
                self.disabled_reason =
                    Some((self.config.effective_root_selector().to_string(), "missing"));
                return Err(err);
            }
        };
        self.roots = collector.roots().to_vec();
        let elements = collector.collect_all(doc);

        self.state = ScanState::Testing;
        // Fixed order, but each module runs as its own queued unit so a
        // panicking or slow module cannot take the rest down with it.
        let mut queue: VecDeque<CheckModule> = CheckModule::all().iter().copied().collect();
        let ctx = CheckContext {
            doc,
            elements: &elements,
        };
        let mut issues = Vec::new();
        while let Some(module) = queue.pop_front() {
            issues.extend(self.registry.run_module(module, &ctx));
        }
        if self.bridge.expected() > 0 {
            let report = self.bridge.collect(self.config.effective_custom_test_timeout_ms());
            if report.missing > 0 {
                let err = CheckerError::CustomTestTimeout {
                    waited_ms: report.waited_ms,
                    missing: report.missing,
                };
                tracing::warn!(error = %err, "proceeding without missing custom tests");
            }
            issues.extend(report.issues);
        }

        self.state = ScanState::Aggregating;
        self.store.begin_scan();
        self.store.absorb(issues);
        self.store.finalize(doc);
        let page = self.page_for(doc);
        let counts = self.store.count_alerts(&page, self.ignore_all_active(doc));

        self.state = ScanState::Rendering;
        let outcome = ScanOutcome {
            counts,
            incremental,
        };
        self.state = ScanState::Idle;
        tracing::debug!(
            total = counts.total,
            errors = counts.errors,
            warnings = counts.warnings,
            dismissed = counts.dismissed,
            incremental,
            "scan completed"
        );
        Ok(outcome)
    }

    /// Apply a dismissal action, honoring the configured permissions.
    /// A dismissal while `Disabled` re-enables the checker.
    pub fn dismiss(
        &mut self,
        page: &str,
        kind: CheckKind,
        key: &str,
        action: DismissalAction,
    ) -> Result<(), CheckerError> {
        match action {
            DismissalAction::Ok if !self.config.effective_allow_ok() => {
                return Err(CheckerError::Config {
                    message: "marking alerts OK is not permitted".to_string(),
                });
            }
            DismissalAction::Hide if !self.config.effective_allow_hide() => {
                return Err(CheckerError::Config {
                    message: "hiding alerts is not permitted".to_string(),
                });
            }
            _ => {}
        }
        if let Err(err) = self.store.dismiss_one(page, kind, key, action) {
            tracing::warn!(error = %err, "dismissal flush failed; in-memory state kept");
        }
        self.re_enable();
        Ok(())
    }

    fn check_prevented(&mut self, doc: &DocumentTree) -> Result<(), CheckerError> {
        if let Some(selector) = &self.config.prevent_checking_if_present {
            if selector_matches_any(doc, &SelectorList::parse_lossy(selector)) {
                self.disabled_reason = Some((selector.clone(), "present"));
                return Err(CheckerError::CheckingPrevented {
                    selector: selector.clone(),
                    condition: "present",
                });
            }
        }
        if let Some(selector) = &self.config.prevent_checking_if_absent {
            if !selector_matches_any(doc, &SelectorList::parse_lossy(selector)) {
                self.disabled_reason = Some((selector.clone(), "absent"));
                return Err(CheckerError::CheckingPrevented {
                    selector: selector.clone(),
                    condition: "absent",
                });
            }
        }
        Ok(())
    }

    fn ignore_all_active(&self, doc: &DocumentTree) -> bool {
        if let Some(selector) = &self.config.ignore_all_if_present {
            if selector_matches_any(doc, &SelectorList::parse_lossy(selector)) {
                return true;
            }
        }
        if let Some(selector) = &self.config.ignore_all_if_absent {
            if !selector_matches_any(doc, &SelectorList::parse_lossy(selector)) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ally_core::traits::persistence::test_helpers::MemoryPersistence;

    fn orchestrator(config: CheckerConfig) -> ScanOrchestrator {
        ScanOrchestrator::new(config, Box::new(MemoryPersistence::new()))
    }

    fn doc_with_bad_image() -> DocumentTree {
        let mut doc = DocumentTree::new("/page");
        let img = doc.append_element(doc.root(), "img");
        doc.set_attr(img, "src", "/x.png");
        doc
    }

    #[test]
    fn test_scan_produces_counts() {
        let mut doc = doc_with_bad_image();
        let mut orch = orchestrator(CheckerConfig::default());
        let outcome = orch.run_scan(&mut doc, false).unwrap();
        assert_eq!(outcome.counts.errors, 1);
        assert_eq!(outcome.counts.total, 1);
        assert_eq!(orch.state(), ScanState::Idle);
    }

    #[test]
    fn test_scan_rejected_while_tooltip_open() {
        let mut doc = doc_with_bad_image();
        let mut orch = orchestrator(CheckerConfig::default());
        orch.set_tooltip_open(true);
        assert!(matches!(
            orch.run_scan(&mut doc, false),
            Err(CheckerError::TooltipOpen)
        ));
    }

    #[test]
    fn test_prevent_checking_disables_until_dismissal() {
        let mut doc = doc_with_bad_image();
        let gate = doc.append_element(doc.root(), "div");
        doc.set_attr(gate, "class", "no-check");

        let mut cfg = CheckerConfig::default();
        cfg.prevent_checking_if_present = Some(".no-check".to_string());
        let mut orch = orchestrator(cfg);

        assert!(matches!(
            orch.run_scan(&mut doc, false),
            Err(CheckerError::CheckingPrevented { .. })
        ));
        assert_eq!(orch.state(), ScanState::Disabled);

        // Still disabled on re-entry, even after the gate is gone.
        doc.remove_node(gate);
        assert!(orch.run_scan(&mut doc, false).is_err());

        // A dismissal action re-enables.
        orch.dismiss("/page", CheckKind::AltNull, "k", DismissalAction::Ok)
            .unwrap();
        assert_eq!(orch.state(), ScanState::Idle);
        assert!(orch.run_scan(&mut doc, false).is_ok());
    }

    #[test]
    fn test_missing_root_disables() {
        let mut doc = DocumentTree::new("/page");
        let mut cfg = CheckerConfig::default();
        cfg.root_selector = Some("main".to_string());
        let mut orch = orchestrator(cfg);
        assert!(matches!(
            orch.run_scan(&mut doc, false),
            Err(CheckerError::NoRootContainer { .. })
        ));
        assert_eq!(orch.state(), ScanState::Disabled);
    }

    #[test]
    fn test_ignore_all_folds_counts() {
        let mut doc = doc_with_bad_image();
        let badge = doc.append_element(doc.root(), "div");
        doc.set_attr(badge, "id", "draft-mode");

        let mut cfg = CheckerConfig::default();
        cfg.ignore_all_if_present = Some("#draft-mode".to_string());
        let mut orch = orchestrator(cfg);
        let outcome = orch.run_scan(&mut doc, false).unwrap();
        assert_eq!(outcome.counts.total, 0);
        assert_eq!(outcome.counts.dismissed, 1);
    }

    #[test]
    fn test_custom_tests_merge_before_aggregation() {
        let mut doc = doc_with_bad_image();
        let mut cfg = CheckerConfig::default();
        cfg.custom_test_count = Some(1);
        cfg.custom_test_timeout_ms = Some(50);
        let mut orch = orchestrator(cfg);

        let img = doc.query(
            &SelectorList::parse_lossy("img"),
            &[doc.root()],
        )[0];
        orch.contributor().report(vec![crate::store::issue::Issue::new(
            img,
            ally_core::CheckKind::EmbedCustom,
            "host-supplied",
            Some("hostkey".to_string()),
        )]);
        let outcome = orch.run_scan(&mut doc, false).unwrap();
        assert_eq!(outcome.counts.total, 2);
    }

    #[test]
    fn test_custom_test_timeout_proceeds() {
        let mut doc = doc_with_bad_image();
        let mut cfg = CheckerConfig::default();
        cfg.custom_test_count = Some(1);
        cfg.custom_test_timeout_ms = Some(10);
        let mut orch = orchestrator(cfg);
        let outcome = orch.run_scan(&mut doc, false).unwrap();
        assert_eq!(outcome.counts.total, 1);
    }

    #[test]
    fn test_scan_idempotent_on_unchanged_tree() {
        let mut doc = doc_with_bad_image();
        let img2 = doc.append_element(doc.root(), "img");
        doc.set_attr(img2, "src", "/y.png");
        doc.set_attr(img2, "alt", "placeholder");

        let mut orch = orchestrator(CheckerConfig::default());
        orch.run_scan(&mut doc, false).unwrap();
        let first: Vec<_> = orch.store().issues().to_vec();
        orch.run_scan(&mut doc, false).unwrap();
        assert_eq!(orch.store().issues(), first.as_slice());
    }

    #[test]
    fn test_dismissal_permissions() {
        let mut cfg = CheckerConfig::default();
        cfg.allow_hide = Some(false);
        let mut orch = orchestrator(cfg);
        assert!(orch
            .dismiss("/p", CheckKind::AltNull, "k", DismissalAction::Hide)
            .is_err());
        assert!(orch
            .dismiss("/p", CheckKind::AltNull, "k", DismissalAction::Ok)
            .is_ok());
    }
}
