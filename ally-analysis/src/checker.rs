//! The engine facade.
//!
//! Owns the orchestrator, the recheck scheduler, the marker layout, the
//! jump list, and the event dispatcher. Hosts drive it with explicit
//! inputs: mutations, interactions, millisecond ticks, and panel/tooltip
//! actions. Everything runs on the caller's thread.

use std::sync::Arc;
use std::time::Instant;

use ally_core::config::{AlertMode, CheckerConfig};
use ally_core::events::IssueRef;
use ally_core::traits::persistence::DismissalPersistence;
use ally_core::{
    AlertCounts, CheckKind, CheckerError, CheckerEvent, CheckerEventHandler, DismissalAction,
    DocumentTree, EventDispatcher, MutationRecord,
};

use crate::jump::{JumpEntry, JumpList};
use crate::layout::{MarkerLayout, MarkerSet};
use crate::orchestrator::{CustomTestContributor, ScanOrchestrator, ScanOutcome, ScanState};
use crate::scheduler::{RecheckScheduler, SchedulerAction};
use crate::store::issue::Issue;

pub struct Checker {
    alert_mode: AlertMode,
    orchestrator: ScanOrchestrator,
    scheduler: RecheckScheduler,
    layout: MarkerLayout,
    markers: MarkerSet,
    jump: JumpList,
    dispatcher: EventDispatcher,
    panel_open: bool,
    open_tooltip: Option<IssueRef>,
    last_counts: Option<AlertCounts>,
}

impl Checker {
    pub fn new(config: CheckerConfig, persistence: Box<dyn DismissalPersistence>) -> Self {
        Self {
            alert_mode: config.effective_alert_mode(),
            scheduler: RecheckScheduler::new(&config),
            layout: MarkerLayout::new(&config),
            orchestrator: ScanOrchestrator::new(config, persistence),
            markers: MarkerSet::new(),
            jump: JumpList::default(),
            dispatcher: EventDispatcher::new(),
            panel_open: false,
            open_tooltip: None,
            last_counts: None,
        }
    }

    pub fn register_handler(&mut self, handler: Arc<dyn CheckerEventHandler>) {
        self.dispatcher.register(handler);
    }

    pub fn contributor(&self) -> CustomTestContributor {
        self.orchestrator.contributor()
    }

    pub fn state(&self) -> ScanState {
        self.orchestrator.state()
    }

    pub fn counts(&self) -> Option<AlertCounts> {
        self.last_counts
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Run a full scan, render, and announce the results.
    pub fn scan(&mut self, doc: &mut DocumentTree) -> Result<AlertCounts, CheckerError> {
        let started = Instant::now();
        let outcome = self.orchestrator.run_scan(doc, false)?;
        self.scheduler
            .record_scan_duration(started.elapsed().as_millis() as u64);
        self.scheduler.set_roots(self.orchestrator.roots().to_vec());
        self.render(doc, outcome);
        self.maybe_auto_open(doc, outcome.counts);
        Ok(outcome.counts)
    }

    /// Feed one host-reported document mutation.
    pub fn on_mutation(&mut self, doc: &DocumentTree, record: &MutationRecord, now: u64) {
        self.scheduler.on_mutation(doc, record, now);
    }

    /// Record a `keyup`/`click` style user interaction.
    pub fn on_interaction(&mut self) {
        self.scheduler.mark_interaction();
    }

    /// Advance the cooperative timeline: fire due debounces, reposition
    /// markers, and run incremental rescans.
    pub fn tick(&mut self, doc: &mut DocumentTree, now: u64) {
        for action in self.scheduler.tick(doc, now) {
            match action {
                SchedulerAction::Reposition => self.reposition(doc),
                SchedulerAction::Rescan { forced } => {
                    let started = Instant::now();
                    match self.orchestrator.run_scan(doc, true) {
                        Ok(outcome) => {
                            self.scheduler
                                .record_scan_duration(started.elapsed().as_millis() as u64);
                            self.render(doc, outcome);
                        }
                        Err(err) => {
                            tracing::debug!(error = %err, forced, "incremental rescan rejected");
                        }
                    }
                }
            }
        }
    }

    pub fn open_panel(&mut self) {
        if self.panel_open {
            return;
        }
        self.panel_open = true;
        self.scheduler.set_panel_open(true);
        self.rebuild_jump_list();
        self.dispatcher.dispatch(&CheckerEvent::PanelOpened);
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.scheduler.set_panel_open(false);
    }

    /// Open a detail tooltip; full scans are rejected while one is open.
    pub fn open_tooltip(&mut self, issue: IssueRef) {
        self.orchestrator.set_tooltip_open(true);
        self.open_tooltip = Some(issue.clone());
        self.dispatcher
            .dispatch(&CheckerEvent::TooltipOpened { issue });
    }

    pub fn close_tooltip(&mut self) {
        self.orchestrator.set_tooltip_open(false);
        if let Some(issue) = self.open_tooltip.take() {
            self.dispatcher
                .dispatch(&CheckerEvent::TooltipClosed { issue });
        }
    }

    /// Apply a dismissal action, announce it, and force one more scan.
    pub fn dismiss(
        &mut self,
        doc: &mut DocumentTree,
        kind: CheckKind,
        key: &str,
        action: DismissalAction,
        now: u64,
    ) -> Result<(), CheckerError> {
        let page = self.orchestrator.page_for(doc);
        self.close_tooltip();
        self.orchestrator.dismiss(&page, kind, key, action)?;
        self.dispatcher.dispatch(&CheckerEvent::DismissalUpdated {
            page,
            kind,
            key: key.to_string(),
            action,
        });

        // One forced scan so the new status is reflected immediately.
        if let Ok(outcome) = self.orchestrator.run_scan(doc, true) {
            self.render(doc, outcome);
        }
        self.scheduler.force_rescan(now);
        self.rebuild_jump_list();
        Ok(())
    }

    /// Step to the next visible issue, wrapping around.
    pub fn next_issue(&mut self) -> Option<JumpEntry> {
        self.jump.next().cloned()
    }

    /// Step to the previous visible issue, wrapping around.
    pub fn previous_issue(&mut self) -> Option<JumpEntry> {
        self.jump.previous().cloned()
    }

    pub fn jump_list(&self) -> &JumpList {
        &self.jump
    }

    fn show_dismissed(&self) -> bool {
        self.alert_mode == AlertMode::ShowDismissed
    }

    fn visible_issues(&self) -> Vec<Issue> {
        let show_dismissed = self.show_dismissed();
        self.orchestrator
            .store()
            .issues()
            .iter()
            .filter(|issue| show_dismissed || !issue.is_dismissed())
            .cloned()
            .collect()
    }

    /// Re-measure and re-place existing markers without re-running checks.
    fn reposition(&mut self, doc: &DocumentTree) {
        let issues = self.visible_issues();
        let placed = self.layout.place(doc, &issues);
        self.sync_markers(placed);
    }

    /// Render a scan outcome. Idempotent: unchanged issues only refresh
    /// marker attributes, they never re-create markers.
    fn render(&mut self, doc: &DocumentTree, outcome: ScanOutcome) {
        if self.alert_mode == AlertMode::Headless {
            self.last_counts = Some(outcome.counts);
            self.dispatcher.dispatch(&CheckerEvent::ScanCompleted {
                counts: outcome.counts,
                incremental: outcome.incremental,
            });
            return;
        }
        let issues = self.visible_issues();
        let placed = self.layout.place(doc, &issues);
        self.sync_markers(placed);
        self.last_counts = Some(outcome.counts);
        self.dispatcher.dispatch(&CheckerEvent::ScanCompleted {
            counts: outcome.counts,
            incremental: outcome.incremental,
        });
    }

    /// Marker writes are the engine's own mutations; intake is paused so
    /// the scheduler never observes them as user edits.
    fn sync_markers(&mut self, placed: Vec<crate::layout::Marker>) {
        self.scheduler.pause_intake();
        let stats = self.markers.sync(placed);
        self.scheduler.resume_intake();
        if stats != Default::default() {
            tracing::trace!(
                created = stats.created,
                updated = stats.updated,
                removed = stats.removed,
                "markers synced"
            );
        }
    }

    fn rebuild_jump_list(&mut self) {
        self.jump = JumpList::rebuild(
            self.orchestrator.store().issues(),
            self.show_dismissed(),
        );
    }

    /// Decide whether a completed full scan auto-opens the panel.
    fn maybe_auto_open(&mut self, doc: &DocumentTree, counts: AlertCounts) {
        let open = match self.alert_mode {
            AlertMode::Active | AlertMode::ShowDismissed => counts.total > 0,
            AlertMode::Assertive => {
                let page = self.orchestrator.page_for(doc);
                self.orchestrator.store().has_new_alerts(&page, counts.total)
            }
            AlertMode::Headless | AlertMode::Polite | AlertMode::UserPreference => false,
        };
        if open {
            self.open_panel();
        }
    }
}
