//! The incremental recheck scheduler.
//!
//! Turns raw mutation intake into two debounced outputs: a cheap marker
//! reposition and a full incremental rescan. Guards against the two failure
//! modes of naive watching: re-flagging a node mid-edit (the recently-added
//! grace window) and rescanning on every micro-mutation (debounce inflated
//! by a rolling average of past scan durations).
//!
//! Time is passed in as explicit millisecond ticks, so every path is
//! deterministic under test.

use std::collections::VecDeque;

use ally_core::config::{CheckerConfig, WatchScope};
use ally_core::constants::RESCAN_LOAD_FACTOR;
use ally_core::{DocumentTree, MutationRecord, NodeId};
use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;

use super::debounce::Debounce;

/// Window of past scan durations feeding the debounce inflation.
const DURATION_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerAction {
    /// Re-measure and re-place existing markers.
    Reposition,
    /// Run a full incremental rescan.
    Rescan { forced: bool },
}

pub struct RecheckScheduler {
    watch_scope: WatchScope,
    roots: Vec<NodeId>,
    reposition: Debounce,
    rescan: Debounce,
    rescan_base_ms: u64,
    rescan_cap_ms: u64,
    grace_ms: u64,
    /// Recently added nodes and when they were queued.
    recent: FxHashMap<NodeId, u64>,
    /// xxh3 content hashes from the last time each node was observed;
    /// mutations that leave the hash unchanged never trigger a rescan.
    content_hashes: FxHashMap<NodeId, u64>,
    scan_durations: VecDeque<u64>,
    panel_open: bool,
    interaction_since_rescan: bool,
    force_next: bool,
    paused: bool,
}

impl RecheckScheduler {
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            watch_scope: config.effective_watch_scope(),
            roots: Vec::new(),
            reposition: Debounce::new(config.effective_reposition_debounce_ms()),
            rescan: Debounce::new(config.effective_rescan_debounce_ms()),
            rescan_base_ms: config.effective_rescan_debounce_ms(),
            rescan_cap_ms: config.effective_rescan_debounce_cap_ms(),
            grace_ms: config.effective_recent_node_grace_ms(),
            recent: FxHashMap::default(),
            content_hashes: FxHashMap::default(),
            scan_durations: VecDeque::with_capacity(DURATION_WINDOW),
            panel_open: false,
            interaction_since_rescan: false,
            force_next: false,
            paused: false,
        }
    }

    /// Restrict `CheckRoots` watching to these containers.
    pub fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    pub fn set_panel_open(&mut self, open: bool) {
        self.panel_open = open;
    }

    /// Record a `keyup`/`click` style user interaction.
    pub fn mark_interaction(&mut self) {
        self.interaction_since_rescan = true;
    }

    /// Pause intake around the engine's own document writes so marker
    /// insertion never observes itself as a user edit.
    pub fn pause_intake(&mut self) {
        self.paused = true;
    }

    pub fn resume_intake(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Feed one host-reported mutation.
    pub fn on_mutation(&mut self, doc: &DocumentTree, record: &MutationRecord, now: u64) {
        if self.paused || self.watch_scope == WatchScope::Disabled {
            return;
        }
        if self.watch_scope == WatchScope::CheckRoots && !self.in_roots(doc, record) {
            return;
        }

        // Every observed mutation may have moved things.
        self.reposition.schedule(now);

        match record {
            MutationRecord::ChildList { added, removed, .. } => {
                for &node in added {
                    self.recent.insert(node, now);
                    self.content_hashes
                        .insert(node, xxh3_64(doc.text_content(node).as_bytes()));
                }
                if !removed.is_empty() {
                    self.schedule_rescan(now);
                }
            }
            MutationRecord::CharacterData { target } => {
                let hash = xxh3_64(doc.text_content(*target).as_bytes());
                let changed = self.content_hashes.insert(*target, hash) != Some(hash);
                if changed && !self.recent.contains_key(target) {
                    self.schedule_rescan(now);
                }
            }
            MutationRecord::Attributes { .. } => {
                self.schedule_rescan(now);
            }
        }
    }

    /// Explicitly request a rescan that bypasses the skip rules.
    pub fn force_rescan(&mut self, now: u64) {
        self.force_next = true;
        self.schedule_rescan(now);
    }

    /// Feed the duration of a completed scan into the rolling average.
    pub fn record_scan_duration(&mut self, duration_ms: u64) {
        if self.scan_durations.len() == DURATION_WINDOW {
            self.scan_durations.pop_front();
        }
        self.scan_durations.push_back(duration_ms);
    }

    /// Advance time: process grace expiry, then fire due timers.
    pub fn tick(&mut self, doc: &DocumentTree, now: u64) -> Vec<SchedulerAction> {
        self.process_recent(doc, now);

        let mut actions = Vec::new();
        if self.reposition.fire(now) {
            actions.push(SchedulerAction::Reposition);
        }
        if self.rescan.fire(now) {
            let forced = self.force_next;
            if forced || self.panel_open || self.interaction_since_rescan {
                self.force_next = false;
                self.interaction_since_rescan = false;
                actions.push(SchedulerAction::Rescan { forced });
            } else {
                tracing::trace!("rescan skipped: panel closed, no interaction");
            }
        }
        actions
    }

    /// Number of nodes still inside their grace window.
    pub fn pending_recent(&self) -> usize {
        self.recent.len()
    }

    /// A queued node becomes eligible once it has non-empty text and sits
    /// outside the current selection; on grace expiry it is evicted and a
    /// rescan is forced regardless.
    fn process_recent(&mut self, doc: &DocumentTree, now: u64) {
        let selection = doc.selection();
        let grace_ms = self.grace_ms;
        let mut eligible = false;
        let mut expired = false;

        self.recent.retain(|&node, &mut queued_at| {
            if doc.is_detached(node) {
                return false;
            }
            let in_selection =
                selection.is_some_and(|sel| doc.is_inside(node, sel) || doc.is_inside(sel, node));
            if !doc.text_content(node).trim().is_empty() && !in_selection {
                eligible = true;
                return false;
            }
            if now.saturating_sub(queued_at) >= grace_ms {
                expired = true;
                return false;
            }
            true
        });

        if expired {
            self.force_next = true;
        }
        if eligible || expired {
            self.schedule_rescan(now);
        }
    }

    fn schedule_rescan(&mut self, now: u64) {
        self.rescan.schedule_with(now, self.rescan_delay());
    }

    /// Base debounce inflated under load by the rolling average of past
    /// scan durations, capped.
    fn rescan_delay(&self) -> u64 {
        if self.scan_durations.is_empty() {
            return self.rescan_base_ms;
        }
        let avg: u64 =
            self.scan_durations.iter().sum::<u64>() / self.scan_durations.len() as u64;
        (self.rescan_base_ms + avg * RESCAN_LOAD_FACTOR).min(self.rescan_cap_ms)
    }

    fn in_roots(&self, doc: &DocumentTree, record: &MutationRecord) -> bool {
        record
            .touched()
            .iter()
            .any(|&node| self.roots.iter().any(|&root| doc.is_inside(node, root)))
    }
}
