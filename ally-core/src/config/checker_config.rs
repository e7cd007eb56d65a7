//! `CheckerConfig` — every field optional, defaults resolved once at
//! construction via the `effective_*` accessors.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::CheckerError;

/// How alerts are surfaced by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AlertMode {
    /// Run checks, emit events, render nothing.
    Headless,
    /// Follow the reviewer's saved preference.
    #[default]
    UserPreference,
    Polite,
    Assertive,
    /// Panel always opens when alerts exist.
    Active,
    /// Like Active, but dismissed alerts are shown too.
    ShowDismissed,
}

/// What the mutation watcher observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WatchScope {
    /// Watch the whole document.
    #[default]
    Document,
    /// No mutation watching; rescans only on explicit request.
    Disabled,
    /// Watch only the declared check roots.
    CheckRoots,
}

/// Configuration for the checker. All fields are optional; defaults are
/// supplied by the `effective_*` accessors.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CheckerConfig {
    /// Selector for the root containers to check. Default: "body".
    pub root_selector: Option<String>,
    /// Global ignore selector, applied by every category.
    pub ignore: Option<String>,
    /// Per-category ignore selectors, keyed by category name
    /// (e.g. "image", "link").
    #[serde(default)]
    pub ignore_by_category: BTreeMap<String, String>,
    /// Check kinds to disable entirely (stable string names).
    #[serde(default)]
    pub disabled_kinds: Vec<String>,
    /// Selector list for shadow components to recurse into. When unset and
    /// `detect_shadow` is true, hosts are auto-detected by probing.
    pub shadow_components: Option<String>,
    /// Auto-detect open shadow roots. Default: true.
    pub detect_shadow: Option<bool>,
    /// Alert display mode. Default: userPreference.
    pub alert_mode: Option<AlertMode>,
    /// Whether reviewers may hide alerts for themselves. Default: true.
    pub allow_hide: Option<bool>,
    /// Whether reviewers may mark alerts OK for everyone. Default: true.
    pub allow_ok: Option<bool>,
    /// Route dismissal persistence through the external sync channel
    /// instead of local storage. Default: false.
    pub external_sync: Option<bool>,
    /// Override for the current page identifier. Default: the document's
    /// page path.
    pub current_page: Option<String>,
    /// Mutation-watch scope. Default: document.
    pub watch_scope: Option<WatchScope>,
    /// Theme tokens, passed through to the host UI untouched.
    #[serde(default)]
    pub theme: BTreeMap<String, String>,
    /// Number of externally contributed async test phases expected before
    /// aggregation. Default: 0.
    pub custom_test_count: Option<usize>,
    /// Checking is prevented while this selector matches anything.
    pub prevent_checking_if_present: Option<String>,
    /// Checking is prevented while this selector matches nothing.
    pub prevent_checking_if_absent: Option<String>,
    /// All alerts fold into "dismissed" while this selector matches.
    pub ignore_all_if_present: Option<String>,
    /// All alerts fold into "dismissed" while this selector matches nothing.
    pub ignore_all_if_absent: Option<String>,

    // Timing/layout constants, overridable but rarely overridden.
    pub recent_node_grace_ms: Option<u64>,
    pub rescan_debounce_ms: Option<u64>,
    pub rescan_debounce_cap_ms: Option<u64>,
    pub reposition_debounce_ms: Option<u64>,
    pub custom_test_timeout_ms: Option<u64>,
    pub marker_collision_window: Option<usize>,
    pub marker_nudge_px: Option<f32>,
    pub marker_overlap_px: Option<f32>,
}

impl CheckerConfig {
    /// Parse from a TOML string.
    pub fn from_toml(input: &str) -> Result<Self, CheckerError> {
        toml::from_str(input).map_err(|e| CheckerError::Config {
            message: e.to_string(),
        })
    }

    /// Load `ally.toml` from a directory, falling back to defaults when the
    /// file does not exist.
    pub fn load(root: &Path) -> Result<Self, CheckerError> {
        let path = root.join("ally.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| CheckerError::Config {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    pub fn effective_root_selector(&self) -> &str {
        self.root_selector.as_deref().unwrap_or("body")
    }

    pub fn effective_detect_shadow(&self) -> bool {
        self.detect_shadow.unwrap_or(true)
    }

    pub fn effective_alert_mode(&self) -> AlertMode {
        self.alert_mode.unwrap_or_default()
    }

    pub fn effective_allow_hide(&self) -> bool {
        self.allow_hide.unwrap_or(true)
    }

    pub fn effective_allow_ok(&self) -> bool {
        self.allow_ok.unwrap_or(true)
    }

    pub fn effective_external_sync(&self) -> bool {
        self.external_sync.unwrap_or(false)
    }

    pub fn effective_watch_scope(&self) -> WatchScope {
        self.watch_scope.unwrap_or_default()
    }

    pub fn effective_custom_test_count(&self) -> usize {
        self.custom_test_count.unwrap_or(0)
    }

    pub fn effective_recent_node_grace_ms(&self) -> u64 {
        self.recent_node_grace_ms
            .unwrap_or(constants::RECENT_NODE_GRACE_MS)
    }

    pub fn effective_rescan_debounce_ms(&self) -> u64 {
        self.rescan_debounce_ms
            .unwrap_or(constants::RESCAN_DEBOUNCE_MS)
    }

    pub fn effective_rescan_debounce_cap_ms(&self) -> u64 {
        self.rescan_debounce_cap_ms
            .unwrap_or(constants::RESCAN_DEBOUNCE_CAP_MS)
    }

    pub fn effective_reposition_debounce_ms(&self) -> u64 {
        self.reposition_debounce_ms
            .unwrap_or(constants::REPOSITION_DEBOUNCE_MS)
    }

    pub fn effective_custom_test_timeout_ms(&self) -> u64 {
        self.custom_test_timeout_ms
            .unwrap_or(constants::CUSTOM_TEST_TIMEOUT_MS)
    }

    pub fn effective_marker_collision_window(&self) -> usize {
        self.marker_collision_window
            .unwrap_or(constants::MARKER_COLLISION_WINDOW)
    }

    pub fn effective_marker_nudge_px(&self) -> f32 {
        self.marker_nudge_px.unwrap_or(constants::MARKER_NUDGE_PX)
    }

    pub fn effective_marker_overlap_px(&self) -> f32 {
        self.marker_overlap_px
            .unwrap_or(constants::MARKER_OVERLAP_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::default();
        assert_eq!(config.effective_root_selector(), "body");
        assert!(config.effective_detect_shadow());
        assert_eq!(config.effective_alert_mode(), AlertMode::UserPreference);
        assert_eq!(config.effective_custom_test_count(), 0);
        assert_eq!(config.effective_rescan_debounce_ms(), 250);
        assert_eq!(config.effective_recent_node_grace_ms(), 5_000);
    }

    #[test]
    fn test_from_toml() {
        let config = CheckerConfig::from_toml(
            r#"
            root_selector = "main"
            ignore = ".ally-ignore"
            disabled_kinds = ["altLong"]
            alert_mode = "assertive"
            watch_scope = "checkRoots"

            [ignore_by_category]
            image = ".decorative"
            "#,
        )
        .unwrap();
        assert_eq!(config.effective_root_selector(), "main");
        assert_eq!(config.effective_alert_mode(), AlertMode::Assertive);
        assert_eq!(config.effective_watch_scope(), WatchScope::CheckRoots);
        assert_eq!(
            config.ignore_by_category.get("image").map(String::as_str),
            Some(".decorative")
        );
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        assert!(CheckerConfig::from_toml("root_selector = [3]").is_err());
    }

    #[test]
    fn test_load_reads_ally_toml_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ally.toml"),
            "root_selector = \"article\"\nexternal_sync = true\n",
        )
        .unwrap();
        let config = CheckerConfig::load(dir.path()).unwrap();
        assert_eq!(config.effective_root_selector(), "article");
        assert!(config.effective_external_sync());
    }

    #[test]
    fn test_load_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckerConfig::load(dir.path()).unwrap();
        assert!(config.root_selector.is_none());
    }
}
