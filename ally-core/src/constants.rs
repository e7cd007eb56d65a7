//! Engine constants.
//!
//! The timing and layout values are empirically chosen; they are exposed
//! here (and overridable through `CheckerConfig`) rather than hard-coded at
//! their use sites.

/// Grace window for recently-added nodes before a forced rescan, in ms.
pub const RECENT_NODE_GRACE_MS: u64 = 5_000;

/// Debounce floor for a full incremental rescan, in ms.
pub const RESCAN_DEBOUNCE_MS: u64 = 250;

/// Hard cap on the inflated rescan debounce, in ms.
pub const RESCAN_DEBOUNCE_CAP_MS: u64 = 5_000;

/// Debounce for the cheap marker-reposition path, in ms.
pub const REPOSITION_DEBOUNCE_MS: u64 = 10;

/// Multiplier applied to the rolling average scan duration when inflating
/// the rescan debounce under load.
pub const RESCAN_LOAD_FACTOR: u64 = 2;

/// How long the orchestrator waits for externally contributed test results
/// before aggregating without them, in ms.
pub const CUSTOM_TEST_TIMEOUT_MS: u64 = 1_000;

/// How many already-placed markers each new marker is collision-checked
/// against.
pub const MARKER_COLLISION_WINDOW: usize = 3;

/// Offset (px) a marker is nudged by per detected collision.
pub const MARKER_NUDGE_PX: f32 = 24.0;

/// Two markers closer than this (px) on both axes are considered
/// overlapping.
pub const MARKER_OVERLAP_PX: f32 = 16.0;

/// Alt text longer than this flags as overly long. Exactly this length
/// passes.
pub const ALT_MAX_LEN: usize = 160;

/// Heading text longer than this flags as overly long.
pub const HEADING_MAX_LEN: usize = 160;

/// An "image of"-style opener must start within this many characters of the
/// alt text to flag.
pub const IMAGE_OF_PREFIX_WINDOW: usize = 6;

/// Maximum dismissal key length after sanitization.
pub const DISMISSAL_KEY_MAX_LEN: usize = 128;

/// Position skew added to issues inside scrollable containers so the jump
/// list clusters them at the end while preserving intra-container order.
pub const SCROLLABLE_SORT_SKEW: u32 = 1_000_000;

/// Attribute written onto discovered shadow hosts so styles are propagated
/// into each shadow scope exactly once.
pub const SHADOW_HOST_MARKER_ATTR: &str = "data-ally-shadow-host";
