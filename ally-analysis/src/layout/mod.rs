//! Annotation layout: marker placement and tooltip positioning.

pub mod markers;
pub mod tooltip;

pub use markers::{LayoutMode, Marker, MarkerLayout, MarkerSet, SyncStats};
pub use tooltip::{place_tooltip, TooltipDirection, TooltipPlacement};
