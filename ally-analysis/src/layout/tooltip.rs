//! Tooltip placement with a direction fallback chain.

use ally_core::Rect;

/// Gap between the anchor and the tooltip edge.
const ANCHOR_GAP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipDirection {
    Under,
    Above,
    Right,
    Left,
    /// None of the directional candidates fit; centered in the container.
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    pub direction: TooltipDirection,
    pub rect: Rect,
}

/// Choose a tooltip position near `anchor` inside `container`.
///
/// Directions are tried in a fixed preference order; the first candidate
/// that fits the container entirely wins. The chosen rect is then clamped
/// against the container edges, so even the centered fallback never
/// overflows.
pub fn place_tooltip(
    anchor: &Rect,
    width: f32,
    height: f32,
    container: &Rect,
) -> TooltipPlacement {
    let candidates = [
        (
            TooltipDirection::Under,
            Rect::new(anchor.x, anchor.bottom() + ANCHOR_GAP, width, height),
        ),
        (
            TooltipDirection::Above,
            Rect::new(anchor.x, anchor.y - ANCHOR_GAP - height, width, height),
        ),
        (
            TooltipDirection::Right,
            Rect::new(anchor.right() + ANCHOR_GAP, anchor.y, width, height),
        ),
        (
            TooltipDirection::Left,
            Rect::new(anchor.x - ANCHOR_GAP - width, anchor.y, width, height),
        ),
    ];

    for (direction, rect) in candidates {
        if container.contains(&rect) {
            return TooltipPlacement {
                direction,
                rect: rect.clamped_into(container),
            };
        }
    }

    let centered = Rect::new(
        container.x + (container.width - width) / 2.0,
        container.y + (container.height - height) / 2.0,
        width,
        height,
    );
    TooltipPlacement {
        direction: TooltipDirection::Centered,
        rect: centered.clamped_into(container),
    }
}
