//! Rectangle math for marker and tooltip layout.

use serde::{Deserialize, Serialize};

/// A measured rectangle in viewport coordinates (y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether another rect fits entirely inside this one.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether two points (rect origins) are within `threshold` of each
    /// other on both axes.
    pub fn origin_within(&self, other: &Rect, threshold: f32) -> bool {
        (self.x - other.x).abs() < threshold && (self.y - other.y).abs() < threshold
    }

    /// Clamp this rect's origin so it stays inside `bounds` on both axes.
    /// A rect larger than the bounds pins to the bounds' origin.
    pub fn clamped_into(&self, bounds: &Rect) -> Rect {
        let x = self
            .x
            .min(bounds.right() - self.width)
            .max(bounds.x);
        let y = self
            .y
            .min(bounds.bottom() - self.height)
            .max(bounds.y);
        Rect { x, y, ..*self }
    }
}
