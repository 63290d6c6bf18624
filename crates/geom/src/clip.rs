use serde::{Deserialize, Serialize};

use crate::{Rect, Vec2};

/// A scissor rectangle stored as its four edges. Content outside the clip is
/// not visible and does not receive pointer hits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Default for Clip {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Clip {
    /// A clip that excludes nothing.
    pub const UNBOUNDED: Self = Self {
        left: -f32::MAX,
        top: -f32::MAX,
        right: f32::MAX,
        bottom: f32::MAX,
    };

    /// Construct a clip from its edges.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Is this the unbounded sentinel?
    pub fn is_unbounded(&self) -> bool {
        *self == Self::UNBOUNDED
    }

    /// Narrow this clip to lie within `outer`. Each edge is clamped into the
    /// outer range, so the result is always contained in `outer`, collapsing
    /// to a zero-area clip when the two do not overlap.
    pub fn intersect(&self, outer: &Self) -> Self {
        let left = self.left.clamp(outer.left, outer.right);
        let top = self.top.clamp(outer.top, outer.bottom);
        let right = self.right.clamp(outer.left, outer.right).max(left);
        let bottom = self.bottom.clamp(outer.top, outer.bottom).max(top);
        Self::new(left, top, right, bottom)
    }

    /// Does `other` lie entirely inside this clip?
    pub fn contains_clip(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Does the clip contain the point?
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Width of the clip area.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the clip area.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

impl From<Rect> for Clip {
    fn from(r: Rect) -> Self {
        Self::new(r.x, r.y, r.right(), r.bottom())
    }
}
