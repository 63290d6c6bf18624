use serde::{Deserialize, Serialize};

use crate::{Edges, Vec2};

/// An axis-aligned rectangle, positioned by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Construct a rectangle from a top-left position and a size.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Top-left corner.
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Does the rectangle contain the point? The right and bottom edges are
    /// inclusive.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// The smallest rectangle enclosing both.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Shrink by insets, saturating at zero size.
    pub fn inset(&self, e: &Edges) -> Self {
        Self::new(
            self.x + e.left,
            self.y + e.top,
            (self.w - e.horizontal()).max(0.0),
            (self.h - e.vertical()).max(0.0),
        )
    }

    /// Shift by an offset.
    pub fn shift(&self, d: Vec2) -> Self {
        Self::new(self.x + d.x, self.y + d.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(30.0, 15.0)));
        assert!(!r.contains(Vec2::new(30.1, 15.0)));
        assert!(!r.contains(Vec2::new(9.0, 12.0)));
    }

    #[test]
    fn union_and_inset() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 15.0, 15.0));
        assert_eq!(
            a.inset(&Edges::new(1.0, 2.0, 3.0, 4.0)),
            Rect::new(1.0, 2.0, 6.0, 4.0)
        );
        assert_eq!(a.inset(&Edges::all(8.0)).size(), Vec2::ZERO);
    }
}
