use std::fmt::Debug;

use arbor_geom::{Edges, Rect, Vec2};

/// Geometry a stylizer may read: the parent's content box in the parent's
/// local coordinates, and the node's current size and margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleContext {
    /// Parent content box. For roots this is the window.
    pub parent_content: Rect,
    /// The node's current size.
    pub size: Vec2,
    /// The node's margin.
    pub margin: Edges,
}

/// Changes a stylizer asks for. Applied through the normal layout setters,
/// so a change raises dirtiness and may trigger another stabilization round.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleAdjust {
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New local offset.
    pub offset: Option<Vec2>,
}

/// A per-node hook that adjusts size and offset from parent geometry.
/// Offsets are relative to the parent's top left, so stylizers that position
/// are meant for nodes outside the row flow.
pub trait Stylizer: Debug + Send + Sync {
    /// Compute adjustments for the current geometry.
    fn process(&self, cx: &StyleContext) -> StyleAdjust;

    /// Does this stylizer size the node from its parent? Such nodes are left
    /// out of content-fit bounds, since fitting to them would feed back into
    /// their own size.
    fn anchors_to_parent(&self) -> bool {
        false
    }

    /// Clone into a box.
    fn clone_box(&self) -> Box<dyn Stylizer>;
}

impl Clone for Box<dyn Stylizer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Stretch to fill the parent's content box on the chosen axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stretch {
    /// Fill the width.
    pub width: bool,
    /// Fill the height.
    pub height: bool,
}

impl Stretch {
    /// Fill both axes.
    pub fn both() -> Self {
        Self {
            width: true,
            height: true,
        }
    }

    /// Fill the width only.
    pub fn width() -> Self {
        Self {
            width: true,
            height: false,
        }
    }
}

impl Stylizer for Stretch {
    fn process(&self, cx: &StyleContext) -> StyleAdjust {
        StyleAdjust {
            width: self
                .width
                .then(|| (cx.parent_content.w - cx.margin.horizontal()).max(1.0)),
            height: self
                .height
                .then(|| (cx.parent_content.h - cx.margin.vertical()).max(1.0)),
            offset: None,
        }
    }

    fn anchors_to_parent(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Stylizer> {
        Box::new(*self)
    }
}

/// Stretch to the parent's content width and center vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StretchCenter;

impl Stylizer for StretchCenter {
    fn process(&self, cx: &StyleContext) -> StyleAdjust {
        let pc = cx.parent_content;
        let w = (pc.w - cx.margin.horizontal()).max(1.0);
        StyleAdjust {
            width: Some(w),
            height: None,
            offset: Some(Vec2::new(
                pc.x + cx.margin.left,
                pc.y + (pc.h - cx.size.y) * 0.5,
            )),
        }
    }

    fn anchors_to_parent(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Stylizer> {
        Box::new(*self)
    }
}

/// Horizontal anchoring inside the parent's content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Pin to the left edge.
    Left,
    /// Pin to the right edge.
    Right,
    /// Center on both axes.
    Center,
}

impl Stylizer for Anchor {
    fn process(&self, cx: &StyleContext) -> StyleAdjust {
        let pc = cx.parent_content;
        let m = cx.margin;
        let x = match self {
            Self::Left => pc.x + m.left,
            Self::Right => pc.right() - cx.size.x - m.right,
            Self::Center => pc.x + (pc.w - cx.size.x) * 0.5,
        };
        let y = match self {
            Self::Center => pc.y + (pc.h - cx.size.y) * 0.5,
            _ => pc.y + m.top,
        };
        StyleAdjust {
            offset: Some(Vec2::new(x, y)),
            ..StyleAdjust::default()
        }
    }

    fn clone_box(&self) -> Box<dyn Stylizer> {
        Box::new(*self)
    }
}
