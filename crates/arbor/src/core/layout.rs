use arbor_geom::{Edges, Vec2};
use serde::{Deserialize, Serialize};

use crate::core::{
    dirty::{DirtyType, mark_dirty},
    id::NodeId,
    node::Node,
    store::NodeStore,
};

/// How a node is positioned relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Positioning {
    /// Placed by the parent's row flow.
    #[default]
    Static,
    /// Placed by its own offset from the parent's top left, outside the flow.
    Absolute,
    /// Placed by its own offset from the window origin.
    Fixed,
    /// Placed by the row flow, shifted by its inner offset.
    Relative,
    /// Outside the flow, like absolute.
    Sticky,
}

impl Positioning {
    /// Does the parent's row flow place this node?
    pub fn is_flow(self) -> bool {
        matches!(self, Self::Static | Self::Relative)
    }
}

/// Per-node geometry record. Pixel size is not stored here: it always comes
/// from the node's entity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Local translation.
    pub(crate) offset: Vec2,
    /// Translation written by the parent's row flow.
    pub(crate) row_layout_offset: Vec2,
    /// Inner offset applied after flow placement.
    pub(crate) inner_offset: Edges,
    /// Inner offset owned by the node itself.
    pub(crate) local_inner_offset: Edges,
    /// Padding inside the border.
    pub(crate) padding: Edges,
    /// Margin outside the box.
    pub(crate) margin: Edges,
    /// Border widths.
    pub(crate) border: Edges,
    /// Positioning mode.
    pub(crate) positioning: Positioning,
    /// Depth bias over the parent.
    pub(crate) z: f32,
}

impl Layout {
    /// Local translation.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Translation written by the parent's row flow.
    pub fn row_layout_offset(&self) -> Vec2 {
        self.row_layout_offset
    }

    /// Row flow translation plus local translation.
    pub fn calc_offset(&self) -> Vec2 {
        self.row_layout_offset + self.offset
    }

    /// Combined inner offset.
    pub fn inner_offset(&self) -> Edges {
        self.local_inner_offset + self.inner_offset
    }

    /// The node's own inner offset.
    pub fn local_inner_offset(&self) -> Edges {
        self.local_inner_offset
    }

    /// Padding.
    pub fn padding(&self) -> Edges {
        self.padding
    }

    /// Margin.
    pub fn margin(&self) -> Edges {
        self.margin
    }

    /// Border widths.
    pub fn border(&self) -> Edges {
        self.border
    }

    /// Positioning mode.
    pub fn positioning(&self) -> Positioning {
        self.positioning
    }

    /// Depth bias.
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Set the local translation. Returns true on change.
    pub(crate) fn set_offset(&mut self, offset: Vec2) -> bool {
        if self.offset.approx_pixel(offset) {
            return false;
        }
        self.offset = offset;
        true
    }

    /// Set the flow translation. Returns true on change.
    pub(crate) fn set_row_layout_offset(&mut self, offset: Vec2) -> bool {
        if self.row_layout_offset.approx_pixel(offset) {
            return false;
        }
        self.row_layout_offset = offset;
        true
    }

    /// Set the inner offset. Returns true on change.
    pub(crate) fn set_inner_offset(&mut self, e: Edges) -> bool {
        if self.inner_offset.approx_pixel(&e) {
            return false;
        }
        self.inner_offset = e;
        true
    }

    /// Set the node-owned inner offset. Returns true on change.
    pub(crate) fn set_local_inner_offset(&mut self, e: Edges) -> bool {
        if self.local_inner_offset.approx_pixel(&e) {
            return false;
        }
        self.local_inner_offset = e;
        true
    }

    /// Set the margin. Returns true on change.
    pub(crate) fn set_margin(&mut self, e: Edges) -> bool {
        if self.margin.approx_pixel(&e) {
            return false;
        }
        self.margin = e;
        true
    }

    /// Set the positioning mode. Returns true on change.
    pub(crate) fn set_positioning(&mut self, p: Positioning) -> bool {
        if self.positioning == p {
            return false;
        }
        self.positioning = p;
        true
    }

    /// Set the depth bias. Returns true on change.
    pub(crate) fn set_z(&mut self, z: f32) -> bool {
        if self.z == z {
            return false;
        }
        self.z = z;
        true
    }
}

/// Mutable access to one node's geometry. Every setter marks the node dirty
/// when it changes something and reports whether it did.
pub struct LayoutMut<'a> {
    /// Node storage.
    store: &'a mut dyn NodeStore,
    /// Target node.
    id: NodeId,
}

impl<'a> LayoutMut<'a> {
    /// Wrap a node in `store`.
    pub(crate) fn new(store: &'a mut dyn NodeStore, id: NodeId) -> Self {
        Self { store, id }
    }

    /// Run `f` on the node and mark it dirty at `level` if it reports a change.
    fn apply(&mut self, level: DirtyType, f: impl FnOnce(&mut Node) -> bool) -> bool {
        let changed = self.store.get_mut(self.id).is_some_and(f);
        if changed {
            mark_dirty(self.store, self.id, level);
        }
        changed
    }

    /// Resize to `w` by `h`. Sizes within a fifth of a pixel of the current
    /// size, and sizes with a zero component, are ignored.
    pub fn scale(&mut self, w: f32, h: f32) -> bool {
        self.apply(DirtyType::Resize, |n| n.scale(w, h))
    }

    /// Resize the width only.
    pub fn scale_width(&mut self, w: f32) -> bool {
        self.apply(DirtyType::Resize, |n| n.scale_width(w))
    }

    /// Resize the height only. A zero height is ignored.
    pub fn scale_height(&mut self, h: f32) -> bool {
        self.apply(DirtyType::Resize, |n| n.scale_height(h))
    }

    /// Set padding, growing or shrinking the node by the difference.
    pub fn set_padding(&mut self, e: Edges) -> bool {
        self.apply(DirtyType::Resize, |n| n.set_padding(e))
    }

    /// Set border widths, growing or shrinking the node by the difference.
    pub fn set_border(&mut self, e: Edges) -> bool {
        self.apply(DirtyType::Resize, |n| n.set_border(e))
    }

    /// Set the margin.
    pub fn set_margin(&mut self, e: Edges) -> bool {
        self.apply(DirtyType::Resize, |n| n.layout.set_margin(e))
    }

    /// Set the local translation.
    pub fn set_offset(&mut self, x: f32, y: f32) -> bool {
        self.apply(DirtyType::Layout, |n| n.layout.set_offset(Vec2::new(x, y)))
    }

    /// Set the horizontal translation.
    pub fn set_offset_x(&mut self, x: f32) -> bool {
        self.apply(DirtyType::Layout, |n| {
            let y = n.layout.offset.y;
            n.layout.set_offset(Vec2::new(x, y))
        })
    }

    /// Set the vertical translation.
    pub fn set_offset_y(&mut self, y: f32) -> bool {
        self.apply(DirtyType::Layout, |n| {
            let x = n.layout.offset.x;
            n.layout.set_offset(Vec2::new(x, y))
        })
    }

    /// Set the flow translation. Normally written by the parent container.
    pub fn set_row_layout_offset(&mut self, offset: Vec2) -> bool {
        self.apply(DirtyType::Layout, |n| n.layout.set_row_layout_offset(offset))
    }

    /// Set the inner offset.
    pub fn set_inner_offset(&mut self, e: Edges) -> bool {
        self.apply(DirtyType::Layout, |n| n.layout.set_inner_offset(e))
    }

    /// Set the node-owned inner offset.
    pub fn set_local_inner_offset(&mut self, e: Edges) -> bool {
        self.apply(DirtyType::Layout, |n| n.layout.set_local_inner_offset(e))
    }

    /// Set the positioning mode.
    pub fn set_positioning(&mut self, p: Positioning) -> bool {
        self.apply(DirtyType::Layout, |n| n.layout.set_positioning(p))
    }

    /// Set the depth bias.
    pub fn set_z(&mut self, z: f32) -> bool {
        self.apply(DirtyType::Layout, |n| n.layout.set_z(z))
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::widgets::{ElementData, PanelData};

    fn one() -> (SlotMap<NodeId, Node>, NodeId) {
        let mut nodes = SlotMap::with_key();
        let id = nodes.insert(Node::new(ElementData::Panel(PanelData::default())));
        (nodes, id)
    }

    #[test]
    fn small_changes_are_ignored() {
        let (mut nodes, id) = one();
        let mut l = LayoutMut::new(&mut nodes, id);
        assert!(l.scale(100.0, 50.0));
        assert!(!l.scale(100.1, 50.1));
        assert!(!l.scale(0.0, 20.0));
        assert!(!l.scale_height(0.0));
        assert!(l.set_offset(3.0, 4.0));
        assert!(!l.set_offset(3.05, 4.0));
        assert_eq!(nodes[id].layout().offset(), Vec2::new(3.0, 4.0));
        assert_eq!(nodes[id].dirty(), DirtyType::Resize);
    }

    #[test]
    fn insets_adjust_size() {
        let (mut nodes, id) = one();
        let mut l = LayoutMut::new(&mut nodes, id);
        l.scale(100.0, 100.0);
        l.set_padding(Edges::all(5.0));
        assert_eq!(nodes[id].pixel_size(), Vec2::new(110.0, 110.0));
        let mut l = LayoutMut::new(&mut nodes, id);
        l.set_border(Edges::new(1.0, 2.0, 1.0, 2.0));
        assert_eq!(nodes[id].pixel_size(), Vec2::new(112.0, 114.0));
        assert_eq!(nodes[id].content_size(), Vec2::new(100.0, 100.0));
        let mut l = LayoutMut::new(&mut nodes, id);
        l.set_padding(Edges::ZERO);
        assert_eq!(nodes[id].pixel_size(), Vec2::new(102.0, 104.0));
    }

    #[test]
    fn combined_offsets() {
        let mut l = Layout::default();
        l.set_offset(Vec2::new(1.0, 2.0));
        l.set_row_layout_offset(Vec2::new(10.0, 20.0));
        l.set_inner_offset(Edges::new(1.0, 1.0, 0.0, 0.0));
        l.set_local_inner_offset(Edges::new(2.0, 0.0, 0.0, 0.0));
        assert_eq!(l.calc_offset(), Vec2::new(11.0, 22.0));
        assert_eq!(l.inner_offset(), Edges::new(3.0, 1.0, 0.0, 0.0));
        assert!(Positioning::Relative.is_flow());
        assert!(!Positioning::Sticky.is_flow());
    }
}
