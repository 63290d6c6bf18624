use arbor_geom::{Rect, Vec2};

use crate::core::id::NodeId;

/// The transform-graph record carried by every node: topology, activation
/// and world placement. Layout reads and writes world placement; it never
/// owns the links.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Parent node.
    pub(crate) parent: Option<NodeId>,
    /// Ordered children.
    pub(crate) children: Vec<NodeId>,
    /// The node's own activation flag.
    pub(crate) active: bool,
    /// Activation including all ancestors, refreshed during stabilization.
    pub(crate) active_in_tree: bool,
    /// World position of the top-left corner.
    pub(crate) position: Vec2,
    /// World size in pixels.
    pub(crate) size: Vec2,
    /// World depth.
    pub(crate) z: f32,
    /// Optional name for lookup.
    pub(crate) name: String,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            active: true,
            active_in_tree: true,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            z: 0.0,
            name: String::new(),
        }
    }
}

impl Entity {
    /// Parent node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Is this a root of the tree?
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The node's own activation flag.
    pub fn is_active_self(&self) -> bool {
        self.active
    }

    /// Is the node and every ancestor active?
    pub fn is_active(&self) -> bool {
        self.active_in_tree
    }

    /// World position of the top-left corner.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// World size.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// World depth.
    pub fn z(&self) -> f32 {
        self.z
    }

    /// World rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    /// Lookup name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resize without touching children.
    pub(crate) fn scale_without_children(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Move the top-left corner.
    pub(crate) fn set_position(&mut self, position: Vec2, z: f32) {
        self.position = position;
        self.z = z;
    }

    /// Detach `child` from the children list, returning its former index.
    pub(crate) fn remove_child(&mut self, child: NodeId) -> Option<usize> {
        let idx = self.children.iter().position(|c| *c == child)?;
        self.children.remove(idx);
        Some(idx)
    }
}
