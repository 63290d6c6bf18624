use strum::{Display, EnumIter};

use crate::{
    core::{id::NodeId, store::NodeStore},
    widgets::ElementData,
};

/// What must be recomputed for a node. Variants are ordered by urgency, and
/// every direct level has a cascaded "parent" form that sorts above all
/// direct levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, EnumIter)]
pub enum DirtyType {
    /// Nothing to do.
    #[default]
    None,
    /// Position changed.
    Layout,
    /// Size changed.
    Resize,
    /// Structure changed; a full rebuild.
    Generated,
    /// Paint changed.
    ColorChange,
    /// Clip rectangle changed.
    Scissor,
    /// Some ancestor changed.
    Parent,
    /// An ancestor's position changed.
    ParentLayout,
    /// An ancestor's size changed.
    ParentResize,
    /// An ancestor was rebuilt.
    ParentGenerated,
    /// An ancestor was rebuilt after a prior rebuild.
    ParentReGenerated,
    /// An ancestor's paint changed.
    ParentColorChange,
    /// An ancestor's clip changed.
    ParentScissor,
}

impl DirtyType {
    /// Does anything need recomputing?
    pub fn is_dirty(self) -> bool {
        self != Self::None
    }

    /// Is this a level cascaded from an ancestor?
    pub fn is_parent(self) -> bool {
        self >= Self::Parent
    }

    /// Is this a structural rebuild, which always overrides lesser levels?
    pub fn is_generated(self) -> bool {
        matches!(self, Self::Generated | Self::ParentGenerated)
    }

    /// The level a child receives when its parent is marked with `self`.
    pub fn as_parent(self) -> Self {
        match self {
            Self::None => Self::Parent,
            Self::Layout => Self::ParentLayout,
            Self::Resize => Self::ParentResize,
            Self::Generated => Self::ParentGenerated,
            Self::ColorChange => Self::ParentColorChange,
            Self::Scissor => Self::ParentScissor,
            p => p,
        }
    }
}

/// Mark a node dirty and cascade to its descendants.
///
/// The node accepts the level when it is clean, when its current level was
/// itself cascaded from an ancestor, or when the incoming level is a rebuild.
/// Descendants receive the parent form of the level; a descendant is only
/// overwritten when it is clean or less urgent, or when the level is a
/// rebuild.
pub fn mark_dirty(store: &mut dyn NodeStore, id: NodeId, level: DirtyType) {
    let Some(node) = store.get_mut(id) else {
        return;
    };
    touch_label(&mut node.data);
    if !(node.dirty == DirtyType::None || node.dirty.is_parent() || level.is_generated()) {
        return;
    }
    node.dirty = level;
    let children = node.entity.children.clone();
    let cascaded = level.as_parent();
    for c in children {
        cascade(store, c, cascaded);
    }
}

/// Push a parent-form level down through a subtree.
fn cascade(store: &mut dyn NodeStore, id: NodeId, level: DirtyType) {
    let Some(node) = store.get_mut(id) else {
        return;
    };
    touch_label(&mut node.data);
    if !(node.dirty == DirtyType::None || node.dirty < level || level.is_generated()) {
        return;
    }
    node.dirty = level;
    let children = node.entity.children.clone();
    for c in children {
        cascade(store, c, level);
    }
}

/// Labels regenerate glyphs whenever they are touched by a dirty mark.
fn touch_label(data: &mut ElementData) {
    if let ElementData::Label(l) = data {
        l.render_required = true;
    }
}
