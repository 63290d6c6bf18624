//! Widget nodes: kind data plus the layout, dirty, interaction and event
//! state every kind shares.

use arbor_geom::{Clip, Edges, Vec2, approx, approx_to, FRACTION_OF_PIXEL};
use bitflags::bitflags;

use crate::{
    core::{
        dirty::DirtyType, entity::Entity, event::EventRegistry, layout::Layout,
        render::DrawCommand, stylizer::Stylizer,
    },
    widgets::{ElementData, ElementKind, PanelData},
};

bitflags! {
    /// Pointer interaction state sampled once per tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UiFlags: u16 {
        /// The pointer is over the node and inside its clip.
        const HOVERING = 1 << 0;
        /// Set on press; suppresses a miss for the rest of the press.
        const CANT_MISS = 1 << 1;
        /// The primary button went down over the node and is still held.
        const IS_DOWN = 1 << 2;
        /// The secondary button went down over the node and is still held.
        const IS_RIGHT_DOWN = 1 << 3;
        /// The press has turned into a drag.
        const DRAG = 1 << 4;
        /// The node was active during the last tick.
        const LAST_ACTIVE = 1 << 5;
        /// Skip stabilization for this node's tree.
        const DONT_CLEAN = 1 << 6;
    }
}

/// A widget node stored in the manager arena.
pub struct Node {
    /// Kind-specific data.
    pub(crate) data: ElementData,
    /// Topology and world placement.
    pub(crate) entity: Entity,
    /// Geometry record.
    pub(crate) layout: Layout,
    /// Optional size/offset hook.
    pub(crate) stylizer: Option<Box<dyn Stylizer>>,
    /// Pending recomputation.
    pub(crate) dirty: DirtyType,
    /// Interaction state.
    pub(crate) flags: UiFlags,
    /// Event callbacks.
    pub(crate) events: EventRegistry,
    /// Scissor rectangle.
    pub(crate) clip: Clip,
    /// Pointer position when the primary button went down.
    pub(crate) down_pos: Vec2,
    /// World position when a drag started.
    pub(crate) drag_start_pos: Vec2,
    /// Runtime of the last click, for double click detection.
    pub(crate) last_click: f64,
    /// Retained draw commands, rebuilt by the render hook.
    pub(crate) draws: Vec<DrawCommand>,
}

impl Node {
    /// A detached, clean node holding `data`.
    pub(crate) fn new(data: ElementData) -> Self {
        Self {
            data,
            entity: Entity::default(),
            layout: Layout::default(),
            stylizer: None,
            dirty: DirtyType::None,
            flags: UiFlags::empty(),
            events: EventRegistry::default(),
            clip: Clip::UNBOUNDED,
            down_pos: Vec2::ZERO,
            drag_start_pos: Vec2::ZERO,
            last_click: 0.0,
            draws: Vec::new(),
        }
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        ElementKind::from(&self.data)
    }

    /// Kind-specific data.
    pub fn data(&self) -> &ElementData {
        &self.data
    }

    /// Container data, for every kind except labels.
    pub fn try_panel(&self) -> Option<&PanelData> {
        self.data.try_panel()
    }

    /// Topology and world placement.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Geometry record.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The stylizer, if any.
    pub fn stylizer(&self) -> Option<&dyn Stylizer> {
        self.stylizer.as_deref()
    }

    /// Pending recomputation.
    pub fn dirty(&self) -> DirtyType {
        self.dirty
    }

    /// Interaction state.
    pub fn flags(&self) -> UiFlags {
        self.flags
    }

    /// Is the pointer over this node?
    pub fn is_hovering(&self) -> bool {
        self.flags.contains(UiFlags::HOVERING)
    }

    /// Is the primary button held on this node?
    pub fn is_down(&self) -> bool {
        self.flags.contains(UiFlags::IS_DOWN)
    }

    /// Scissor rectangle.
    pub fn clip(&self) -> Clip {
        self.clip
    }

    /// Has a clip narrower than unbounded been computed?
    pub fn has_scissor(&self) -> bool {
        !self.clip.is_unbounded()
    }

    /// Retained draw commands.
    pub fn draws(&self) -> &[DrawCommand] {
        &self.draws
    }

    /// Registered callbacks.
    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    /// Size in pixels, read from the entity.
    pub fn pixel_size(&self) -> Vec2 {
        self.entity.size
    }

    /// Size inside padding and border.
    pub fn content_size(&self) -> Vec2 {
        let ps = self.pixel_size();
        let l = &self.layout;
        Vec2::new(
            ps.x - l.padding.horizontal() - l.border.horizontal(),
            ps.y - l.padding.vertical() - l.border.vertical(),
        )
    }

    /// Is the pointer position a hit? The pointer must be inside the world
    /// rectangle and, when a clip is set, inside the clip.
    pub fn hit(&self, p: Vec2) -> bool {
        self.entity.rect().contains(p) && (!self.has_scissor() || self.clip.contains(p))
    }

    /// Resize. Returns true on change.
    pub(crate) fn scale(&mut self, w: f32, h: f32) -> bool {
        if self.pixel_size().approx_pixel(Vec2::new(w, h)) || approx(w, 0.0) || approx(h, 0.0) {
            return false;
        }
        self.entity.scale_without_children(Vec2::new(w, h));
        true
    }

    /// Resize the width. Returns true on change.
    pub(crate) fn scale_width(&mut self, w: f32) -> bool {
        let ps = self.pixel_size();
        if approx_to(ps.x, w, FRACTION_OF_PIXEL) {
            return false;
        }
        self.entity.scale_without_children(Vec2::new(w, ps.y));
        true
    }

    /// Resize the height. Returns true on change.
    pub(crate) fn scale_height(&mut self, h: f32) -> bool {
        let ps = self.pixel_size();
        if approx_to(ps.y, h, FRACTION_OF_PIXEL) || approx(h, 0.0) {
            return false;
        }
        self.entity.scale_without_children(Vec2::new(ps.x, h));
        true
    }

    /// Replace padding, carrying the difference into the size.
    pub(crate) fn set_padding(&mut self, e: Edges) -> bool {
        if self.layout.padding.approx_pixel(&e) {
            return false;
        }
        let old = self.layout.padding;
        self.layout.padding = e;
        self.grow_by(old, e);
        true
    }

    /// Replace border widths, carrying the difference into the size.
    pub(crate) fn set_border(&mut self, e: Edges) -> bool {
        if self.layout.border.approx_pixel(&e) {
            return false;
        }
        let old = self.layout.border;
        self.layout.border = e;
        self.grow_by(old, e);
        true
    }

    /// Adjust the size by the change from one inset to another.
    fn grow_by(&mut self, old: Edges, new: Edges) {
        let ps = self.pixel_size();
        self.entity.scale_without_children(Vec2::new(
            (ps.x - old.horizontal() + new.horizontal()).max(0.0),
            (ps.y - old.vertical() + new.vertical()).max(0.0),
        ));
    }
}
