//! Horizontal sliders over `[0, 1]`.

use arbor_geom::Rect;

use crate::{
    core::{
        dirty::{DirtyType, mark_dirty},
        event::EventType,
        frame::{FrameCx, WorkerScratch},
        id::NodeId,
        manager::Manager,
        node::Node,
        render::{DrawCommand, Paint},
        stabilize::{LayoutCx, Z_STEP},
        style::Color,
    },
    widgets::{ElementData, PanelData, panel},
};

/// Thumb width relative to the slider height.
const THUMB_ASPECT: f32 = 0.5;

/// Slider state.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderData {
    /// Container state.
    pub(crate) panel: PanelData,
    /// Value in `[0, 1]`.
    pub(crate) value: f32,
    /// A drag started on the slider is in progress.
    pub(crate) dragging: bool,
    /// Thumb rectangle relative to the slider's top left.
    pub(crate) thumb: Rect,
    /// Thumb color.
    pub(crate) thumb_color: Color,
}

impl Default for SliderData {
    fn default() -> Self {
        Self {
            panel: PanelData::default(),
            value: 0.0,
            dragging: false,
            thumb: Rect::default(),
            thumb_color: Color::GRAY,
        }
    }
}

impl SliderData {
    /// Current value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Thumb rectangle relative to the slider's top left.
    pub fn thumb(&self) -> Rect {
        self.thumb
    }

    /// Set the value from a world-space pointer x. Returns true on change.
    pub(crate) fn set_from_pointer(&mut self, left: f32, width: f32, x: f32) -> bool {
        let v = if width > 0.0 {
            ((x - left) / width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let changed = v != self.value;
        self.value = v;
        changed
    }
}

/// Clamp the value and place the thumb for the current size.
pub(crate) fn prepare(node: &mut Node) {
    let size = node.pixel_size();
    let ElementData::Slider(s) = &mut node.data else {
        return;
    };
    s.value = s.value.clamp(0.0, 1.0);
    let w = (size.y * THUMB_ASPECT).min(size.x);
    s.thumb = Rect::new((size.x - w) * s.value, 0.0, w, size.y);
}

/// Follow the pointer while dragging; finish with `Submit` on release.
pub(crate) fn tick(id: NodeId, node: &mut Node, frame: &FrameCx<'_>, scratch: &mut WorkerScratch) {
    let down = node.is_down();
    let (left, width) = (node.entity.position.x, node.pixel_size().x);
    let ElementData::Slider(s) = &mut node.data else {
        return;
    };
    if !s.dragging {
        return;
    }
    if down {
        if s.set_from_pointer(left, width, frame.input.pointer.x) {
            scratch.dirty(id, DirtyType::Layout);
            scratch.request(id, node, EventType::Change);
        }
    } else {
        s.dragging = false;
        scratch.request(id, node, EventType::Submit);
    }
}

/// Draw the container and the thumb.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    panel::render_panel(id, node, cx);
    let ElementData::Slider(s) = &node.data else {
        return;
    };
    let thumb = DrawCommand {
        node: id,
        rect: s.thumb.shift(node.entity.position),
        z: node.entity.z + Z_STEP * 0.5,
        clip: node.clip,
        paint: Paint::flat(s.thumb_color),
    };
    node.draws.push(thumb);
}

/// Does a slider react to `ty` by itself?
pub(crate) fn handles(ty: EventType) -> bool {
    ty == EventType::Down
}

/// A press jumps the value to the pointer and starts a drag.
pub(crate) fn react(man: &mut Manager, id: NodeId, ty: EventType) {
    if ty != EventType::Down {
        return;
    }
    let x = man.input.pointer.x;
    let Some(node) = man.nodes.get_mut(id) else {
        return;
    };
    let (left, width) = (node.entity.position.x, node.pixel_size().x);
    let ElementData::Slider(s) = &mut node.data else {
        return;
    };
    s.dragging = true;
    if s.set_from_pointer(left, width, x) {
        mark_dirty(&mut man.nodes, id, DirtyType::Layout);
        man.execute_event(id, EventType::Change);
    }
}

/// Set a slider's value, clamped to `[0, 1]`. Requests `Change` when the
/// value moves.
pub(crate) fn set_value(man: &mut Manager, id: NodeId, v: f32) {
    let Some(ElementData::Slider(s)) = man.nodes.get_mut(id).map(|n| &mut n.data) else {
        return;
    };
    let v = v.clamp(0.0, 1.0);
    if v == s.value {
        return;
    }
    s.value = v;
    mark_dirty(&mut man.nodes, id, DirtyType::Layout);
    man.request_event(id, EventType::Change);
}

#[cfg(test)]
mod tests {
    use arbor_geom::Vec2;

    use super::*;

    #[test]
    fn pointer_maps_to_value() {
        let mut s = SliderData::default();
        assert!(s.set_from_pointer(10.0, 100.0, 60.0));
        assert_eq!(s.value, 0.5);
        assert!(s.set_from_pointer(10.0, 100.0, 500.0));
        assert_eq!(s.value, 1.0);
        assert!(!s.set_from_pointer(10.0, 100.0, 200.0));
        assert!(s.set_from_pointer(10.0, 0.0, 200.0));
        assert_eq!(s.value, 0.0);
    }

    #[test]
    fn thumb_tracks_value() {
        let mut node = Node::new(ElementData::Slider(SliderData {
            value: 1.0,
            ..SliderData::default()
        }));
        node.entity.size = Vec2::new(100.0, 20.0);
        prepare(&mut node);
        let ElementData::Slider(s) = &node.data else {
            panic!("not a slider");
        };
        assert_eq!(s.thumb, Rect::new(90.0, 0.0, 10.0, 20.0));
    }
}
