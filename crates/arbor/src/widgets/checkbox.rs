//! Checkboxes drawn from a 2x3 texture atlas: columns are off and on, rows
//! are idle, hovered and pressed.

use arbor_geom::Rect;

use crate::{
    core::{
        dirty::{DirtyType, mark_dirty},
        event::EventType,
        id::NodeId,
        manager::Manager,
        node::Node,
        render::{DrawCommand, Paint},
        stabilize::LayoutCx,
        style::Color,
    },
    widgets::{ElementData, PanelData, panel},
};

/// Checkbox state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckboxData {
    /// Container state.
    pub(crate) panel: PanelData,
    /// Is the box checked?
    pub(crate) checked: bool,
}

impl CheckboxData {
    /// Is the box checked?
    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

/// Atlas cell for the given state.
pub(crate) fn atlas_uv(checked: bool, hovering: bool, down: bool) -> Rect {
    let col = if checked { 1.0 } else { 0.0 };
    let row = match (down, hovering) {
        (true, _) => 2.0,
        (false, true) => 1.0,
        (false, false) => 0.0,
    };
    Rect::new(col / 2.0, row / 3.0, 0.5, 1.0 / 3.0)
}

/// Draw the atlas cell for the current state, or a plain container when no
/// atlas texture is set.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    panel::render_panel(id, node, cx);
    let ElementData::Checkbox(cb) = &node.data else {
        return;
    };
    let uv = atlas_uv(cb.checked, node.is_hovering(), node.is_down());
    for d in &mut node.draws {
        if let Paint::Quad { uv: q, texture: Some(_), .. } = &mut d.paint {
            *q = uv;
        }
    }
    if cb.panel.texture.is_none() && cb.checked {
        let inner = node.entity.rect().inset(&node.layout.border);
        node.draws.push(DrawCommand {
            node: id,
            rect: Rect::new(
                inner.x + inner.w * 0.25,
                inner.y + inner.h * 0.25,
                inner.w * 0.5,
                inner.h * 0.5,
            ),
            z: node.entity.z,
            clip: node.clip,
            paint: Paint::flat(Color::BLACK),
        });
    }
}

/// Toggle on click. Hover and press changes only need a redraw.
pub(crate) fn react(man: &mut Manager, id: NodeId, ty: EventType) {
    match ty {
        EventType::Click => {
            let Some(ElementData::Checkbox(cb)) = man.nodes.get_mut(id).map(|n| &mut n.data)
            else {
                return;
            };
            cb.checked = !cb.checked;
            mark_dirty(&mut man.nodes, id, DirtyType::ColorChange);
            man.execute_event(id, EventType::Change);
        }
        EventType::Enter | EventType::Exit | EventType::Down | EventType::Up => {
            mark_dirty(&mut man.nodes, id, DirtyType::ColorChange);
        }
        _ => {}
    }
}

/// Does a checkbox react to `ty` by itself?
pub(crate) fn handles(ty: EventType) -> bool {
    matches!(
        ty,
        EventType::Click | EventType::Enter | EventType::Exit | EventType::Down | EventType::Up
    )
}
