//! Push buttons: a tinted container with a centered label child.

use crate::{
    core::{
        dirty::{DirtyType, mark_dirty},
        event::EventType,
        id::NodeId,
        manager::Manager,
        style::Color,
    },
    widgets::{ElementData, PanelData},
};

/// Tint factor while hovered.
const HOVER_TINT: f32 = 0.8;
/// Tint factor while pressed.
const DOWN_TINT: f32 = 0.7;

/// Button state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ButtonData {
    /// Container state.
    pub(crate) panel: PanelData,
    /// Untinted color.
    pub(crate) base: Color,
    /// The caption label.
    pub(crate) label: Option<NodeId>,
}

impl ButtonData {
    /// Untinted color.
    pub fn base_color(&self) -> Color {
        self.base
    }

    /// The caption label node.
    pub fn label(&self) -> Option<NodeId> {
        self.label
    }
}

/// Does a button react to `ty` by itself?
pub(crate) fn handles(ty: EventType) -> bool {
    matches!(
        ty,
        EventType::Enter | EventType::Exit | EventType::Down | EventType::Up
    )
}

/// Tint the button in response to pointer events.
pub(crate) fn react(man: &mut Manager, id: NodeId, ty: EventType) {
    let Some(ElementData::Button(b)) = man.nodes.get_mut(id).map(|n| &mut n.data) else {
        return;
    };
    let pd = &mut b.panel;
    let next = match ty {
        EventType::Enter => {
            pd.enforced_colors.push(pd.color);
            b.base.scale_rgb(HOVER_TINT)
        }
        EventType::Down => {
            pd.enforced_colors.push(pd.color);
            b.base.scale_rgb(DOWN_TINT)
        }
        EventType::Up => match pd.enforced_colors.pop() {
            Some(c) => c,
            None => return,
        },
        EventType::Exit => {
            if pd.enforced_colors.is_empty() {
                return;
            }
            pd.enforced_colors.truncate(1);
            match pd.enforced_colors.pop() {
                Some(c) => c,
                None => return,
            }
        }
        _ => return,
    };
    if pd.color != next {
        pd.color = next;
        mark_dirty(&mut man.nodes, id, DirtyType::ColorChange);
    }
}
