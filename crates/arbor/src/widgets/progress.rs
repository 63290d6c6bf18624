//! Progress bars.

use arbor_geom::Rect;

use crate::{
    core::{
        id::NodeId,
        node::Node,
        render::{DrawCommand, Paint},
        stabilize::{LayoutCx, Z_STEP},
        style::Color,
    },
    widgets::{ElementData, PanelData, panel},
};

/// Progress bar state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBarData {
    /// Container state; its color is the track.
    pub(crate) panel: PanelData,
    /// Completed fraction in `[0, 1]`.
    pub(crate) value: f32,
    /// Fill color.
    pub(crate) fill: Color,
}

impl Default for ProgressBarData {
    fn default() -> Self {
        Self {
            panel: PanelData::default(),
            value: 0.0,
            fill: Color::new(0.2, 0.6, 0.2, 1.0),
        }
    }
}

impl ProgressBarData {
    /// Completed fraction.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Fill color.
    pub fn fill_color(&self) -> Color {
        self.fill
    }

    /// Fill rectangle inside `content`.
    pub(crate) fn fill_rect(&self, content: Rect) -> Rect {
        Rect::new(
            content.x,
            content.y,
            content.w * self.value.clamp(0.0, 1.0),
            content.h,
        )
    }
}

/// Draw the track, then the fill over the content box.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    panel::render_panel(id, node, cx);
    let ElementData::ProgressBar(p) = &node.data else {
        return;
    };
    let content = node
        .entity
        .rect()
        .inset(&(node.layout.padding + node.layout.border));
    let rect = p.fill_rect(content);
    if rect.w <= 0.0 {
        return;
    }
    let fill = DrawCommand {
        node: id,
        rect,
        z: node.entity.z + Z_STEP * 0.5,
        clip: node.clip,
        paint: Paint::flat(p.fill),
    };
    node.draws.push(fill);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_clamped() {
        let content = Rect::new(0.0, 0.0, 200.0, 10.0);
        let mut p = ProgressBarData {
            value: 0.25,
            ..ProgressBarData::default()
        };
        assert_eq!(p.fill_rect(content).w, 50.0);
        p.value = 3.0;
        assert_eq!(p.fill_rect(content).w, 200.0);
    }
}
