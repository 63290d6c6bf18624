//! Drop-down selects. The option list opens below the control and is drawn
//! unclipped in front of everything else in its tree.

use arbor_geom::{Clip, Rect, Vec2};

use crate::{
    core::{
        dirty::{DirtyType, mark_dirty},
        event::EventType,
        host::TextRequest,
        id::NodeId,
        manager::Manager,
        node::Node,
        render::{DrawCommand, Paint},
        stabilize::{LayoutCx, Z_STEP},
        style::Color,
    },
    widgets::{ElementData, PanelData, panel},
};

/// Depth of the open option list above the control.
const LIST_Z: f32 = 1.0;

/// One choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Displayed name.
    pub name: String,
    /// Value reported to callers.
    pub value: String,
}

impl SelectOption {
    /// An option.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Select state.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectData {
    /// Container state.
    pub(crate) panel: PanelData,
    /// Text shown when nothing is selected.
    pub(crate) text: String,
    /// Choices.
    pub(crate) options: Vec<SelectOption>,
    /// Selected choice.
    pub(crate) selected: Option<usize>,
    /// Is the list open?
    pub(crate) open: bool,
    /// Option rows relative to the control's top left.
    pub(crate) rows: Vec<Rect>,
    /// Font size.
    pub(crate) font_size: f32,
    /// Text color.
    pub(crate) fg: Color,
    /// Option list background.
    pub(crate) list_color: Color,
}

impl Default for SelectData {
    fn default() -> Self {
        Self {
            panel: PanelData::default(),
            text: String::new(),
            options: Vec::new(),
            selected: None,
            open: false,
            rows: Vec::new(),
            font_size: 14.0,
            fg: Color::BLACK,
            list_color: Color::WHITE,
        }
    }
}

impl SelectData {
    /// Choices.
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Selected index.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selected value.
    pub fn value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|o| o.value.as_str())
    }

    /// Is the list open?
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The text shown on the control.
    pub fn shown_text(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map_or(&self.text, |o| &o.name)
    }

    /// Option row under a point relative to the control's top left.
    pub(crate) fn row_at(&self, p: Vec2) -> Option<usize> {
        self.rows.iter().position(|r| r.contains(p))
    }
}

/// Lay the option rows out below the control, one control-height each.
pub(crate) fn prepare(node: &mut Node) {
    let size = node.pixel_size();
    let ElementData::Select(s) = &mut node.data else {
        return;
    };
    s.rows = (0..s.options.len())
        .map(|i| Rect::new(0.0, size.y * (i + 1) as f32, size.x, size.y))
        .collect();
}

/// Where a text line is drawn.
struct Slot {
    /// Owning node.
    node: NodeId,
    /// World rectangle; text starts at its top left.
    rect: Rect,
    /// Depth.
    z: f32,
    /// Clip rectangle.
    clip: Clip,
}

/// A single line of text in `slot`.
fn text_line(cx: &LayoutCx<'_>, s: &SelectData, text: &str, slot: Slot) -> Option<DrawCommand> {
    if text.is_empty() {
        return None;
    }
    let glyphs = cx
        .host
        .text()
        .layout(&TextRequest {
            text,
            face: "default",
            size: s.font_size,
            max_width: f32::INFINITY,
            line_height: 0.0,
        })
        .into_iter()
        .map(|mut g| {
            g.rect = g.rect.shift(slot.rect.pos());
            g
        })
        .collect();
    Some(DrawCommand {
        node: slot.node,
        rect: slot.rect,
        z: slot.z,
        clip: slot.clip,
        paint: Paint::text(glyphs, s.fg),
    })
}

/// Draw the control, its current text and, when open, the option list.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    panel::render_panel(id, node, cx);
    let ElementData::Select(s) = &node.data else {
        return;
    };
    let rect = node.entity.rect();
    let z = node.entity.z + Z_STEP * 0.5;
    let slot = Slot {
        node: id,
        rect,
        z,
        clip: node.clip,
    };
    let mut draws: Vec<DrawCommand> = text_line(cx, s, s.shown_text(), slot).into_iter().collect();
    if s.open {
        let z = node.entity.z + LIST_Z;
        for (row, opt) in s.rows.iter().zip(&s.options) {
            let r = row.shift(rect.pos());
            draws.push(DrawCommand {
                node: id,
                rect: r,
                z,
                clip: Clip::UNBOUNDED,
                paint: Paint::flat(s.list_color),
            });
            let slot = Slot {
                node: id,
                rect: r,
                z: z + Z_STEP * 0.5,
                clip: Clip::UNBOUNDED,
            };
            draws.extend(text_line(cx, s, &opt.name, slot));
        }
    }
    node.draws.extend(draws);
}

/// Does a select react to `ty` by itself?
pub(crate) fn handles(ty: EventType) -> bool {
    matches!(ty, EventType::Click | EventType::Miss)
}

/// Click toggles the list; a press outside picks the option under the
/// pointer, if any, and closes it.
pub(crate) fn react(man: &mut Manager, id: NodeId, ty: EventType) {
    let pointer = man.input.pointer;
    let Some(node) = man.nodes.get_mut(id) else {
        return;
    };
    let local = pointer - node.entity.position;
    let ElementData::Select(s) = &mut node.data else {
        return;
    };
    let mut changed = false;
    match ty {
        EventType::Click => s.open = !s.open,
        EventType::Miss if s.open => {
            if let Some(i) = s.row_at(local) {
                changed = s.selected != Some(i);
                s.selected = Some(i);
            }
            s.open = false;
        }
        _ => return,
    }
    mark_dirty(&mut man.nodes, id, DirtyType::ColorChange);
    if changed {
        man.execute_event(id, EventType::Change);
    }
}

/// Mutable access to a select.
pub struct SelectMut<'a> {
    /// Owning manager.
    pub(crate) man: &'a mut Manager,
    /// Target node.
    pub(crate) id: NodeId,
}

impl SelectMut<'_> {
    /// Read-only select data.
    pub fn data(&self) -> &SelectData {
        match &self.man.nodes[self.id].data {
            ElementData::Select(s) => s,
            _ => unreachable!("select handle on a non-select node"),
        }
    }

    /// Edit the select and relayout it.
    fn edit<R>(&mut self, f: impl FnOnce(&mut SelectData) -> R) -> R {
        let r = match &mut self.man.nodes[self.id].data {
            ElementData::Select(s) => f(s),
            _ => unreachable!("select handle on a non-select node"),
        };
        mark_dirty(&mut self.man.nodes, self.id, DirtyType::Layout);
        r
    }

    /// Append a choice.
    pub fn add_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let opt = SelectOption::new(name, value);
        self.edit(|s| s.options.push(opt));
    }

    /// Drop every choice.
    pub fn clear_options(&mut self) {
        self.edit(|s| {
            s.options.clear();
            s.selected = None;
        });
    }

    /// Select a choice by index. Requests `Change` when the selection moves.
    pub fn pick(&mut self, index: usize) {
        let changed = self.edit(|s| {
            if index >= s.options.len() || s.selected == Some(index) {
                return false;
            }
            s.selected = Some(index);
            true
        });
        if changed {
            self.man.request_event(self.id, EventType::Change);
        }
    }

    /// Select the first choice with this value.
    pub fn pick_value(&mut self, value: &str) {
        if let Some(i) = self.data().options.iter().position(|o| o.value == value) {
            self.pick(i);
        }
    }

    /// Open the list.
    pub fn expand(&mut self) {
        self.edit(|s| s.open = true);
    }

    /// Close the list.
    pub fn collapse(&mut self) {
        self.edit(|s| s.open = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_below_control() {
        let mut data = SelectData::default();
        data.options.push(SelectOption::new("a", "1"));
        data.options.push(SelectOption::new("b", "2"));
        let mut node = Node::new(ElementData::Select(data));
        node.entity.size = Vec2::new(80.0, 20.0);
        prepare(&mut node);
        let ElementData::Select(s) = &node.data else {
            panic!("not a select");
        };
        assert_eq!(s.rows[1], Rect::new(0.0, 40.0, 80.0, 20.0));
        assert_eq!(s.row_at(Vec2::new(10.0, 45.0)), Some(1));
        assert_eq!(s.row_at(Vec2::new(10.0, 5.0)), None);
    }

    #[test]
    fn shown_text_follows_selection() {
        let mut s = SelectData {
            text: "pick one".into(),
            ..SelectData::default()
        };
        s.options.push(SelectOption::new("Red", "r"));
        assert_eq!(s.shown_text(), "pick one");
        s.selected = Some(0);
        assert_eq!(s.shown_text(), "Red");
        assert_eq!(s.value(), Some("r"));
    }
}
