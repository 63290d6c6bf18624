//! Single-line text inputs.
//!
//! The cursor and selection are measured in grapheme clusters. Only one
//! input per manager holds focus; the focused input consumes the tick's
//! typed text and key edges.

use arbor_geom::{Rect, Vec2};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    core::{
        dirty::{DirtyType, mark_dirty},
        event::{EventType, Key, KeyEvent},
        frame::{Deferred, FrameCx, WorkerScratch},
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

/// Width of the text cursor.
const CURSOR_WIDTH: f32 = 2.0;

/// What an input accepts and how it shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Any text.
    #[default]
    Text,
    /// Digits, a sign and a decimal point.
    Number,
    /// Any text, shown masked.
    Password,
}

impl InputKind {
    /// Does this kind accept `c`?
    fn accepts(self, c: char) -> bool {
        match self {
            Self::Number => c.is_ascii_digit() || c == '.' || c == '-',
            _ => !c.is_control(),
        }
    }
}

/// Input state.
#[derive(Debug, Clone, PartialEq)]
pub struct InputData {
    /// Container state.
    pub(crate) panel: PanelData,
    /// Current text.
    pub(crate) text: String,
    /// Text shown while empty.
    pub(crate) placeholder: String,
    /// Cursor position in graphemes.
    pub(crate) cursor: usize,
    /// Other end of the selection, in graphemes.
    pub(crate) anchor: Option<usize>,
    /// Has focus.
    pub(crate) focused: bool,
    /// Seconds until the cursor blinks.
    pub(crate) blink: f64,
    /// Is the cursor drawn?
    pub(crate) cursor_visible: bool,
    /// Accepted content.
    pub(crate) kind: InputKind,
    /// Font face.
    pub(crate) face: String,
    /// Font size.
    pub(crate) font_size: f32,
    /// Text color.
    pub(crate) fg: Color,
    /// Placeholder color.
    pub(crate) placeholder_color: Color,
}

impl Default for InputData {
    fn default() -> Self {
        Self {
            panel: PanelData::default(),
            text: String::new(),
            placeholder: String::new(),
            cursor: 0,
            anchor: None,
            focused: false,
            blink: 0.0,
            cursor_visible: false,
            kind: InputKind::default(),
            face: "default".into(),
            font_size: 14.0,
            fg: Color::BLACK,
            placeholder_color: Color::GRAY,
        }
    }
}

/// Byte offset of grapheme `index` in `s`, or the length past the end.
fn byte_offset(s: &str, index: usize) -> usize {
    s.grapheme_indices(true)
        .nth(index)
        .map_or(s.len(), |(i, _)| i)
}

/// Grapheme count.
fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

impl InputData {
    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Cursor position in graphemes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Has focus?
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Input kind.
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Is the cursor currently drawn?
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Selected grapheme range, start before end.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let a = self.anchor?;
        (a != self.cursor).then(|| (a.min(self.cursor), a.max(self.cursor)))
    }

    /// Selected text.
    pub fn selected_text(&self) -> &str {
        match self.selection() {
            Some((s, e)) => &self.text[byte_offset(&self.text, s)..byte_offset(&self.text, e)],
            None => "",
        }
    }

    /// The text as drawn.
    fn display_text(&self) -> String {
        match self.kind {
            InputKind::Password => "*".repeat(grapheme_len(&self.text)),
            _ => self.text.clone(),
        }
    }

    /// Take focus, placing the cursor at the end.
    pub(crate) fn focus(&mut self, blink_rate: f64) {
        self.focused = true;
        self.cursor = grapheme_len(&self.text);
        self.anchor = None;
        self.cursor_visible = true;
        self.blink = blink_rate;
    }

    /// Drop focus.
    pub(crate) fn blur(&mut self) {
        self.focused = false;
        self.anchor = None;
        self.cursor_visible = false;
    }

    /// Remove the selection, if any. Returns true if text was removed.
    fn delete_selection(&mut self) -> bool {
        let Some((s, e)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        let (bs, be) = (byte_offset(&self.text, s), byte_offset(&self.text, e));
        self.text.replace_range(bs..be, "");
        self.cursor = s;
        self.anchor = None;
        true
    }

    /// Insert typed text at the cursor, replacing the selection. Characters
    /// the kind does not accept are dropped. Returns true on change.
    pub(crate) fn insert(&mut self, typed: &str) -> bool {
        let accepted: String = typed.chars().filter(|c| self.kind.accepts(*c)).collect();
        if accepted.is_empty() {
            return false;
        }
        self.delete_selection();
        let at = byte_offset(&self.text, self.cursor);
        self.text.insert_str(at, &accepted);
        self.cursor += grapheme_len(&accepted);
        true
    }

    /// Move the cursor, extending the selection when `select` is set.
    fn move_cursor(&mut self, to: usize, select: bool) {
        if select {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = to.min(grapheme_len(&self.text));
    }

    /// Apply one key edge. Returns true if the text changed.
    pub(crate) fn key(&mut self, k: &KeyEvent) -> bool {
        let len = grapheme_len(&self.text);
        match k.key {
            Key::Backspace => {
                if self.delete_selection() {
                    return true;
                }
                if self.cursor == 0 {
                    return false;
                }
                let (s, e) = (
                    byte_offset(&self.text, self.cursor - 1),
                    byte_offset(&self.text, self.cursor),
                );
                self.text.replace_range(s..e, "");
                self.cursor -= 1;
                true
            }
            Key::Delete => {
                if self.delete_selection() {
                    return true;
                }
                if self.cursor >= len {
                    return false;
                }
                let (s, e) = (
                    byte_offset(&self.text, self.cursor),
                    byte_offset(&self.text, self.cursor + 1),
                );
                self.text.replace_range(s..e, "");
                true
            }
            Key::Left => {
                self.move_cursor(self.cursor.saturating_sub(1), k.shift);
                false
            }
            Key::Right => {
                self.move_cursor(self.cursor + 1, k.shift);
                false
            }
            Key::Home => {
                self.move_cursor(0, k.shift);
                false
            }
            Key::End => {
                self.move_cursor(len, k.shift);
                false
            }
            _ => false,
        }
    }
}

/// Per-tick update of the focused input: cursor blink, typed text and keys.
pub(crate) fn tick(id: NodeId, node: &mut Node, frame: &FrameCx<'_>, scratch: &mut WorkerScratch) {
    let ElementData::Input(inp) = &mut node.data else {
        return;
    };
    if !inp.focused {
        return;
    }
    let mut redraw = false;
    inp.blink -= frame.dt;
    if inp.blink <= 0.0 {
        inp.cursor_visible = !inp.cursor_visible;
        inp.blink = frame.config.cursor_blink_rate;
        redraw = true;
    }
    let mut changed = inp.insert(&frame.input.text);
    let mut submit = false;
    for k in frame.input.keys.iter().filter(|k| k.pressed) {
        match k.key {
            Key::Enter => submit = true,
            Key::Tab => scratch.deferred.push(Deferred::FocusNext(id)),
            Key::Escape => {
                inp.blur();
                redraw = true;
            }
            _ => {
                let before = (inp.cursor, inp.anchor);
                changed |= inp.key(k);
                redraw |= before != (inp.cursor, inp.anchor);
            }
        }
    }
    if changed || redraw {
        inp.cursor_visible = inp.focused;
        inp.blink = frame.config.cursor_blink_rate;
        scratch.dirty(id, DirtyType::ColorChange);
    }
    for k in &frame.input.keys {
        let ty = if k.pressed {
            EventType::KeyDown
        } else {
            EventType::KeyUp
        };
        scratch.request(id, node, ty);
    }
    if changed {
        scratch.request(id, node, EventType::Change);
    }
    if submit {
        scratch.request(id, node, EventType::Submit);
    }
}

/// Width of the first `n` graphemes of `text`.
fn prefix_width(cx: &LayoutCx<'_>, inp: &InputData, text: &str, n: usize) -> f32 {
    let prefix = &text[..byte_offset(text, n)];
    if prefix.is_empty() {
        return 0.0;
    }
    cx.host
        .text()
        .measure(&TextRequest {
            text: prefix,
            face: &inp.face,
            size: inp.font_size,
            max_width: f32::INFINITY,
            line_height: 0.0,
        })
        .x
}

/// Draw the container, then the text or placeholder, the selection and the
/// cursor.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    panel::render_panel(id, node, cx);
    let ElementData::Input(inp) = &node.data else {
        return;
    };
    let inner = node.entity.rect().inset(&(node.layout.padding + node.layout.border));
    let (z, clip) = (node.entity.z + Z_STEP * 0.5, node.clip);
    let shown = inp.display_text();
    let (text, color) = if shown.is_empty() {
        (inp.placeholder.as_str(), inp.placeholder_color)
    } else {
        (shown.as_str(), inp.fg)
    };
    let mut draws = Vec::new();
    if let Some((s, e)) = inp.selection() {
        let x0 = prefix_width(cx, inp, &shown, s);
        let x1 = prefix_width(cx, inp, &shown, e);
        draws.push(DrawCommand {
            node: id,
            rect: Rect::new(inner.x + x0, inner.y, x1 - x0, inp.font_size),
            z,
            clip,
            paint: Paint::flat(Color::new(0.3, 0.5, 1.0, 0.4)),
        });
    }
    if !text.is_empty() {
        let glyphs = cx
            .host
            .text()
            .layout(&TextRequest {
                text,
                face: &inp.face,
                size: inp.font_size,
                max_width: f32::INFINITY,
                line_height: 0.0,
            })
            .into_iter()
            .map(|mut g| {
                g.rect = g.rect.shift(inner.pos());
                g
            })
            .collect();
        draws.push(DrawCommand {
            node: id,
            rect: inner,
            z,
            clip,
            paint: Paint::text(glyphs, color),
        });
    }
    if inp.focused && inp.cursor_visible {
        let x = prefix_width(cx, inp, &shown, inp.cursor);
        draws.push(DrawCommand {
            node: id,
            rect: Rect::from_pos_size(
                inner.pos() + Vec2::new(x, 0.0),
                Vec2::new(CURSOR_WIDTH, inp.font_size),
            ),
            z,
            clip,
            paint: Paint::flat(inp.fg),
        });
    }
    node.draws.extend(draws);
}

/// Does an input react to `ty` by itself?
pub(crate) fn handles(ty: EventType) -> bool {
    matches!(ty, EventType::Click | EventType::Miss)
}

/// Click focuses, a press elsewhere blurs.
pub(crate) fn react(man: &mut Manager, id: NodeId, ty: EventType) {
    match ty {
        EventType::Click => man.focus_input(id),
        EventType::Miss => {
            if let Some(ElementData::Input(inp)) = man.nodes.get_mut(id).map(|n| &mut n.data) {
                if inp.focused {
                    inp.blur();
                    mark_dirty(&mut man.nodes, id, DirtyType::ColorChange);
                }
            }
        }
        _ => {}
    }
}

/// Mutable access to an input.
pub struct InputMut<'a> {
    /// Owning manager.
    pub(crate) man: &'a mut Manager,
    /// Target node.
    pub(crate) id: NodeId,
}

impl InputMut<'_> {
    /// Read-only input data.
    pub fn data(&self) -> &InputData {
        match &self.man.nodes[self.id].data {
            ElementData::Input(inp) => inp,
            _ => unreachable!("input handle on a non-input node"),
        }
    }

    /// Edit the input and redraw it.
    fn edit<R>(&mut self, f: impl FnOnce(&mut InputData) -> R) -> R {
        let r = match &mut self.man.nodes[self.id].data {
            ElementData::Input(inp) => f(inp),
            _ => unreachable!("input handle on a non-input node"),
        };
        mark_dirty(&mut self.man.nodes, self.id, DirtyType::ColorChange);
        r
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.data().text
    }

    /// Replace the text, moving the cursor to the end. Requests `Change`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let changed = self.edit(|inp| {
            if inp.text == text {
                return false;
            }
            inp.text = text;
            inp.cursor = grapheme_len(&inp.text);
            inp.anchor = None;
            true
        });
        if changed {
            self.man.request_event(self.id, EventType::Change);
        }
    }

    /// Set the placeholder.
    pub fn set_placeholder(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.edit(|inp| inp.placeholder = text);
    }

    /// Set the accepted kind.
    pub fn set_kind(&mut self, kind: InputKind) {
        self.edit(|inp| inp.kind = kind);
    }

    /// Set the font size.
    pub fn set_font_size(&mut self, size: f32) {
        self.edit(|inp| inp.font_size = size);
    }

    /// Set the text color.
    pub fn set_text_color(&mut self, c: Color) {
        self.edit(|inp| inp.fg = c);
    }

    /// Move the cursor.
    pub fn set_cursor(&mut self, at: usize) {
        self.edit(|inp| inp.move_cursor(at, false));
    }

    /// Select everything.
    pub fn select_all(&mut self) {
        self.edit(|inp| {
            inp.anchor = Some(0);
            inp.cursor = grapheme_len(&inp.text);
        });
    }

    /// Take focus.
    pub fn focus(&mut self) {
        self.man.focus_input(self.id);
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.edit(InputData::blur);
    }
}
