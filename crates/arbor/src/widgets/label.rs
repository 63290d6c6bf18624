//! Text labels. A label sizes itself from its measured text, wrapping at the
//! content width of its parent. When a stylizer anchors its width to the
//! parent it wraps at that width and only the height follows the text.

use std::mem;

use arbor_geom::{Clip, Rect, Vec2};

use crate::{
    core::{
        dirty::{DirtyType, mark_dirty},
        host::{Glyph, TextRequest},
        id::NodeId,
        layout::LayoutMut,
        manager::Manager,
        node::Node,
        render::{DrawCommand, Paint},
        stabilize::{LayoutCx, Z_STEP},
        store::NodeStore,
        style::Color,
    },
    widgets::ElementData,
};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    /// Top of the box.
    #[default]
    Top,
    /// Centered.
    Center,
    /// Bottom of the box.
    Bottom,
}

/// A color override for a range of characters, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    /// First character.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    /// Override color.
    pub color: Color,
}

/// Label state.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelData {
    /// Displayed text.
    pub(crate) text: String,
    /// Font face name handed to the text service.
    pub(crate) face: String,
    /// Font size in pixels.
    pub(crate) font_size: f32,
    /// Line height; zero means the font size.
    pub(crate) line_height: f32,
    /// Wrap at the available width.
    pub(crate) wrap: bool,
    /// Explicit wrap width.
    pub(crate) max_width: Option<f32>,
    /// Horizontal alignment.
    pub(crate) justify: Justify,
    /// Vertical alignment.
    pub(crate) baseline: Baseline,
    /// Text color.
    pub(crate) fg: Color,
    /// Background color.
    pub(crate) bg: Color,
    /// Text colors saved by enforcement.
    pub(crate) enforced_fg: Vec<Color>,
    /// Per-range color overrides.
    pub(crate) color_ranges: Vec<ColorRange>,
    /// Wrap width used by the last layout.
    pub(crate) wrap_at: f32,
    /// Glyphs must be regenerated.
    pub(crate) render_required: bool,
    /// Glyphs from the last layout, relative to the text origin.
    pub(crate) glyphs: Vec<Glyph>,
}

impl Default for LabelData {
    fn default() -> Self {
        Self {
            text: String::new(),
            face: "default".into(),
            font_size: 14.0,
            line_height: 0.0,
            wrap: true,
            max_width: None,
            justify: Justify::default(),
            baseline: Baseline::default(),
            fg: Color::BLACK,
            bg: Color::TRANSPARENT,
            enforced_fg: Vec::new(),
            color_ranges: Vec::new(),
            wrap_at: f32::INFINITY,
            render_required: true,
            glyphs: Vec::new(),
        }
    }
}

impl LabelData {
    /// A label showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font size.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Text color.
    pub fn color(&self) -> Color {
        self.fg
    }

    /// Horizontal alignment.
    pub fn justify(&self) -> Justify {
        self.justify
    }

    /// Vertical alignment.
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// Cached glyphs, relative to the text origin.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Text request for a given wrap width.
    fn request(&self, max_width: f32) -> TextRequest<'_> {
        TextRequest {
            text: &self.text,
            face: &self.face,
            size: self.font_size,
            max_width,
            line_height: self.line_height,
        }
    }

    /// Color of the character at `index`.
    fn color_at(&self, index: usize) -> Color {
        self.color_ranges
            .iter()
            .rev()
            .find(|r| (r.start..r.end).contains(&index))
            .map_or(self.fg, |r| r.color)
    }
}

/// Does the label's width come from its stylizer rather than its text?
fn is_anchored(node: &Node) -> bool {
    node.stylizer().is_some_and(|s| s.anchors_to_parent())
}

/// Wrap width for a label node. A wrapping label breaks at the content width
/// of its parent, or the window width when it is a root. A parent that fits
/// its width to content lets the text run to its natural width.
fn wrap_width(store: &dyn NodeStore, node: &Node, ld: &LabelData, cx: &LayoutCx<'_>) -> f32 {
    if let Some(w) = ld.max_width {
        return w;
    }
    if !ld.wrap {
        return f32::INFINITY;
    }
    if is_anchored(node) {
        return node.pixel_size().x;
    }
    let Some(parent) = node.entity.parent.and_then(|p| store.get(p)) else {
        return cx.host.window().x;
    };
    if parent.data.try_panel().is_some_and(|pd| pd.fit.fits_width()) {
        return f32::INFINITY;
    }
    (parent.content_size().x - node.layout.margin.horizontal()).max(0.0)
}

/// Measured text size of a label node, zero for other kinds.
pub(crate) fn measure(store: &dyn NodeStore, id: NodeId, cx: &LayoutCx<'_>) -> Vec2 {
    let Some(node) = store.get(id) else {
        return Vec2::ZERO;
    };
    let ElementData::Label(ld) = &node.data else {
        return Vec2::ZERO;
    };
    if ld.text.is_empty() {
        return Vec2::ZERO;
    }
    cx.host.text().measure(&ld.request(wrap_width(store, node, ld, cx)))
}

/// Size the label from its text, wrapping at the width available to it.
pub(crate) fn post_layout(store: &mut dyn NodeStore, id: NodeId, cx: &LayoutCx<'_>) {
    let Some(node) = store.get(id) else {
        return;
    };
    let ElementData::Label(ld) = &node.data else {
        return;
    };
    let wrap = wrap_width(store, node, ld, cx);
    let size = measure(store, id, cx);
    let anchored = is_anchored(node);
    if let Some(ElementData::Label(ld)) = store.get_mut(id).map(|n| &mut n.data) {
        if ld.wrap_at != wrap {
            ld.wrap_at = wrap;
            ld.render_required = true;
        }
    }
    let mut l = LayoutMut::new(store, id);
    if anchored {
        l.scale_height(size.y.max(1.0));
    } else {
        l.scale(size.x.min(wrap).max(1.0), size.y.max(1.0));
    }
}

/// Regenerate glyphs when needed and emit draw commands: an optional
/// background quad and one text run per contiguous color.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    let rect = node.entity.rect();
    let (z, clip) = (node.entity.z, node.clip);
    let ElementData::Label(ld) = &mut node.data else {
        return;
    };
    if ld.render_required {
        ld.glyphs = if ld.text.is_empty() {
            Vec::new()
        } else {
            cx.host.text().layout(&ld.request(ld.wrap_at))
        };
        ld.render_required = false;
    }

    let extent = ld
        .glyphs
        .iter()
        .fold(Vec2::ZERO, |acc, g| acc.max(Vec2::new(g.rect.right(), g.rect.bottom())));
    let dx = match ld.justify {
        Justify::Left => 0.0,
        Justify::Center => (rect.w - extent.x) / 2.0,
        Justify::Right => rect.w - extent.x,
    };
    let dy = match ld.baseline {
        Baseline::Top => 0.0,
        Baseline::Center => (rect.h - extent.y) / 2.0,
        Baseline::Bottom => rect.h - extent.y,
    };
    let origin = rect.pos() + Vec2::new(dx, dy);

    let mut draws = Vec::new();
    if ld.bg.is_visible() {
        draws.push(DrawCommand {
            node: id,
            rect,
            z,
            clip,
            paint: Paint::flat(ld.bg),
        });
    }
    let mut run: Vec<Glyph> = Vec::new();
    let mut run_color = ld.fg;
    for (i, g) in ld.glyphs.iter().enumerate() {
        let c = ld.color_at(i);
        if c != run_color && !run.is_empty() {
            draws.push(text_command(id, rect, z, clip, mem::take(&mut run), run_color));
        }
        run_color = c;
        run.push(Glyph {
            ch: g.ch,
            rect: g.rect.shift(origin),
        });
    }
    if !run.is_empty() {
        draws.push(text_command(id, rect, z, clip, run, run_color));
    }
    node.draws = draws;
}

/// A text run draw command.
fn text_command(
    id: NodeId,
    rect: Rect,
    z: f32,
    clip: Clip,
    glyphs: Vec<Glyph>,
    color: Color,
) -> DrawCommand {
    DrawCommand {
        node: id,
        rect,
        z: z + Z_STEP * 0.5,
        clip,
        paint: Paint::text(glyphs, color),
    }
}

/// Mutable access to a label.
pub struct LabelMut<'a> {
    /// Owning manager.
    pub(crate) man: &'a mut Manager,
    /// Target node.
    pub(crate) id: NodeId,
}

impl LabelMut<'_> {
    /// Read-only label data.
    pub fn data(&self) -> &LabelData {
        match &self.man.nodes[self.id].data {
            ElementData::Label(ld) => ld,
            _ => unreachable!("label handle on a non-label node"),
        }
    }

    /// Edit the label data, marking the node at `level` if `f` reports a
    /// change.
    fn edit(&mut self, level: DirtyType, f: impl FnOnce(&mut LabelData) -> bool) {
        let changed = match &mut self.man.nodes[self.id].data {
            ElementData::Label(ld) => f(ld),
            _ => false,
        };
        if changed {
            mark_dirty(&mut self.man.nodes, self.id, level);
        }
    }

    /// Displayed text.
    pub fn text(&self) -> &str {
        &self.data().text
    }

    /// Replace the text. The label resizes on the next stabilization.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.edit(DirtyType::Generated, |ld| {
            if ld.text == text {
                return false;
            }
            ld.text = text;
            true
        });
    }

    /// Set the font face.
    pub fn set_font_face(&mut self, face: impl Into<String>) {
        let face = face.into();
        self.edit(DirtyType::Generated, |ld| {
            ld.face = face;
            true
        });
    }

    /// Set the font size.
    pub fn set_font_size(&mut self, size: f32) {
        self.edit(DirtyType::Generated, |ld| {
            ld.font_size = size;
            true
        });
    }

    /// Set the line height; zero uses the font size.
    pub fn set_line_height(&mut self, h: f32) {
        self.edit(DirtyType::Generated, |ld| {
            ld.line_height = h;
            true
        });
    }

    /// Turn wrapping on or off.
    pub fn set_wrap(&mut self, wrap: bool) {
        self.edit(DirtyType::Generated, |ld| {
            let changed = ld.wrap != wrap;
            ld.wrap = wrap;
            changed
        });
    }

    /// Wrap at a fixed width, or `None` to follow the layout.
    pub fn set_max_width(&mut self, w: Option<f32>) {
        self.edit(DirtyType::Generated, |ld| {
            ld.max_width = w;
            true
        });
    }

    /// Set horizontal alignment.
    pub fn set_justify(&mut self, j: Justify) {
        self.edit(DirtyType::Layout, |ld| {
            ld.justify = j;
            true
        });
    }

    /// Set vertical alignment.
    pub fn set_baseline(&mut self, b: Baseline) {
        self.edit(DirtyType::Layout, |ld| {
            ld.baseline = b;
            true
        });
    }

    /// Set the text color. While a color is enforced this replaces the
    /// color restored when enforcement ends.
    pub fn set_color(&mut self, c: Color) {
        self.edit(DirtyType::ColorChange, |ld| match ld.enforced_fg.first_mut() {
            Some(base) => {
                *base = c;
                false
            }
            None => {
                let changed = ld.fg != c;
                ld.fg = c;
                changed
            }
        });
    }

    /// Temporarily override the text color.
    pub fn enforce_color(&mut self, c: Color) {
        self.edit(DirtyType::ColorChange, |ld| {
            ld.enforced_fg.push(ld.fg);
            ld.fg = c;
            true
        });
    }

    /// Restore the color saved by the last enforcement.
    pub fn unenforce_color(&mut self) {
        self.edit(DirtyType::ColorChange, |ld| match ld.enforced_fg.pop() {
            Some(c) => {
                ld.fg = c;
                true
            }
            None => false,
        });
    }

    /// Set the background color.
    pub fn set_background_color(&mut self, c: Color) {
        self.edit(DirtyType::ColorChange, |ld| {
            ld.bg = c;
            true
        });
    }

    /// Color a range of characters.
    pub fn color_range(&mut self, start: usize, end: usize, color: Color) {
        self.edit(DirtyType::ColorChange, |ld| {
            ld.color_ranges.push(ColorRange { start, end, color });
            true
        });
    }

    /// Drop every range override.
    pub fn clear_color_ranges(&mut self) {
        self.edit(DirtyType::ColorChange, |ld| {
            let had = !ld.color_ranges.is_empty();
            ld.color_ranges.clear();
            had
        });
    }
}
