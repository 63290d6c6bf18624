//! Containers: row-flow packing, content fitting, scrolling and scroll bars.
//!
//! Every widget kind other than labels embeds a [`PanelData`] and gets the
//! container behavior here for free.

use std::array;

use arbor_geom::{Edges, Rect, TINY, Vec2, approx_to};
use bitflags::bitflags;

use crate::{
    core::{
        dirty::{DirtyType, mark_dirty},
        event::EventType,
        frame::{FrameCx, WorkerScratch},
        host::TextureHandle,
        id::NodeId,
        layout::{LayoutMut, Positioning},
        manager::Manager,
        node::Node,
        render::{DrawCommand, FULL_UV, Paint},
        stabilize::{LayoutCx, Z_STEP},
        store::{NodeStore, is_ancestor},
        style::{BorderStyle, Color},
    },
    widgets::{ElementData, label},
};

/// Which dimensions a container sizes from its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFit {
    /// Keep the size it is given.
    None,
    /// Fit the width.
    Width,
    /// Fit the height.
    Height,
    /// Fit both.
    #[default]
    Both,
}

impl ContentFit {
    /// Is the width fitted?
    pub fn fits_width(self) -> bool {
        matches!(self, Self::Width | Self::Both)
    }

    /// Is the height fitted?
    pub fn fits_height(self) -> bool {
        matches!(self, Self::Height | Self::Both)
    }

    /// Fit mode from per-axis switches.
    fn from_axes(width: bool, height: bool) -> Self {
        match (width, height) {
            (true, true) => Self::Both,
            (true, false) => Self::Width,
            (false, true) => Self::Height,
            (false, false) => Self::None,
        }
    }
}

/// What happens to children that extend past the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Clip, and allow scrolling on enabled axes.
    #[default]
    Scroll,
    /// Do not clip; descendants inherit the next clipping ancestor's clip.
    Visible,
    /// Clip without scrolling.
    Hidden,
}

bitflags! {
    /// Axes a container scrolls on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScrollDirection: u8 {
        /// Vertical scrolling.
        const VERTICAL = 1 << 0;
        /// Horizontal scrolling.
        const HORIZONTAL = 1 << 1;
        /// Both axes.
        const BOTH = Self::VERTICAL.bits() | Self::HORIZONTAL.bits();
    }
}

bitflags! {
    /// Container state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PanelFlags: u8 {
        /// Scroll changed this tick.
        const SCROLLING = 1 << 0;
        /// A drag scroll is in progress.
        const DRAGGING = 1 << 1;
        /// Scrolling is suspended.
        const FROZEN = 1 << 2;
        /// Dragging the content scrolls it.
        const ALLOW_DRAG_SCROLL = 1 << 3;
        /// Pointer presses pass through to whatever is behind.
        const ALLOW_CLICK_THROUGH = 1 << 4;
        /// Scroll bar thumbs are shown.
        const BARS_VISIBLE = 1 << 5;
    }
}

/// Container state shared by every non-label kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelData {
    /// Applied scroll. `x` lies in `[0, max.x]`, `y` in `[-max.y, 0]`.
    pub(crate) scroll: Vec2,
    /// Scroll at the start of a drag.
    pub(crate) drag_offset: Vec2,
    /// Largest scroll per axis.
    pub(crate) max_scroll: Vec2,
    /// Axes the container scrolls on.
    pub(crate) scroll_direction: ScrollDirection,
    /// Requested horizontal scroll, applied during layout.
    pub(crate) request_scroll_x: Option<f32>,
    /// Requested vertical scroll (positive down), applied during layout.
    pub(crate) request_scroll_y: Option<f32>,
    /// Content fit mode.
    pub(crate) fit: ContentFit,
    /// Overflow mode.
    pub(crate) overflow: Overflow,
    /// Background texture.
    pub(crate) texture: Option<TextureHandle>,
    /// Current background color.
    pub(crate) color: Color,
    /// Colors saved by enforcement, oldest first.
    pub(crate) enforced_colors: Vec<Color>,
    /// Border style per edge, left, top, right, bottom.
    pub(crate) border_style: [BorderStyle; 4],
    /// Border color per edge, left, top, right, bottom.
    pub(crate) border_color: [Color; 4],
    /// Corner radii, top-left, top-right, bottom-right, bottom-left.
    pub(crate) border_radius: [f32; 4],
    /// State bits.
    pub(crate) flags: PanelFlags,
    /// Horizontal scroll thumb, relative to the container's top left.
    pub(crate) scroll_bar_x: Option<Rect>,
    /// Vertical scroll thumb, relative to the container's top left.
    pub(crate) scroll_bar_y: Option<Rect>,
    /// Far corner of absolutely positioned children, for non-fitting
    /// containers.
    pub(crate) absolute_extents: Vec2,
}

impl PanelData {
    /// Applied scroll.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Largest scroll per axis.
    pub fn max_scroll(&self) -> Vec2 {
        self.max_scroll
    }

    /// Scroll axes.
    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll_direction
    }

    /// Content fit mode.
    pub fn fit(&self) -> ContentFit {
        self.fit
    }

    /// Overflow mode.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Current background color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Background texture.
    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    /// Is a color enforced?
    pub fn has_enforced_color(&self) -> bool {
        !self.enforced_colors.is_empty()
    }

    /// Does the container paint anything behind its children?
    pub fn has_background(&self) -> bool {
        self.texture.is_some() || self.color.is_visible()
    }

    /// State bits.
    pub fn flags(&self) -> PanelFlags {
        self.flags
    }

    /// Scroll thumbs, relative to the container's top left.
    pub fn scroll_bars(&self) -> (Option<Rect>, Option<Rect>) {
        (self.scroll_bar_x, self.scroll_bar_y)
    }

    /// Far corner of absolutely positioned children.
    pub fn absolute_extents(&self) -> Vec2 {
        self.absolute_extents
    }

    /// Set the color, bypassing enforcement. Returns true on change.
    fn set_color_internal(&mut self, c: Color) -> bool {
        if self.color == c {
            return false;
        }
        self.color = c;
        true
    }

    /// Apply a scroll delta from the wheel or a drag, starting from `from`.
    /// Returns true if the applied scroll changed.
    fn scroll_by(&mut self, from: Vec2, mut delta: Vec2) -> bool {
        if self.scroll_direction == ScrollDirection::HORIZONTAL && approx_to(delta.x, 0.0, TINY) {
            delta.x = -delta.y;
        }
        let mut next = self.scroll;
        if self.scroll_direction.contains(ScrollDirection::HORIZONTAL) {
            next.x = (from.x + delta.x).clamp(0.0, self.max_scroll.x);
        }
        if self.scroll_direction.contains(ScrollDirection::VERTICAL) {
            next.y = (from.y + delta.y).clamp(-self.max_scroll.y, 0.0);
        }
        if next.approx(self.scroll) {
            return false;
        }
        self.scroll = next;
        self.flags.insert(PanelFlags::SCROLLING);
        true
    }

    /// Recompute scroll thumbs for a container of `size`.
    fn update_scroll_bars(&mut self, size: Vec2, thickness: f32) {
        let (w, h) = (size.x, size.y);
        let max = self.max_scroll;
        self.scroll_bar_x = (self.scroll_direction.contains(ScrollDirection::HORIZONTAL)
            && max.x > 0.0)
            .then(|| {
                let bar = (w * (w / (w + max.x))).max(1.0);
                let x = (self.scroll.x / max.x) * (w - bar);
                Rect::new(x, h - thickness, bar, thickness)
            });
        self.scroll_bar_y = (self.scroll_direction.contains(ScrollDirection::VERTICAL)
            && max.y > 0.0)
            .then(|| {
                let bar = (h * (h / (h + max.y))).max(1.0);
                let y = (-self.scroll.y / max.y) * (h - bar);
                Rect::new(w - thickness, y, thickness, bar)
            });
    }
}

/// One row of flow children.
#[derive(Default)]
struct RowBuilder {
    /// Children in the row.
    elements: Vec<RowItem>,
    /// Largest top margin.
    max_margin_top: f32,
    /// Largest bottom margin.
    max_margin_bottom: f32,
    /// Width used so far, margins included.
    x: f32,
    /// Tallest child.
    height: f32,
}

/// What the row builder needs to know about a child.
struct RowItem {
    /// Child node.
    id: NodeId,
    /// Child size.
    size: Vec2,
    /// Child margin.
    margin: Edges,
    /// Child inner offset.
    inner: Edges,
    /// Child positioning.
    positioning: Positioning,
}

impl RowBuilder {
    /// A new row holding `e`, however wide it is.
    fn starting_with(e: RowItem) -> Self {
        let mut row = Self::default();
        row.push(e);
        row
    }

    /// Add a child unless it would overflow `area_width`. The first child of
    /// an empty row is always accepted.
    fn add(&mut self, area_width: f32, e: RowItem) -> Result<(), RowItem> {
        if !self.elements.is_empty() && self.x + e.size.x + e.margin.horizontal() > area_width {
            return Err(e);
        }
        self.push(e);
        Ok(())
    }

    /// Append a child unconditionally.
    fn push(&mut self, e: RowItem) {
        let w = e.size.x + e.margin.horizontal();
        self.max_margin_top = self.max_margin_top.max(e.margin.top);
        self.max_margin_bottom = self.max_margin_bottom.max(e.margin.bottom);
        self.x += w;
        self.height = self.height.max(e.size.y);
        self.elements.push(e);
    }

    /// Row height with margins.
    fn height(&self) -> f32 {
        self.height + self.max_margin_top + self.max_margin_bottom
    }

    /// Write each child's flow offset, starting at `(x, y)`.
    fn place(&self, store: &mut dyn NodeStore, mut x: f32, y: f32) {
        for e in &self.elements {
            let mut ex = x + e.margin.left;
            if e.positioning == Positioning::Relative {
                ex += e.inner.left;
            }
            LayoutMut::new(store, e.id).set_row_layout_offset(Vec2::new(ex, y + self.max_margin_top));
            x += e.size.x + e.margin.horizontal();
        }
    }
}

/// Pack flow children into rows of at most `area_width`.
fn build_rows(store: &dyn NodeStore, children: &[NodeId], area_width: f32) -> Vec<RowBuilder> {
    let mut rows: Vec<RowBuilder> = Vec::new();
    for &c in children {
        let Some(cn) = store.get(c) else {
            continue;
        };
        if !cn.entity.active || !cn.layout.positioning.is_flow() {
            continue;
        }
        let item = RowItem {
            id: c,
            size: cn.pixel_size(),
            margin: cn.layout.margin,
            inner: cn.layout.inner_offset(),
            positioning: cn.layout.positioning,
        };
        let rejected = match rows.last_mut() {
            Some(row) => row.add(area_width, item).err(),
            None => Some(item),
        };
        if let Some(item) = rejected {
            rows.push(RowBuilder::starting_with(item));
        }
    }
    rows
}

/// Grow `bounds` to cover the sizes of the container's in-flow children.
/// Labels contribute their measured text, and fitting child containers
/// contribute their own content recursively.
pub(crate) fn content_bounds(store: &dyn NodeStore, id: NodeId, cx: &LayoutCx<'_>, bounds: &mut Vec2) {
    let Some(node) = store.get(id) else {
        return;
    };
    for &c in node.entity.children() {
        let Some(cn) = store.get(c) else {
            continue;
        };
        if !cn.entity.active
            || !cn.layout.positioning.is_flow()
            || cn.stylizer().is_some_and(|s| s.anchors_to_parent())
        {
            continue;
        }
        let size = match &cn.data {
            ElementData::Label(_) => {
                let mut s = label::measure(store, c, cx);
                s.x += 0.1;
                s
            }
            data => {
                if data.try_panel().is_some_and(|pd| pd.fit != ContentFit::None) {
                    content_bounds(store, c, cx, bounds);
                }
                cn.pixel_size()
            }
        };
        *bounds = bounds.max(size);
    }
}

/// Far corner of the active children placed outside the flow.
fn absolute_extents(store: &dyn NodeStore, children: &[NodeId]) -> Vec2 {
    children
        .iter()
        .filter_map(|c| store.get(*c))
        .filter(|cn| cn.entity.active && !cn.layout.positioning.is_flow())
        .fold(Vec2::ZERO, |acc, cn| {
            acc.max(cn.layout.calc_offset() + cn.pixel_size())
        })
}

/// The container post-layout hook: apply scroll requests, lay children out
/// in rows, fit to content and recompute the scroll range.
pub(crate) fn post_layout(store: &mut dyn NodeStore, id: NodeId, cx: &LayoutCx<'_>) {
    let Some(node) = store.get_mut(id) else {
        return;
    };
    if !node.entity.active_in_tree || node.entity.children.is_empty() {
        return;
    }
    let layout = node.layout;
    let size = node.pixel_size();
    let children = node.entity.children.clone();
    let Some(pd) = node.data.try_panel_mut() else {
        return;
    };
    let max = pd.max_scroll;
    if let Some(x) = pd.request_scroll_x {
        pd.scroll.x = x.clamp(0.0, max.x);
    }
    if let Some(y) = pd.request_scroll_y {
        pd.scroll.y = (-y).clamp(-max.y, 0.0);
    }
    let scroll = pd.scroll;
    let fit = pd.fit;
    let last_max = pd.max_scroll;

    let rows = build_rows(store, &children, size.x);
    let (pad, border) = (layout.padding, layout.border);
    let x = -scroll.x + pad.left + border.left;
    let mut y = scroll.y + pad.top + border.top;
    let mut bounds = Vec2::new(0.0, pad.top + border.top);
    for row in &rows {
        row.place(store, x, y);
        y += row.height();
        bounds.y += row.height();
        bounds.x = bounds.x.max(row.x);
    }

    let mut extents = Vec2::ZERO;
    if fit == ContentFit::None {
        extents = absolute_extents(store, &children);
    } else {
        content_bounds(store, id, cx, &mut bounds);
        let w = (bounds.x + pad.horizontal() + border.horizontal()).max(1.0);
        let h = (bounds.y + pad.bottom + border.bottom).max(1.0);
        let mut l = LayoutMut::new(store, id);
        match fit {
            ContentFit::Width => l.scale_width(w),
            ContentFit::Height => l.scale_height(h),
            _ => l.scale(w, h),
        };
    }

    let Some(node) = store.get_mut(id) else {
        return;
    };
    let size = node.pixel_size();
    let Some(pd) = node.data.try_panel_mut() else {
        return;
    };
    pd.absolute_extents = extents;
    pd.max_scroll = Vec2::new((bounds.x - size.x).max(0.0), (bounds.y - size.y).max(0.0));
    let clamped = Vec2::new(
        pd.scroll.x.clamp(0.0, pd.max_scroll.x),
        pd.scroll.y.clamp(-pd.max_scroll.y, 0.0),
    );
    let scroll_moved = !clamped.approx(pd.scroll);
    pd.scroll = clamped;
    let range_changed = !last_max.roughly(pd.max_scroll);
    if range_changed {
        mark_dirty(store, id, DirtyType::Generated);
    } else if scroll_moved {
        mark_dirty(store, id, DirtyType::Layout);
    }
}

/// Background quad for a container.
pub(crate) fn background(id: NodeId, node: &Node, pd: &PanelData) -> Option<DrawCommand> {
    if !pd.has_background() {
        return None;
    }
    let border_color = array::from_fn(|i| match pd.border_style[i] {
        BorderStyle::None | BorderStyle::Hidden => Color::TRANSPARENT,
        _ => pd.border_color[i],
    });
    Some(DrawCommand {
        node: id,
        rect: node.entity.rect(),
        z: node.entity.z,
        clip: node.clip,
        paint: Paint::Quad {
            texture: pd.texture.as_ref().map(|t| t.key.clone()),
            color: pd.color,
            uv: FULL_UV,
            border: node.layout.border,
            border_color,
            radius: pd.border_radius,
        },
    })
}

/// Draw commands for a container: background and visible scroll thumbs.
/// Consumes pending scroll requests.
pub(crate) fn render_panel(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    let size = node.pixel_size();
    let Some(pd) = node.data.try_panel_mut() else {
        return;
    };
    pd.request_scroll_x = None;
    pd.request_scroll_y = None;
    pd.update_scroll_bars(size, cx.config.scroll_bar_width);
    let pd = node.data.panel();
    let mut draws: Vec<DrawCommand> = background(id, node, pd).into_iter().collect();
    if pd.flags.contains(PanelFlags::BARS_VISIBLE) {
        let origin = node.entity.position;
        for bar in [pd.scroll_bar_x, pd.scroll_bar_y].into_iter().flatten() {
            draws.push(DrawCommand {
                node: id,
                rect: bar.shift(origin),
                z: node.entity.z + Z_STEP * 0.5,
                clip: node.clip,
                paint: Paint::flat(Color::GRAY),
            });
        }
    }
    node.draws = draws;
}

/// Per-tick container hook: scroll bar visibility and drag scrolling.
pub(crate) fn tick_panel(id: NodeId, node: &mut Node, frame: &FrameCx<'_>, scratch: &mut WorkerScratch) {
    let hovering = node.is_hovering();
    let is_down = node.is_down();
    let down_pos = node.down_pos;
    let Some(pd) = node.data.try_panel_mut() else {
        return;
    };
    let has_bars = pd.scroll_bar_x.is_some() || pd.scroll_bar_y.is_some();
    let show = hovering && has_bars;
    if show != pd.flags.contains(PanelFlags::BARS_VISIBLE) {
        pd.flags.set(PanelFlags::BARS_VISIBLE, show);
        scratch.dirty(id, DirtyType::ColorChange);
    }
    if pd.flags.contains(PanelFlags::FROZEN) {
        return;
    }
    if is_down && pd.flags.contains(PanelFlags::DRAGGING) {
        let d = frame.input.pointer - down_pos;
        let from = pd.drag_offset;
        if pd.scroll_by(from, Vec2::new(-d.x, d.y)) {
            scratch.dirty(id, DirtyType::Layout);
        }
    } else if pd.flags.contains(PanelFlags::DRAGGING) {
        pd.flags.remove(PanelFlags::DRAGGING);
    } else {
        pd.flags.remove(PanelFlags::SCROLLING);
    }
}

/// Wheel scrolling, run when a scroll event reaches the container.
pub(crate) fn on_wheel(man: &mut Manager, id: NodeId) {
    let delta = man.input.scroll * man.config.scroll_speed;
    let Some(pd) = man.nodes.get_mut(id).and_then(|n| n.data.try_panel_mut()) else {
        return;
    };
    if pd.flags.contains(PanelFlags::FROZEN) {
        return;
    }
    let from = pd.scroll;
    pd.drag_offset = from;
    if pd.scroll_by(from, delta) {
        mark_dirty(&mut man.nodes, id, DirtyType::Layout);
    }
}

/// Start a drag scroll, run when a press reaches the container.
pub(crate) fn on_down(man: &mut Manager, id: NodeId) {
    let Some(pd) = man.nodes.get_mut(id).and_then(|n| n.data.try_panel_mut()) else {
        return;
    };
    if pd.flags.contains(PanelFlags::ALLOW_DRAG_SCROLL) {
        pd.flags.insert(PanelFlags::DRAGGING);
        pd.drag_offset = pd.scroll;
    }
}

/// Does the container react to `ty` by itself?
pub(crate) fn handles(pd: &PanelData, ty: EventType) -> bool {
    match ty {
        EventType::Scroll => !pd.scroll_direction.is_empty(),
        EventType::Down => pd.flags.contains(PanelFlags::ALLOW_DRAG_SCROLL),
        _ => false,
    }
}

/// Mutable access to a container.
pub struct PanelMut<'a> {
    /// Owning manager.
    pub(crate) man: &'a mut Manager,
    /// Target node.
    pub(crate) id: NodeId,
}

impl PanelMut<'_> {
    /// The container data.
    fn pd(&mut self) -> &mut PanelData {
        self.man.nodes[self.id].data.panel_mut()
    }

    /// Read-only container data.
    pub fn data(&self) -> &PanelData {
        self.man.nodes[self.id].data.panel()
    }

    /// Mark the container dirty.
    fn mark(&mut self, level: DirtyType) {
        mark_dirty(&mut self.man.nodes, self.id, level);
    }

    /// Applied scroll, with `y` stored negative-down.
    pub fn scroll(&self) -> Vec2 {
        self.data().scroll
    }

    /// Horizontal scroll.
    pub fn scroll_x(&self) -> f32 {
        self.data().scroll.x
    }

    /// Vertical scroll, positive down.
    pub fn scroll_y(&self) -> f32 {
        -self.data().scroll.y
    }

    /// Largest scroll per axis.
    pub fn max_scroll(&self) -> Vec2 {
        self.data().max_scroll
    }

    /// Request a horizontal scroll. Applied, clamped, on the next
    /// stabilization.
    pub fn set_scroll_x(&mut self, x: f32) {
        self.pd().request_scroll_x = Some(x);
        self.mark(DirtyType::Layout);
    }

    /// Request a vertical scroll, positive down. Applied, clamped, on the
    /// next stabilization.
    pub fn set_scroll_y(&mut self, y: f32) {
        self.pd().request_scroll_y = Some(y);
        self.mark(DirtyType::Layout);
    }

    /// Scroll vertically just enough to bring a descendant into view.
    pub fn scroll_to_child(&mut self, child: NodeId) {
        if !is_ancestor(&self.man.nodes, self.id, child) {
            tracing::error!(?child, panel = ?self.id, "scroll target is not a descendant");
            return;
        }
        let (Some(p), Some(c)) = (self.man.nodes.get(self.id), self.man.nodes.get(child)) else {
            return;
        };
        let top = c.entity.position.y - p.entity.position.y;
        let bottom = top + c.pixel_size().y - p.pixel_size().y;
        let current = self.scroll_y();
        if top < 0.0 {
            self.set_scroll_y(current + top);
        } else if bottom > 0.0 {
            self.set_scroll_y(current + bottom);
        }
    }

    /// Jump back to the origin.
    pub fn reset_scroll(&mut self) {
        self.pd().scroll = Vec2::ZERO;
        self.mark(DirtyType::Layout);
    }

    /// Set the scroll axes.
    pub fn set_scroll_direction(&mut self, d: ScrollDirection) {
        if self.data().scroll_direction == d {
            return;
        }
        self.pd().scroll_direction = d;
        self.mark(DirtyType::Layout);
    }

    /// Set the overflow mode.
    pub fn set_overflow(&mut self, o: Overflow) {
        if self.data().overflow == o {
            return;
        }
        self.pd().overflow = o;
        self.mark(DirtyType::Layout);
    }

    /// Set the fit mode directly.
    pub fn set_fit(&mut self, fit: ContentFit) {
        if self.data().fit == fit {
            return;
        }
        self.pd().fit = fit;
        let level = if self.man.nodes[self.id].dirty.is_dirty() {
            DirtyType::Generated
        } else {
            DirtyType::Layout
        };
        self.mark(level);
    }

    /// Fit both axes to content.
    pub fn fit_content(&mut self) {
        self.set_fit(ContentFit::Both);
    }

    /// Fit the width to content, keeping the height mode.
    pub fn fit_content_width(&mut self) {
        let f = self.data().fit;
        self.set_fit(ContentFit::from_axes(true, f.fits_height()));
    }

    /// Fit the height to content, keeping the width mode.
    pub fn fit_content_height(&mut self) {
        let f = self.data().fit;
        self.set_fit(ContentFit::from_axes(f.fits_width(), true));
    }

    /// Stop fitting to content.
    pub fn dont_fit_content(&mut self) {
        self.pd().fit = ContentFit::None;
    }

    /// Stop fitting the width.
    pub fn dont_fit_content_width(&mut self) {
        let f = self.data().fit;
        self.pd().fit = ContentFit::from_axes(false, f.fits_height());
    }

    /// Stop fitting the height.
    pub fn dont_fit_content_height(&mut self) {
        let f = self.data().fit;
        self.pd().fit = ContentFit::from_axes(f.fits_width(), false);
    }

    /// Current background color.
    pub fn color(&self) -> Color {
        self.data().color
    }

    /// Set the background color. While a color is enforced, this replaces
    /// the color that will be restored once enforcement ends.
    pub fn set_color(&mut self, c: Color) {
        if let ElementData::Button(b) = &mut self.man.nodes[self.id].data {
            b.base = c;
        }
        let pd = self.pd();
        if let Some(base) = pd.enforced_colors.first_mut() {
            *base = c;
            return;
        }
        if pd.set_color_internal(c) {
            self.mark(DirtyType::ColorChange);
        }
    }

    /// Temporarily override the color, saving the current one.
    pub fn enforce_color(&mut self, c: Color) {
        let pd = self.pd();
        let current = pd.color;
        pd.enforced_colors.push(current);
        if pd.set_color_internal(c) {
            self.mark(DirtyType::ColorChange);
        }
    }

    /// Restore the color saved by the last enforcement.
    pub fn unenforce_color(&mut self) {
        let Some(c) = self.pd().enforced_colors.pop() else {
            return;
        };
        if self.pd().set_color_internal(c) {
            self.mark(DirtyType::ColorChange);
        }
    }

    /// Use a texture as the background. A texture that cannot be resolved is
    /// logged and leaves the container without a background texture.
    pub fn set_background(&mut self, key: &str) {
        let tex = match self.man.host.texture(key) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::error!(key, error = %e, "failed to load background texture");
                None
            }
        };
        self.pd().texture = tex;
        self.mark(DirtyType::ColorChange);
    }

    /// Drop the background texture.
    pub fn remove_background(&mut self) {
        if self.pd().texture.take().is_some() {
            self.mark(DirtyType::ColorChange);
        }
    }

    /// Set border widths.
    pub fn set_border_size(&mut self, e: Edges) {
        LayoutMut::new(&mut self.man.nodes, self.id).set_border(e);
    }

    /// Set border styles in left, top, right, bottom order.
    pub fn set_border_style(&mut self, s: [BorderStyle; 4]) {
        self.pd().border_style = s;
        self.mark(DirtyType::ColorChange);
    }

    /// Set border colors in left, top, right, bottom order.
    pub fn set_border_color(&mut self, c: [Color; 4]) {
        self.pd().border_color = c;
        self.mark(DirtyType::ColorChange);
    }

    /// Set corner radii.
    pub fn set_border_radius(&mut self, top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) {
        self.pd().border_radius = [top_left, top_right, bottom_right, bottom_left];
        self.mark(DirtyType::ColorChange);
    }

    /// Suspend scrolling.
    pub fn freeze(&mut self) {
        self.pd().flags.insert(PanelFlags::FROZEN);
    }

    /// Resume scrolling.
    pub fn unfreeze(&mut self) {
        self.pd().flags.remove(PanelFlags::FROZEN);
    }

    /// Is scrolling suspended?
    pub fn is_frozen(&self) -> bool {
        self.data().flags.contains(PanelFlags::FROZEN)
    }

    /// Did the scroll change this tick?
    pub fn is_scrolling(&self) -> bool {
        self.data().flags.contains(PanelFlags::SCROLLING)
    }

    /// Let drags scroll the content.
    pub fn enable_drag_scroll(&mut self) {
        self.pd().flags.insert(PanelFlags::ALLOW_DRAG_SCROLL);
    }

    /// Stop drags from scrolling the content.
    pub fn disable_drag_scroll(&mut self) {
        self.pd().flags.remove(PanelFlags::ALLOW_DRAG_SCROLL);
    }

    /// Let pointer presses pass through to whatever is behind.
    pub fn allow_click_through(&mut self) {
        self.pd().flags.insert(PanelFlags::ALLOW_CLICK_THROUGH);
    }

    /// Append a child.
    pub fn add_child(&mut self, child: NodeId) {
        self.man.add_child(self.id, child);
    }

    /// Insert a child at `index`.
    pub fn insert_child(&mut self, child: NodeId, index: usize) {
        self.man.insert_child(self.id, child, index);
    }

    /// Detach a child.
    pub fn remove_child(&mut self, child: NodeId) {
        self.man.remove_child(self.id, child);
    }

    /// Child at `index`.
    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.man.nodes[self.id].entity.children.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_close_on_overflow() {
        let mut row = RowBuilder::default();
        let item = |w: f32| RowItem {
            id: NodeId::default(),
            size: Vec2::new(w, 10.0),
            margin: Edges::new(0.0, 2.0, 0.0, 3.0),
            inner: Edges::ZERO,
            positioning: Positioning::Static,
        };
        assert!(row.add(100.0, item(40.0)).is_ok());
        assert!(row.add(100.0, item(40.0)).is_ok());
        assert!(row.add(100.0, item(40.0)).is_err());
        assert_eq!(row.x, 80.0);
        assert_eq!(row.height(), 15.0);

        let mut wide = RowBuilder::default();
        assert!(wide.add(100.0, item(400.0)).is_ok());
    }

    #[test]
    fn wheel_clamps() {
        let mut pd = PanelData {
            scroll_direction: ScrollDirection::BOTH,
            max_scroll: Vec2::new(50.0, 200.0),
            ..PanelData::default()
        };
        assert!(pd.scroll_by(pd.scroll, Vec2::new(0.0, -500.0)));
        assert_eq!(pd.scroll, Vec2::new(0.0, -200.0));
        assert!(pd.scroll_by(pd.scroll, Vec2::new(80.0, 30.0)));
        assert_eq!(pd.scroll, Vec2::new(50.0, -170.0));
        assert!(pd.flags.contains(PanelFlags::SCROLLING));
    }

    #[test]
    fn horizontal_only_remaps_wheel() {
        let mut pd = PanelData {
            scroll_direction: ScrollDirection::HORIZONTAL,
            max_scroll: Vec2::new(100.0, 0.0),
            ..PanelData::default()
        };
        assert!(pd.scroll_by(pd.scroll, Vec2::new(0.0, -20.0)));
        assert_eq!(pd.scroll, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn scroll_bar_geometry() {
        let mut pd = PanelData {
            scroll_direction: ScrollDirection::VERTICAL,
            max_scroll: Vec2::new(0.0, 100.0),
            scroll: Vec2::new(0.0, -100.0),
            ..PanelData::default()
        };
        pd.update_scroll_bars(Vec2::new(200.0, 100.0), 8.0);
        assert_eq!(pd.scroll_bar_x, None);
        assert_eq!(pd.scroll_bar_y, Some(Rect::new(192.0, 50.0, 8.0, 50.0)));
    }

    #[test]
    fn fit_axes() {
        assert_eq!(ContentFit::from_axes(true, false), ContentFit::Width);
        assert!(ContentFit::Both.fits_width() && ContentFit::Both.fits_height());
        assert!(!ContentFit::None.fits_height());
    }
}
