//! The manager owns the node arena and runs the per-frame protocol:
//! parallel stabilization of dirty trees, a barrier, parallel per-node
//! ticks, then single-threaded application of cross-node work and event
//! dispatch.

use std::{
    collections::{HashMap, HashSet},
    mem,
};

use arbor_geom::Vec2;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use slotmap::SlotMap;
use strum::EnumCount;

use crate::{
    core::{
        config::Config,
        dirty::{DirtyType, mark_dirty},
        error::{Error, Result},
        event::{EventCallback, EventType, InputState},
        frame::{Deferred, FrameCx, WorkerScratch},
        group::{EventGroup, EventRequest},
        host::Host,
        id::{EventId, NodeId},
        layout::{LayoutMut, Positioning},
        node::{Node, UiFlags},
        render::DrawCommand,
        stabilize::{self, LayoutCx, Report, reset_clips},
        store::{Subtree, is_ancestor, pre_order, root_of},
        style::Color,
        stylizer::{StretchCenter, Stylizer},
    },
    widgets::{
        self, ButtonData, CheckboxData, ContentFit, ElementData, ElementKind, ImageData, ImageMut,
        InputData, InputMut, Justify, LabelData, LabelMut, PanelData, PanelMut, ProgressBarData,
        SelectData, SelectMut, SelectOption, SliderData, slider,
    },
};

/// Frame and stabilization counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Frames processed.
    pub frames: u64,
    /// Stabilization passes run.
    pub stabilizations: u64,
    /// Passes that hit the round cap.
    pub convergence_failures: u64,
    /// Rounds used by the most recent pass.
    pub last_iterations: usize,
}

/// Owner of every node, and the driver of per-frame updates.
pub struct Manager {
    /// Node arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Host services.
    pub(crate) host: Host,
    /// Engine configuration.
    pub(crate) config: Config,
    /// Worker pool.
    pool: ThreadPool,
    /// One buffer per worker.
    scratch: Vec<WorkerScratch>,
    /// Events waiting for dispatch.
    group: EventGroup,
    /// Queue requested events rather than firing them immediately.
    deferred_events: bool,
    /// Input for the current frame.
    pub(crate) input: InputState,
    /// A window resize is pending.
    window_resized: bool,
    /// The window is minimized.
    minimized: bool,
    /// Nested update suspensions.
    update_disabled: usize,
    /// Next callback id.
    next_event_id: u64,
    /// Nested callback runs in progress.
    running: usize,
    /// Callbacks removed while their list was running.
    removed_events: Vec<EventId>,
    /// Counters.
    stats: Stats,
}

impl Manager {
    /// Create a manager, starting its worker pool.
    pub fn new(host: Host, config: Config) -> Result<Self> {
        config.validate()?;
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("arbor-worker-{i}"));
        if let Some(n) = config.worker_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        let threads = pool.current_num_threads().max(1);
        tracing::debug!(threads, "manager started");
        Ok(Self {
            nodes: SlotMap::with_key(),
            host,
            config,
            pool,
            scratch: (0..threads).map(|_| WorkerScratch::default()).collect(),
            group: EventGroup::default(),
            deferred_events: true,
            input: InputState::default(),
            window_resized: false,
            minimized: false,
            update_disabled: 0,
            next_event_id: 0,
            running: 0,
            removed_events: Vec::new(),
            stats: Stats::default(),
        })
    }

    /// Host services.
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Input for the current frame.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Counters.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Worker count.
    pub fn threads(&self) -> usize {
        self.scratch.len()
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Does the node exist?
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Are there no nodes?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Make room for `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.entity.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Topmost ancestor of a node.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        root_of(&self.nodes, id)
    }

    /// Look a node up, or fail with `NodeNotFound`.
    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Check that a node exists and has the expected kind.
    ///
    /// # Panics
    ///
    /// A kind mismatch is a logic error in the caller.
    fn expect_kind(&self, id: NodeId, kind: ElementKind) -> Result<()> {
        let actual = self.get(id)?.kind();
        assert!(actual == kind, "{id:?} is a {actual}, not a {kind}");
        Ok(())
    }

    /// Insert a node, attach it and mark it for layout.
    fn insert(&mut self, data: ElementData, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.insert(Node::new(data));
        if let Some(p) = parent {
            self.add_child(p, id);
        }
        mark_dirty(&mut self.nodes, id, DirtyType::Generated);
        tracing::debug!(?id, kind = %self.nodes[id].kind(), "node added");
        id
    }

    /// Insert a fixed-size container kind.
    fn insert_sized(&mut self, data: ElementData, parent: Option<NodeId>, size: Vec2) -> NodeId {
        let id = self.insert(data, parent);
        let node = &mut self.nodes[id];
        node.data.panel_mut().fit = ContentFit::None;
        node.scale(size.x, size.y);
        id
    }

    /// Add a container.
    pub fn add_panel(&mut self, parent: Option<NodeId>) -> NodeId {
        self.insert(ElementData::Panel(PanelData::default()), parent)
    }

    /// Add a text label.
    pub fn add_label(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        self.insert(ElementData::Label(LabelData::new(text)), parent)
    }

    /// Add a button with a centered caption.
    pub fn add_button(&mut self, parent: Option<NodeId>, text: &str, color: Color) -> NodeId {
        let data = ButtonData {
            panel: PanelData {
                color,
                ..PanelData::default()
            },
            base: color,
            label: None,
        };
        let id = self.insert_sized(ElementData::Button(data), parent, Vec2::new(100.0, 30.0));
        let label = self.add_label(Some(id), text);
        if let ElementData::Label(ld) = &mut self.nodes[label].data {
            ld.justify = Justify::Center;
            ld.wrap = false;
        }
        LayoutMut::new(&mut self.nodes, label).set_positioning(Positioning::Absolute);
        self.nodes[label].stylizer = Some(Box::new(StretchCenter));
        if let ElementData::Button(b) = &mut self.nodes[id].data {
            b.label = Some(label);
        }
        id
    }

    /// Add a checkbox.
    pub fn add_checkbox(&mut self, parent: Option<NodeId>, checked: bool) -> NodeId {
        let data = CheckboxData {
            checked,
            ..CheckboxData::default()
        };
        self.insert_sized(ElementData::Checkbox(data), parent, Vec2::new(20.0, 20.0))
    }

    /// Add an image, optionally showing a texture.
    pub fn add_image(&mut self, parent: Option<NodeId>, texture: Option<&str>) -> NodeId {
        let id = self.insert_sized(
            ElementData::Image(ImageData::default()),
            parent,
            Vec2::new(64.0, 64.0),
        );
        if let (Some(key), Ok(mut img)) = (texture, self.image_mut(id)) {
            img.set_texture(key);
        }
        id
    }

    /// Add a text input.
    pub fn add_input(&mut self, parent: Option<NodeId>, placeholder: &str) -> NodeId {
        let data = InputData {
            placeholder: placeholder.into(),
            ..InputData::default()
        };
        self.insert_sized(ElementData::Input(data), parent, Vec2::new(200.0, 30.0))
    }

    /// Add a slider.
    pub fn add_slider(&mut self, parent: Option<NodeId>) -> NodeId {
        self.insert_sized(
            ElementData::Slider(SliderData::default()),
            parent,
            Vec2::new(150.0, 20.0),
        )
    }

    /// Add a drop-down select.
    pub fn add_select(&mut self, parent: Option<NodeId>, text: &str, options: Vec<SelectOption>) -> NodeId {
        let data = SelectData {
            text: text.into(),
            options,
            ..SelectData::default()
        };
        self.insert_sized(ElementData::Select(data), parent, Vec2::new(150.0, 30.0))
    }

    /// Add a progress bar.
    pub fn add_progress_bar(&mut self, parent: Option<NodeId>) -> NodeId {
        self.insert_sized(
            ElementData::ProgressBar(ProgressBarData::default()),
            parent,
            Vec2::new(200.0, 20.0),
        )
    }

    /// Remove a node and its subtree. `Destroy` callbacks fire before the
    /// nodes go away.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.nodes.contains_key(id) {
            return;
        }
        if let Some(p) = self.nodes[id].entity.parent {
            self.remove_child(p, id);
        }
        let tree = pre_order(&self.nodes, id);
        for &n in &tree {
            self.execute_event(n, EventType::Destroy);
        }
        for n in &tree {
            if let Some(mut node) = self.nodes.remove(*n) {
                node.events.clear();
            }
        }
        tracing::debug!(?id, removed = tree.len(), "subtree destroyed");
    }

    /// Destroy every node.
    pub fn clear(&mut self) {
        for r in self.roots() {
            self.destroy(r);
        }
        self.group = EventGroup::default();
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let end = self.nodes.get(parent).map_or(0, |n| n.entity.children.len());
        self.insert_child(parent, child, end);
    }

    /// Insert `child` into `parent` at `index` (clamped), detaching it from
    /// any previous parent. Labels cannot hold children, and a node cannot
    /// be moved under its own descendant.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) {
        let (Some(p), true) = (self.nodes.get(parent), self.nodes.contains_key(child)) else {
            tracing::error!(?parent, ?child, "insert_child on a missing node");
            return;
        };
        if !p.data.is_panel() || parent == child || is_ancestor(&self.nodes, child, parent) {
            tracing::error!(?parent, ?child, "invalid parent for child");
            return;
        }
        if let Some(old) = self.nodes[child].entity.parent {
            self.remove_child(old, child);
        }
        let children = &mut self.nodes[parent].entity.children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child].entity.parent = Some(parent);
        mark_dirty(&mut self.nodes, parent, DirtyType::Generated);
        mark_dirty(&mut self.nodes, child, DirtyType::Generated);
    }

    /// Detach `child` from `parent`. The child becomes a root with an
    /// unbounded clip.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(p) = self.nodes.get_mut(parent) else {
            return;
        };
        if p.entity.remove_child(child).is_none() {
            return;
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.entity.parent = None;
        }
        reset_clips(&mut self.nodes, child);
        mark_dirty(&mut self.nodes, parent, DirtyType::Generated);
        mark_dirty(&mut self.nodes, child, DirtyType::Generated);
    }

    /// Child of `parent` at `index`.
    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(parent)?.entity.children.get(index).copied()
    }

    /// Activate or deactivate a node. Deactivated nodes keep their place in
    /// the tree but are skipped by layout flow, hit testing and drawing.
    pub fn set_active(&mut self, id: NodeId, active: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.entity.active == active {
            return;
        }
        node.entity.active = active;
        if !active {
            node.flags
                .remove(UiFlags::HOVERING | UiFlags::IS_DOWN | UiFlags::IS_RIGHT_DOWN | UiFlags::DRAG);
            if let ElementData::Input(inp) = &mut node.data {
                inp.blur();
            }
        }
        let parent = node.entity.parent;
        mark_dirty(&mut self.nodes, id, DirtyType::Generated);
        if let Some(p) = parent {
            mark_dirty(&mut self.nodes, p, DirtyType::Layout);
        }
    }

    /// Activate a node.
    pub fn show(&mut self, id: NodeId) {
        self.set_active(id, true);
    }

    /// Deactivate a node.
    pub fn hide(&mut self, id: NodeId) {
        self.set_active(id, false);
    }

    /// Edit a node's layout record.
    pub fn layout_mut(&mut self, id: NodeId) -> Result<LayoutMut<'_>> {
        self.get(id)?;
        Ok(LayoutMut::new(&mut self.nodes, id))
    }

    /// Container operations on a node.
    ///
    /// # Panics
    ///
    /// Labels are not containers.
    pub fn panel_mut(&mut self, id: NodeId) -> Result<PanelMut<'_>> {
        assert!(self.get(id)?.data.is_panel(), "{id:?} is a label, not a container");
        Ok(PanelMut { man: self, id })
    }

    /// Label operations on a node.
    ///
    /// # Panics
    ///
    /// If the node is not a label.
    pub fn label_mut(&mut self, id: NodeId) -> Result<LabelMut<'_>> {
        self.expect_kind(id, ElementKind::Label)?;
        Ok(LabelMut { man: self, id })
    }

    /// Image operations on a node.
    ///
    /// # Panics
    ///
    /// If the node is not an image.
    pub fn image_mut(&mut self, id: NodeId) -> Result<ImageMut<'_>> {
        self.expect_kind(id, ElementKind::Image)?;
        Ok(ImageMut { man: self, id })
    }

    /// Input operations on a node.
    ///
    /// # Panics
    ///
    /// If the node is not an input.
    pub fn input_mut(&mut self, id: NodeId) -> Result<InputMut<'_>> {
        self.expect_kind(id, ElementKind::Input)?;
        Ok(InputMut { man: self, id })
    }

    /// Select operations on a node.
    ///
    /// # Panics
    ///
    /// If the node is not a select.
    pub fn select_mut(&mut self, id: NodeId) -> Result<SelectMut<'_>> {
        self.expect_kind(id, ElementKind::Select)?;
        Ok(SelectMut { man: self, id })
    }

    /// Set a slider's value.
    ///
    /// # Panics
    ///
    /// If the node is not a slider.
    pub fn set_slider_value(&mut self, id: NodeId, value: f32) -> Result<()> {
        self.expect_kind(id, ElementKind::Slider)?;
        slider::set_value(self, id, value);
        Ok(())
    }

    /// Check or uncheck a checkbox. Requests `Change` when the state flips.
    ///
    /// # Panics
    ///
    /// If the node is not a checkbox.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<()> {
        self.expect_kind(id, ElementKind::Checkbox)?;
        if let ElementData::Checkbox(cb) = &mut self.nodes[id].data {
            if cb.checked == checked {
                return Ok(());
            }
            cb.checked = checked;
        }
        mark_dirty(&mut self.nodes, id, DirtyType::ColorChange);
        self.request_event(id, EventType::Change);
        Ok(())
    }

    /// Set a progress bar's value, clamped to `[0, 1]`.
    ///
    /// # Panics
    ///
    /// If the node is not a progress bar.
    pub fn set_progress(&mut self, id: NodeId, value: f32) -> Result<()> {
        self.expect_kind(id, ElementKind::ProgressBar)?;
        if let ElementData::ProgressBar(p) = &mut self.nodes[id].data {
            p.value = value.clamp(0.0, 1.0);
        }
        mark_dirty(&mut self.nodes, id, DirtyType::ColorChange);
        Ok(())
    }

    /// Attach or clear a stylizer.
    pub fn set_stylizer(&mut self, id: NodeId, stylizer: Option<Box<dyn Stylizer>>) -> Result<()> {
        self.get(id)?;
        self.nodes[id].stylizer = stylizer;
        mark_dirty(&mut self.nodes, id, DirtyType::Resize);
        Ok(())
    }

    /// Exclude a node's tree from stabilization, or include it again.
    pub fn set_dont_clean(&mut self, id: NodeId, dont_clean: bool) -> Result<()> {
        self.get(id)?;
        self.nodes[id].flags.set(UiFlags::DONT_CLEAN, dont_clean);
        Ok(())
    }

    /// Mark a node dirty.
    pub fn mark_dirty(&mut self, id: NodeId, level: DirtyType) {
        mark_dirty(&mut self.nodes, id, level);
    }

    /// Give a node a lookup name.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.get(id)?;
        self.nodes[id].entity.name = name.into();
        Ok(())
    }

    /// First node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.entity.name == name)
            .map(|(id, _)| id)
    }

    /// Copy a node's kind data, layout and stylizer, and its subtree, into
    /// new nodes under `parent`. Callbacks are not copied.
    pub fn clone_node(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<NodeId> {
        let src = self.get(id)?;
        let (data, layout, stylizer, size, name, active) = (
            src.data.clone(),
            src.layout,
            src.stylizer.clone(),
            src.pixel_size(),
            src.entity.name.clone(),
            src.entity.active,
        );
        let children = src.entity.children.clone();
        let copy = self.insert(data, parent);
        {
            let node = &mut self.nodes[copy];
            node.layout = layout;
            node.stylizer = stylizer;
            node.entity.size = size;
            node.entity.name = name;
            node.entity.active = active;
        }
        let mut mapping = HashMap::new();
        for c in children {
            mapping.insert(c, self.clone_node(c, Some(copy))?);
        }
        if let ElementData::Button(b) = &mut self.nodes[copy].data {
            b.label = b.label.and_then(|l| mapping.get(&l).copied());
        }
        Ok(copy)
    }

    /// Is `a` drawn in front of `b`?
    pub fn is_in_front_of(&self, a: NodeId, b: NodeId) -> bool {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(a), Some(b)) => a.entity.z > b.entity.z,
            _ => false,
        }
    }

    /// Register a callback.
    pub fn add_event(
        &mut self,
        id: NodeId,
        ty: EventType,
        cb: impl FnMut(&mut Self, NodeId) + Send + 'static,
    ) -> Result<EventId> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        let eid = EventId(self.next_event_id);
        self.next_event_id += 1;
        let cb: EventCallback = Box::new(cb);
        node.events.add(ty, eid, cb);
        Ok(eid)
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn remove_event(&mut self, id: NodeId, eid: EventId) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.events.remove(eid) {
            return true;
        }
        if self.running > 0 {
            self.removed_events.push(eid);
            return true;
        }
        false
    }

    /// Run the kind's built-in reaction and every callback for `ty` now.
    /// Returns false if the node is missing.
    pub fn execute_event(&mut self, id: NodeId, ty: EventType) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        widgets::react(self, id, ty);
        let Some(node) = self.nodes.get_mut(id) else {
            return true;
        };
        let mut cbs = node.events.take(ty);
        if cbs.is_empty() {
            return true;
        }
        let mark = self.removed_events.len();
        self.running += 1;
        for (_, cb) in &mut cbs {
            cb(self, id);
        }
        self.running -= 1;
        let removed = self.removed_events.split_off(mark);
        if let Some(node) = self.nodes.get_mut(id) {
            node.events.restore(ty, cbs, &removed);
        }
        true
    }

    /// Ask for `ty` to fire on a node. Returns false when nothing on the
    /// node reacts to it. Requests are queued until the end of the frame,
    /// unless deferred events are turned off.
    pub fn request_event(&mut self, id: NodeId, ty: EventType) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if !widgets::handles(node, ty) {
            return false;
        }
        if self.deferred_events {
            self.group.push(EventRequest {
                node: id,
                ty,
                z: node.entity.z,
            });
        } else {
            self.execute_event(id, ty);
        }
        true
    }

    /// Queue requested events (the default) or fire them synchronously.
    pub fn set_deferred_events(&mut self, deferred: bool) {
        self.deferred_events = deferred;
    }

    /// Give an input focus, blurring every other input.
    pub fn focus_input(&mut self, id: NodeId) {
        let blink = self.config.cursor_blink_rate;
        let mut touched = Vec::new();
        for (nid, node) in &mut self.nodes {
            if let ElementData::Input(inp) = &mut node.data {
                if nid == id {
                    inp.focus(blink);
                    touched.push(nid);
                } else if inp.focused {
                    inp.blur();
                    touched.push(nid);
                }
            }
        }
        for n in touched {
            mark_dirty(&mut self.nodes, n, DirtyType::ColorChange);
        }
    }

    /// Focus the next active input after `id` in tree order, wrapping.
    fn focus_next_input(&mut self, id: NodeId) {
        let order = pre_order(&self.nodes, root_of(&self.nodes, id));
        let Some(at) = order.iter().position(|n| *n == id) else {
            return;
        };
        let next = order[at + 1..]
            .iter()
            .chain(&order[..at])
            .copied()
            .find(|n| {
                self.nodes
                    .get(*n)
                    .is_some_and(|node| node.kind() == ElementKind::Input && node.entity.active_in_tree)
            });
        if let Some(n) = next {
            self.focus_input(n);
        }
    }

    /// Active, hovered nodes with a paintable background, as of the last
    /// frame.
    pub fn hovered(&self) -> Vec<NodeId> {
        self.scratch.iter().flat_map(|s| s.hovered.iter().copied()).collect()
    }

    /// Retained draw commands of every active node, back to front.
    pub fn draw_list(&self) -> Vec<&DrawCommand> {
        let mut out: Vec<&DrawCommand> = self
            .nodes
            .values()
            .filter(|n| n.entity.active_in_tree)
            .flat_map(|n| n.draws.iter())
            .collect();
        out.sort_by(|a, b| a.z.total_cmp(&b.z));
        out
    }

    /// Suspend frame updates. Calls nest.
    pub fn disable_update(&mut self) {
        self.update_disabled += 1;
    }

    /// Undo one `disable_update`.
    pub fn enable_update(&mut self) {
        self.update_disabled = self.update_disabled.saturating_sub(1);
    }

    /// Are frame updates suspended?
    pub fn is_update_disabled(&self) -> bool {
        self.update_disabled > 0
    }

    /// Record a new window size. Roots relayout on the next frame, even if
    /// updates are suspended.
    pub fn window_resized(&mut self, size: Vec2) {
        self.host.set_window(size);
        self.window_resized = true;
    }

    /// Record the window being minimized or restored. No frames run while
    /// minimized.
    pub fn window_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }

    /// Layout services for sequential passes.
    fn layout_cx(&self) -> LayoutCx<'_> {
        LayoutCx {
            host: &self.host,
            config: &self.config,
        }
    }

    /// Stabilize the tree containing `id` on the calling thread.
    pub fn clean(&mut self, id: NodeId) -> Option<Report> {
        let cx = LayoutCx {
            host: &self.host,
            config: &self.config,
        };
        let report = stabilize::stabilize(&mut self.nodes, id, &cx);
        self.count(report.as_ref());
        report
    }

    /// Stabilize the tree containing `id` only if something in it is dirty.
    pub fn clean_if_needed(&mut self, id: NodeId) -> Option<Report> {
        let cx = LayoutCx {
            host: &self.host,
            config: &self.config,
        };
        let report = stabilize::clean_if_needed(&mut self.nodes, id, &cx);
        self.count(report.as_ref());
        report
    }

    /// Measured text size of a label, zero for other kinds.
    pub fn measure_label(&self, id: NodeId) -> Vec2 {
        widgets::label::measure(&self.nodes, id, &self.layout_cx())
    }

    /// Fold a pass report into the counters.
    fn count(&mut self, report: Option<&Report>) {
        let Some(r) = report else {
            return;
        };
        self.stats.stabilizations += 1;
        self.stats.last_iterations = r.iterations;
        if !r.converged {
            self.stats.convergence_failures += 1;
        }
    }

    /// Run one frame.
    pub fn update(&mut self, input: InputState, dt: f64) {
        if self.minimized || (self.update_disabled > 0 && !self.window_resized) {
            return;
        }
        let _span = tracing::trace_span!("frame", n = self.stats.frames).entered();
        self.input = input;
        if mem::take(&mut self.window_resized) {
            self.on_resize();
        }
        let stabilized = self.stabilize_all();
        for (id, node) in &self.nodes {
            if node.entity.active_in_tree
                && !node.events.is_empty(EventType::Render)
                && stabilized.contains(&root_of(&self.nodes, id))
            {
                self.group.push(EventRequest {
                    node: id,
                    ty: EventType::Render,
                    z: node.entity.z,
                });
            }
        }
        self.tick(dt);
        self.apply_deferred();
        self.dispatch();
        self.stats.frames += 1;
    }

    /// Relayout every root and rerender text after a resize.
    fn on_resize(&mut self) {
        let roots = self.roots();
        for r in roots {
            mark_dirty(&mut self.nodes, r, DirtyType::Resize);
        }
        let inputs: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.kind() == ElementKind::Input)
            .map(|(id, _)| id)
            .collect();
        for id in inputs {
            mark_dirty(&mut self.nodes, id, DirtyType::ColorChange);
        }
    }

    /// Phase 1: stabilize every dirty tree, one tree per task. Returns the
    /// roots that were stabilized.
    fn stabilize_all(&mut self) -> HashSet<NodeId> {
        let _span = tracing::trace_span!("stabilize_all").entered();
        let roots: HashMap<NodeId, NodeId> = self
            .nodes
            .keys()
            .map(|id| (id, root_of(&self.nodes, id)))
            .collect();
        let mut trees: HashMap<NodeId, Subtree<'_>> = HashMap::new();
        for (id, node) in &mut self.nodes {
            let root = roots.get(&id).copied().unwrap_or(id);
            trees
                .entry(root)
                .or_insert_with(|| Subtree::new(root))
                .insert(id, node);
        }
        let mut work: Vec<Subtree<'_>> = trees.into_values().filter(Subtree::is_dirty).collect();
        let cx = LayoutCx {
            host: &self.host,
            config: &self.config,
        };
        let reports: Vec<Option<Report>> = self.pool.install(|| {
            work.par_iter_mut()
                .map(|t| {
                    let root = t.root();
                    stabilize::stabilize(t, root, &cx)
                })
                .collect()
        });
        let mut done = HashSet::new();
        for r in reports.iter().flatten() {
            done.insert(r.root);
            self.count(Some(r));
        }
        done
    }

    /// Phase 2: tick every node, the arena split into one contiguous chunk
    /// per worker.
    fn tick(&mut self, dt: f64) {
        let _span = tracing::trace_span!("tick").entered();
        for s in &mut self.scratch {
            s.clear();
        }
        let threads = self.scratch.len();
        let mut refs: Vec<(NodeId, &mut Node)> = self.nodes.iter_mut().collect();
        let chunk = refs.len().div_ceil(threads).max(1);
        let frame = FrameCx {
            input: &self.input,
            config: &self.config,
            dt,
            window: self.host.window(),
        };
        let scratch = &mut self.scratch;
        self.pool.install(|| {
            refs.par_chunks_mut(chunk)
                .zip(scratch.par_iter_mut())
                .for_each(|(nodes, scratch)| {
                    for (id, node) in nodes {
                        widgets::tick(*id, node, &frame, scratch);
                    }
                });
        });
    }

    /// Apply cross-node work gathered during the tick, then queue the
    /// tick's event requests.
    fn apply_deferred(&mut self) {
        let mut deferred = Vec::new();
        let mut requests = Vec::new();
        for s in &mut self.scratch {
            deferred.append(&mut s.deferred);
            requests.append(&mut s.requests);
        }
        for d in deferred {
            match d {
                Deferred::Dirty(id, level) => mark_dirty(&mut self.nodes, id, level),
                Deferred::Request(id, ty) => {
                    if let Some(node) = self.nodes.get(id).filter(|n| widgets::handles(n, ty)) {
                        requests.push(EventRequest {
                            node: id,
                            ty,
                            z: node.entity.z,
                        });
                    }
                }
                Deferred::ResetHover(id) => {
                    if let Some(node) = self.nodes.get_mut(id) {
                        node.flags.remove(UiFlags::HOVERING);
                    }
                }
                Deferred::FocusNext(id) => self.focus_next_input(id),
            }
        }
        for r in requests {
            self.group.push(r);
        }
    }

    /// Fire queued events front to back. Claimable pointer events go to the
    /// front-most requester. A receiver with no callbacks of its own for the
    /// type, only a built-in reaction, lets the event continue to its direct
    /// parent if the parent asked for it too. Nodes that allow click-through
    /// never claim.
    fn dispatch(&mut self) {
        let reqs = self.group.drain_sorted();
        if reqs.is_empty() {
            return;
        }
        let _span = tracing::trace_span!("dispatch", events = reqs.len()).entered();
        let mut available = [true; EventType::COUNT];
        let mut last: [Option<NodeId>; EventType::COUNT] = [None; EventType::COUNT];
        for r in reqs {
            let Some(node) = self.nodes.get(r.node) else {
                continue;
            };
            if !r.ty.is_claimable() {
                self.execute_event(r.node, r.ty);
                continue;
            }
            let slot = r.ty as usize;
            if !available[slot] {
                continue;
            }
            let click_through = node
                .data
                .try_panel()
                .is_some_and(|pd| pd.flags().contains(widgets::PanelFlags::ALLOW_CLICK_THROUGH));
            if click_through {
                self.execute_event(r.node, r.ty);
                continue;
            }
            let has_callbacks = !node.events.is_empty(r.ty);
            let blocked = last[slot]
                .replace(r.node)
                .is_some_and(|prev| self.nodes.get(prev).and_then(|n| n.entity.parent) != Some(r.node));
            if blocked {
                available[slot] = false;
                continue;
            }
            self.execute_event(r.node, r.ty);
            if has_callbacks {
                available[slot] = false;
            }
        }
    }
}
