//! Widget kinds. Every kind is a variant of [`ElementData`]; behavior is
//! dispatched by matching on it. All kinds except labels are containers and
//! expose their [`PanelData`].

use strum::{Display, EnumDiscriminants, EnumIter};

/// Push buttons.
pub mod button;
/// Checkboxes.
pub mod checkbox;
/// Images and animations.
pub mod image;
/// Text inputs.
pub mod input;
/// Text labels.
pub mod label;
/// Containers.
pub mod panel;
/// Progress bars.
pub mod progress;
/// Drop-down selects.
pub mod select;
/// Sliders.
pub mod slider;

pub use button::ButtonData;
pub use checkbox::CheckboxData;
pub use image::{ImageData, ImageMut, SpriteClip, SpriteFrame};
pub use input::{InputData, InputKind, InputMut};
pub use label::{Baseline, ColorRange, Justify, LabelData, LabelMut};
pub use panel::{ContentFit, Overflow, PanelData, PanelFlags, PanelMut, ScrollDirection};
pub use progress::ProgressBarData;
pub use select::{SelectData, SelectMut, SelectOption};
pub use slider::SliderData;

use crate::core::{
    event::EventType,
    frame::{FrameCx, WorkerScratch},
    id::NodeId,
    manager::Manager,
    node::Node,
    pointer,
    stabilize::LayoutCx,
    store::NodeStore,
};

/// Kind-specific node data.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(ElementKind), derive(Hash, Display, EnumIter))]
pub enum ElementData {
    /// A plain container.
    Panel(PanelData),
    /// Text.
    Label(LabelData),
    /// A push button.
    Button(ButtonData),
    /// A checkbox.
    Checkbox(CheckboxData),
    /// An image.
    Image(ImageData),
    /// A text input.
    Input(InputData),
    /// A slider.
    Slider(SliderData),
    /// A drop-down select.
    Select(SelectData),
    /// A progress bar.
    ProgressBar(ProgressBarData),
}

impl ElementData {
    /// Container data, for every kind but labels.
    pub fn try_panel(&self) -> Option<&PanelData> {
        match self {
            Self::Panel(p) => Some(p),
            Self::Label(_) => None,
            Self::Button(b) => Some(&b.panel),
            Self::Checkbox(c) => Some(&c.panel),
            Self::Image(i) => Some(&i.panel),
            Self::Input(i) => Some(&i.panel),
            Self::Slider(s) => Some(&s.panel),
            Self::Select(s) => Some(&s.panel),
            Self::ProgressBar(p) => Some(&p.panel),
        }
    }

    /// Mutable container data, for every kind but labels.
    pub fn try_panel_mut(&mut self) -> Option<&mut PanelData> {
        match self {
            Self::Panel(p) => Some(p),
            Self::Label(_) => None,
            Self::Button(b) => Some(&mut b.panel),
            Self::Checkbox(c) => Some(&mut c.panel),
            Self::Image(i) => Some(&mut i.panel),
            Self::Input(i) => Some(&mut i.panel),
            Self::Slider(s) => Some(&mut s.panel),
            Self::Select(s) => Some(&mut s.panel),
            Self::ProgressBar(p) => Some(&mut p.panel),
        }
    }

    /// Container data.
    ///
    /// # Panics
    ///
    /// Labels are not containers; asking one for its container data is a
    /// logic error.
    pub fn panel(&self) -> &PanelData {
        match self.try_panel() {
            Some(p) => p,
            None => panic!("labels have no container data"),
        }
    }

    /// Mutable container data.
    ///
    /// # Panics
    ///
    /// As for [`ElementData::panel`].
    pub fn panel_mut(&mut self) -> &mut PanelData {
        match self.try_panel_mut() {
            Some(p) => p,
            None => panic!("labels have no container data"),
        }
    }

    /// Is this a container kind?
    pub fn is_panel(&self) -> bool {
        !matches!(self, Self::Label(_))
    }
}

impl From<PanelData> for ElementData {
    fn from(p: PanelData) -> Self {
        Self::Panel(p)
    }
}

impl From<LabelData> for ElementData {
    fn from(l: LabelData) -> Self {
        Self::Label(l)
    }
}

/// Kind-specific work before a node is positioned.
pub(crate) fn prepare(node: &mut Node, _cx: &LayoutCx<'_>) {
    match node.data {
        ElementData::Slider(_) => slider::prepare(node),
        ElementData::Select(_) => select::prepare(node),
        _ => {}
    }
}

/// Kind-specific work after a node is positioned.
pub(crate) fn post_layout(store: &mut dyn NodeStore, id: NodeId, cx: &LayoutCx<'_>) {
    let Some(node) = store.get(id) else {
        return;
    };
    if node.data.is_panel() {
        panel::post_layout(store, id, cx);
    } else {
        label::post_layout(store, id, cx);
    }
}

/// Rebuild a node's retained draw commands.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    if !node.entity.active_in_tree {
        node.draws.clear();
        return;
    }
    match node.data {
        ElementData::Label(_) => label::render(id, node, cx),
        ElementData::Checkbox(_) => checkbox::render(id, node, cx),
        ElementData::Image(_) => image::render(id, node, cx),
        ElementData::Input(_) => input::render(id, node, cx),
        ElementData::Slider(_) => slider::render(id, node, cx),
        ElementData::Select(_) => select::render(id, node, cx),
        ElementData::ProgressBar(_) => progress::render(id, node, cx),
        ElementData::Panel(_) | ElementData::Button(_) => panel::render_panel(id, node, cx),
    }
}

/// Does the kind react to `ty` without any registered callback?
pub(crate) fn has_builtin(node: &Node, ty: EventType) -> bool {
    let kind = match &node.data {
        ElementData::Label(_) => false,
        ElementData::Button(_) => button::handles(ty),
        ElementData::Checkbox(_) => checkbox::handles(ty),
        ElementData::Input(_) => input::handles(ty),
        ElementData::Slider(_) => slider::handles(ty),
        ElementData::Select(_) => select::handles(ty),
        ElementData::Panel(_) | ElementData::Image(_) | ElementData::ProgressBar(_) => false,
    };
    kind || node.data.try_panel().is_some_and(|pd| panel::handles(pd, ty))
}

/// Does anything on the node react to `ty`?
pub(crate) fn handles(node: &Node, ty: EventType) -> bool {
    !node.events.is_empty(ty) || has_builtin(node, ty)
}

/// Per-tick update of one node, run on a worker thread. Only the node itself
/// is touched; everything else goes through `scratch`.
pub(crate) fn tick(id: NodeId, node: &mut Node, frame: &FrameCx<'_>, scratch: &mut WorkerScratch) {
    pointer::pointer_events(id, node, frame, scratch);
    if !node.entity.active_in_tree {
        return;
    }
    if node.is_hovering() && node.data.try_panel().is_some_and(PanelData::has_background) {
        scratch.hovered.push(id);
    }
    if node.data.is_panel() {
        panel::tick_panel(id, node, frame, scratch);
    }
    match node.data {
        ElementData::Image(_) => image::tick(id, node, frame, scratch),
        ElementData::Input(_) => input::tick(id, node, frame, scratch),
        ElementData::Slider(_) => slider::tick(id, node, frame, scratch),
        _ => {}
    }
}

/// Run the kind's built-in reaction to an event being dispatched.
pub(crate) fn react(man: &mut Manager, id: NodeId, ty: EventType) {
    let Some(node) = man.nodes.get(id) else {
        return;
    };
    if !has_builtin(node, ty) {
        return;
    }
    let kind = node.kind();
    let scrolls = node.data.try_panel().is_some_and(|pd| panel::handles(pd, ty));
    match kind {
        ElementKind::Button => button::react(man, id, ty),
        ElementKind::Checkbox => checkbox::react(man, id, ty),
        ElementKind::Input => input::react(man, id, ty),
        ElementKind::Slider => slider::react(man, id, ty),
        ElementKind::Select => select::react(man, id, ty),
        _ => {}
    }
    if scrolls {
        match ty {
            EventType::Scroll => panel::on_wheel(man, id),
            EventType::Down => panel::on_down(man, id),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_kind_but_label_is_a_container() {
        let samples = [
            ElementData::Panel(PanelData::default()),
            ElementData::Label(LabelData::default()),
            ElementData::Button(ButtonData::default()),
            ElementData::Checkbox(CheckboxData::default()),
            ElementData::Image(ImageData::default()),
            ElementData::Input(InputData::default()),
            ElementData::Slider(SliderData::default()),
            ElementData::Select(SelectData::default()),
            ElementData::ProgressBar(ProgressBarData::default()),
        ];
        assert_eq!(samples.len(), ElementKind::iter().count());
        for s in &samples {
            assert_eq!(s.try_panel().is_some(), ElementKind::from(s) != ElementKind::Label);
        }
    }

    #[test]
    #[should_panic(expected = "labels have no container data")]
    fn label_panel_access_panics() {
        ElementData::Label(LabelData::default()).panel();
    }

    #[test]
    fn builtin_reactions() {
        let mut pd = PanelData::default();
        let plain = Node::new(ElementData::Panel(pd.clone()));
        assert!(!handles(&plain, EventType::Scroll));
        pd.scroll_direction = ScrollDirection::VERTICAL;
        let scrolling = Node::new(ElementData::Panel(pd));
        assert!(handles(&scrolling, EventType::Scroll));
        let input = Node::new(ElementData::Input(InputData::default()));
        assert!(handles(&input, EventType::Click));
        assert!(!handles(&input, EventType::Scroll));
    }
}
