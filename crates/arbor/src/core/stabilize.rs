//! The bounded fixed-point pass that brings a tree's geometry, clip
//! rectangles and draw commands up to date.

use arbor_geom::{Clip, Rect, Vec2};

use crate::{
    core::{
        config::Config,
        dirty::DirtyType,
        host::Host,
        id::NodeId,
        layout::{LayoutMut, Positioning},
        node::UiFlags,
        store::{NodeStore, pre_order, root_of},
        stylizer::StyleContext,
    },
    widgets::{self, Overflow},
};

/// Depth added per tree level so children sort in front of their parent.
pub const Z_STEP: f32 = 0.01;

/// Read-only services available to layout hooks.
#[derive(Clone, Copy)]
pub struct LayoutCx<'a> {
    /// Host services.
    pub host: &'a Host,
    /// Engine configuration.
    pub config: &'a Config,
}

/// Outcome of one stabilization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Root of the stabilized tree.
    pub root: NodeId,
    /// Number of nodes visited per round.
    pub nodes: usize,
    /// Rounds run.
    pub iterations: usize,
    /// Did the tree settle before the round cap?
    pub converged: bool,
}

/// Stabilize the tree containing `id`, starting from its topmost ancestor.
///
/// Every round clears each node's dirty level, recomputes its layout and runs
/// its post-layout hook, in pre-order. Rounds repeat until one ends with every
/// node clean or the configured cap is reached. Hitting the cap is not fatal:
/// the tree keeps its best-effort geometry and the report says so. Afterwards
/// clip rectangles and draw commands are regenerated top-down.
///
/// Returns `None` when the node is missing or flagged to skip cleaning.
pub fn stabilize(store: &mut dyn NodeStore, id: NodeId, cx: &LayoutCx<'_>) -> Option<Report> {
    if store
        .get(id)
        .is_none_or(|n| n.flags.contains(UiFlags::DONT_CLEAN))
    {
        return None;
    }
    let root = root_of(store, id);
    let tree = pre_order(store, root);
    let _span = tracing::trace_span!("stabilize", nodes = tree.len()).entered();

    let mut iterations = 0;
    let mut stable = false;
    while !stable && iterations < cx.config.max_iterations {
        stable = true;
        for &n in &tree {
            if let Some(node) = store.get_mut(n) {
                node.dirty = DirtyType::None;
            }
            update_layout(store, n, cx);
            widgets::post_layout(store, n, cx);
            stable &= store.get(n).is_none_or(|node| !node.dirty.is_dirty());
        }
        iterations += 1;
    }
    if !stable {
        tracing::warn!(
            ?root,
            iterations,
            "layout did not converge; keeping best-effort geometry"
        );
    }

    for &n in &tree {
        generate_clip(store, n);
        if let Some(node) = store.get_mut(n) {
            widgets::render(n, node, cx);
        }
    }
    Some(Report {
        root,
        nodes: tree.len(),
        iterations,
        converged: stable,
    })
}

/// Stabilize only if some node in the tree is dirty.
pub fn clean_if_needed(
    store: &mut dyn NodeStore,
    id: NodeId,
    cx: &LayoutCx<'_>,
) -> Option<Report> {
    let root = root_of(store, id);
    let dirty = pre_order(store, root)
        .into_iter()
        .any(|n| store.get(n).is_some_and(|node| node.dirty.is_dirty()));
    if dirty { stabilize(store, root, cx) } else { None }
}

/// The parent's content box in its local coordinates, or the window for
/// roots.
fn parent_content(store: &dyn NodeStore, parent: Option<NodeId>, window: Vec2) -> Rect {
    match parent.and_then(|p| store.get(p)) {
        Some(p) => {
            let l = p.layout();
            let cs = p.content_size();
            Rect::new(
                l.padding.left + l.border.left,
                l.padding.top + l.border.top,
                cs.x.max(0.0),
                cs.y.max(0.0),
            )
        }
        None => Rect::from_pos_size(Vec2::ZERO, window),
    }
}

/// Run the kind's pre-layout hook, then the stylizer, then place the node
/// relative to its parent.
fn update_layout(store: &mut dyn NodeStore, id: NodeId, cx: &LayoutCx<'_>) {
    let Some(node) = store.get_mut(id) else {
        return;
    };
    widgets::prepare(node, cx);
    let parent = node.entity.parent;

    let adjust = {
        let Some(node) = store.get(id) else {
            return;
        };
        node.stylizer.as_ref().map(|s| {
            s.process(&StyleContext {
                parent_content: parent_content(store, parent, cx.host.window()),
                size: node.pixel_size(),
                margin: node.layout.margin,
            })
        })
    };
    if let Some(adj) = adjust {
        let mut l = LayoutMut::new(store, id);
        match (adj.width, adj.height) {
            (Some(w), Some(h)) => {
                l.scale(w, h);
            }
            (Some(w), None) => {
                l.scale_width(w);
            }
            (None, Some(h)) => {
                l.scale_height(h);
            }
            (None, None) => {}
        }
        if let Some(o) = adj.offset {
            l.set_offset(o.x, o.y);
        }
    }

    let (base, base_z, parent_active) = match parent.and_then(|p| store.get(p)) {
        Some(p) => (p.entity.position, p.entity.z, p.entity.active_in_tree),
        None => (Vec2::ZERO, 0.0, true),
    };
    let Some(node) = store.get_mut(id) else {
        return;
    };
    let l = &node.layout;
    let inner = l.inner_offset();
    let origin = if l.positioning == Positioning::Fixed {
        Vec2::ZERO
    } else {
        base
    };
    let pos = origin + l.calc_offset() + Vec2::new(inner.left, inner.top);
    let z = base_z + l.z + Z_STEP;
    node.entity.set_position(pos, z);
    node.entity.active_in_tree = parent_active && node.entity.active;
}

/// Recompute a node's clip: its own world rectangle intersected with the clip
/// of the nearest ancestor that does not let content overflow visibly. The
/// walk stops at the root, whose clip always applies.
pub(crate) fn generate_clip(store: &mut dyn NodeStore, id: NodeId) {
    let Some(node) = store.get(id) else {
        return;
    };
    let own = Clip::from(node.entity.rect());
    let mut clip = own;
    if let Some(mut p) = node.entity.parent {
        while let Some(pn) = store.get(p) {
            let visible = pn
                .try_panel()
                .is_none_or(|pd| pd.overflow() == Overflow::Visible);
            match pn.entity.parent {
                Some(up) if visible && store.get(up).is_some() => p = up,
                _ => {
                    clip = own.intersect(&pn.clip);
                    break;
                }
            }
        }
    }
    if let Some(node) = store.get_mut(id) {
        node.clip = clip;
    }
}

/// Reset a detached subtree's clips to unbounded.
pub(crate) fn reset_clips(store: &mut dyn NodeStore, root: NodeId) {
    for n in pre_order(store, root) {
        if let Some(node) = store.get_mut(n) {
            node.clip = Clip::UNBOUNDED;
        }
    }
}
