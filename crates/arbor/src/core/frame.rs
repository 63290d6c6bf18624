//! Per-tick context and the per-worker buffers that collect cross-node work.

use arbor_geom::Vec2;

use crate::{
    core::{
        config::Config,
        dirty::DirtyType,
        event::{EventType, InputState},
        group::EventRequest,
        id::NodeId,
        node::Node,
    },
    widgets,
};

/// Read-only state shared by every per-tick hook.
#[derive(Clone, Copy)]
pub struct FrameCx<'a> {
    /// This tick's input.
    pub input: &'a InputState,
    /// Engine configuration.
    pub config: &'a Config,
    /// Seconds since the previous tick.
    pub dt: f64,
    /// Window size.
    pub window: Vec2,
}

/// Work a per-tick hook wants done on some other node. Applied on one
/// thread after every worker has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Mark a node dirty; the cascade needs the whole tree.
    Dirty(NodeId, DirtyType),
    /// Request an event on a node this worker does not own.
    Request(NodeId, EventType),
    /// Clear a node's hover state so it sees a fresh enter.
    ResetHover(NodeId),
    /// Move input focus to the input after this one.
    FocusNext(NodeId),
}

/// Output buffers owned by one worker thread for the duration of a tick.
#[derive(Debug, Default)]
pub struct WorkerScratch {
    /// Active, hovered nodes with a paintable background.
    pub(crate) hovered: Vec<NodeId>,
    /// Event requests for nodes this worker owns.
    pub(crate) requests: Vec<EventRequest>,
    /// Cross-node work.
    pub(crate) deferred: Vec<Deferred>,
}

impl WorkerScratch {
    /// Reset for a new tick.
    pub(crate) fn clear(&mut self) {
        self.hovered.clear();
        self.requests.clear();
        self.deferred.clear();
    }

    /// Request `ty` on a node owned by this worker. Returns false, queuing
    /// nothing, when the node has no reaction to the event.
    pub(crate) fn request(&mut self, id: NodeId, node: &Node, ty: EventType) -> bool {
        if !widgets::handles(node, ty) {
            return false;
        }
        self.requests.push(EventRequest {
            node: id,
            ty,
            z: node.entity.z,
        });
        true
    }

    /// Mark the worker's own node dirty once the tick is over.
    pub(crate) fn dirty(&mut self, id: NodeId, level: DirtyType) {
        self.deferred.push(Deferred::Dirty(id, level));
    }
}
