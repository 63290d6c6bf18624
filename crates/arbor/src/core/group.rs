use std::{collections::HashSet, mem};

use crate::core::{event::EventType, id::NodeId};

/// A queued event, tagged with the node's world depth at request time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRequest {
    /// Target node.
    pub node: NodeId,
    /// Event type.
    pub ty: EventType,
    /// World depth of the target.
    pub z: f32,
}

/// Events requested during a frame, fired together once the tree is stable.
#[derive(Debug, Default)]
pub struct EventGroup {
    /// Pending requests.
    requests: Vec<EventRequest>,
}

impl EventGroup {
    /// Queue a request.
    pub fn push(&mut self, req: EventRequest) {
        self.requests.push(req);
    }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Drain the queue front-most first, keeping the first request for each
    /// node and event type.
    pub(crate) fn drain_sorted(&mut self) -> Vec<EventRequest> {
        let mut reqs = mem::take(&mut self.requests);
        reqs.sort_by(|a, b| b.z.total_cmp(&a.z));
        let mut seen = HashSet::new();
        reqs.retain(|r| seen.insert((r.node, r.ty)));
        reqs
    }
}
