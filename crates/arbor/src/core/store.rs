use std::collections::HashMap;

use slotmap::SlotMap;

use crate::core::{id::NodeId, node::Node};

/// Keyed access to nodes. Implemented by the manager's arena and by the
/// disjoint per-root views used during parallel stabilization, so tree
/// algorithms run unchanged on either.
pub trait NodeStore {
    /// Borrow a node.
    fn get(&self, id: NodeId) -> Option<&Node>;

    /// Borrow a node mutably.
    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node>;
}

impl NodeStore for SlotMap<NodeId, Node> {
    fn get(&self, id: NodeId) -> Option<&Node> {
        SlotMap::get(self, id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        SlotMap::get_mut(self, id)
    }
}

/// Exclusive borrows of every node under one root. Subtrees built from the
/// same arena never share a node, so they can be processed on different
/// threads.
pub struct Subtree<'a> {
    /// The root node.
    root: NodeId,
    /// Borrowed nodes.
    nodes: HashMap<NodeId, &'a mut Node>,
}

impl<'a> Subtree<'a> {
    /// An empty subtree for `root`.
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            nodes: HashMap::new(),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a borrowed node.
    pub fn insert(&mut self, id: NodeId, node: &'a mut Node) {
        self.nodes.insert(id, node);
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the subtree empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Is any node in the subtree dirty?
    pub fn is_dirty(&self) -> bool {
        self.nodes.values().any(|n| n.dirty().is_dirty())
    }
}

impl NodeStore for Subtree<'_> {
    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id).map(|n| &**n)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id).map(|n| &mut **n)
    }
}

/// Walk parent links to the topmost ancestor present in `store`.
pub fn root_of(store: &dyn NodeStore, id: NodeId) -> NodeId {
    let mut cur = id;
    while let Some(p) = store.get(cur).and_then(|n| n.entity().parent()) {
        if store.get(p).is_none() {
            break;
        }
        cur = p;
    }
    cur
}

/// Return `root` and its descendants in pre-order.
pub fn pre_order(store: &dyn NodeStore, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(node) = store.get(id) else {
            continue;
        };
        out.push(id);
        for child in node.entity().children().iter().rev() {
            stack.push(*child);
        }
    }
    out
}

/// Is `ancestor` a strict ancestor of `id`?
pub fn is_ancestor(store: &dyn NodeStore, ancestor: NodeId, id: NodeId) -> bool {
    let mut cur = store.get(id).and_then(|n| n.entity().parent());
    while let Some(p) = cur {
        if p == ancestor {
            return true;
        }
        cur = store.get(p).and_then(|n| n.entity().parent());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{ElementData, PanelData};

    fn tree() -> (SlotMap<NodeId, Node>, Vec<NodeId>) {
        let mut nodes: SlotMap<NodeId, Node> = SlotMap::with_key();
        let ids: Vec<NodeId> = (0..4)
            .map(|_| nodes.insert(Node::new(ElementData::Panel(PanelData::default()))))
            .collect();
        // 0 -> [1 -> [3], 2]
        for (p, c) in [(0, 1), (0, 2), (1, 3)] {
            nodes[ids[c]].entity.parent = Some(ids[p]);
            nodes[ids[p]].entity.children.push(ids[c]);
        }
        (nodes, ids)
    }

    #[test]
    fn traversal() {
        let (nodes, ids) = tree();
        assert_eq!(pre_order(&nodes, ids[0]), vec![ids[0], ids[1], ids[3], ids[2]]);
        assert_eq!(root_of(&nodes, ids[3]), ids[0]);
        assert!(is_ancestor(&nodes, ids[0], ids[3]));
        assert!(!is_ancestor(&nodes, ids[2], ids[3]));
    }

    #[test]
    fn subtree_view() {
        let (mut nodes, ids) = tree();
        let mut sub = Subtree::new(ids[1]);
        for (id, n) in nodes.iter_mut() {
            if id == ids[1] || id == ids[3] {
                sub.insert(id, n);
            }
        }
        assert_eq!(sub.len(), 2);
        assert_eq!(root_of(&sub, ids[3]), ids[1]);
        assert_eq!(pre_order(&sub, ids[1]), vec![ids[1], ids[3]]);
        assert!(!sub.is_dirty());
    }
}
