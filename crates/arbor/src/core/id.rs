use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in the manager arena.
    pub struct NodeId;
}

/// Identifier for a registered event callback, used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub(crate) u64);
