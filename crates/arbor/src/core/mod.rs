//! Engine core: node storage, dirty tracking, layout stabilization, events
//! and the frame driver.

/// Engine configuration.
pub mod config;
/// Dirty levels and propagation.
pub mod dirty;
/// Tree membership and resolved geometry.
pub mod entity;
/// Error types.
pub mod error;
/// Event types, callbacks and input snapshots.
pub mod event;
/// Per-frame contexts and worker buffers.
pub mod frame;
/// Queued event requests.
pub mod group;
/// Host services.
pub mod host;
/// Node and callback identifiers.
pub mod id;
/// Layout records.
pub mod layout;
/// The frame driver.
pub mod manager;
/// Nodes.
pub mod node;
/// Pointer edge detection.
pub mod pointer;
/// Draw commands.
pub mod render;
/// Layout stabilization.
pub mod stabilize;
/// Node storage views and traversal.
pub mod store;
/// Colors and borders.
pub mod style;
/// Sizing and placement rules.
pub mod stylizer;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use id::{EventId, NodeId};
pub use manager::{Manager, Stats};
pub use node::Node;
