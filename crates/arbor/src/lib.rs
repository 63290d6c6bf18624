//! Arbor: a retained-mode UI layout engine.
//!
//! Nodes live in a [`Manager`]. Changing a node marks it dirty; each frame
//! the manager stabilizes every dirty tree in parallel, then ticks every
//! node in parallel to turn pointer and keyboard input into events, and
//! finally dispatches those events front to back.
//!
//! # Module Organization
//!
//! - [`geom`] - Vectors, rectangles, edges and clips
//! - [`widgets`] - Widget kinds and their operations

#![warn(missing_docs)]

mod core;

pub mod widgets;

pub use arbor_geom as geom;
#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    EventId, Manager, Node, NodeId, Stats, config, dirty, entity, error, event, frame, group,
    host, id, layout, manager, node, render, stabilize, store, style, stylizer,
};
