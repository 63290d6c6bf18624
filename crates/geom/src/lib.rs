//! Floating point geometry primitives used by the arbor layout engine.
//!
//! World space has its origin at the top left, with y growing downward. All
//! units are pixels.

/// Scissor rectangles.
mod clip;
/// Four-sided insets.
mod edges;
/// Axis-aligned rectangles.
mod rect;
/// Two-component vectors.
mod vec2;

pub use clip::Clip;
pub use edges::Edges;
pub use rect::Rect;
pub use vec2::Vec2;

/// Layout changes smaller than this are ignored.
pub const FRACTION_OF_PIXEL: f32 = 0.2;

/// Tolerance used by [`approx`].
pub const TINY: f32 = 0.0001;

/// Are two values equal within [`TINY`]?
pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= TINY
}

/// Are two values equal within `delta`?
pub fn approx_to(a: f32, b: f32, delta: f32) -> bool {
    (a - b).abs() <= delta
}

/// Are two values equal after rounding to the nearest hundredth?
pub fn roughly(a: f32, b: f32) -> bool {
    (a * 100.0).round() == (b * 100.0).round()
}
