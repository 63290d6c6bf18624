use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::{FRACTION_OF_PIXEL, approx_to};

/// Insets on the four sides of a box: padding, margin, border, inner offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edges {
    /// Left inset.
    pub left: f32,
    /// Top inset.
    pub top: f32,
    /// Right inset.
    pub right: f32,
    /// Bottom inset.
    pub bottom: f32,
}

impl Edges {
    /// No inset on any side.
    pub const ZERO: Self = Self::all(0.0);

    /// Construct insets in left, top, right, bottom order.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same inset on every side.
    pub const fn all(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Sum of the left and right insets.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Equal on every side within a fifth of a pixel.
    pub fn approx_pixel(&self, other: &Self) -> bool {
        approx_to(self.left, other.left, FRACTION_OF_PIXEL)
            && approx_to(self.top, other.top, FRACTION_OF_PIXEL)
            && approx_to(self.right, other.right, FRACTION_OF_PIXEL)
            && approx_to(self.bottom, other.bottom, FRACTION_OF_PIXEL)
    }
}

impl Add for Edges {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self::new(
            self.left + o.left,
            self.top + o.top,
            self.right + o.right,
            self.bottom + o.bottom,
        )
    }
}
