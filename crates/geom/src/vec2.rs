use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::{FRACTION_OF_PIXEL, approx, approx_to, roughly};

/// A two-component vector, used for both positions and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// The unit vector.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Construct a vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f32 {
        let d = self - other;
        (d.x * d.x + d.y * d.y).sqrt()
    }

    /// Equal within the library's tiny tolerance.
    pub fn approx(self, other: Self) -> bool {
        approx(self.x, other.x) && approx(self.y, other.y)
    }

    /// Equal within a fifth of a pixel.
    pub fn approx_pixel(self, other: Self) -> bool {
        approx_to(self.x, other.x, FRACTION_OF_PIXEL) && approx_to(self.y, other.y, FRACTION_OF_PIXEL)
    }

    /// Equal after rounding to the nearest hundredth.
    pub fn roughly(self, other: Self) -> bool {
        roughly(self.x, other.x) && roughly(self.y, other.y)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    #[inline]
    fn from(v: (f32, f32)) -> Self {
        Self::new(v.0, v.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b: Vec2 = (3.0, 5.0).into();
        assert_eq!(a + b, Vec2::new(4.0, 7.0));
        assert_eq!(b - a, Vec2::new(2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        assert_eq!(a.max(Vec2::new(0.0, 9.0)), Vec2::new(1.0, 9.0));
        assert_eq!(Vec2::new(0.0, 0.0).distance(Vec2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn pixel_tolerance() {
        let a = Vec2::new(10.0, 10.0);
        assert!(a.approx_pixel(Vec2::new(10.1, 9.9)));
        assert!(!a.approx_pixel(Vec2::new(10.5, 10.0)));
        assert!(!a.approx(Vec2::new(10.1, 10.0)));
    }
}
