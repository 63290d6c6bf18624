use serde::{Deserialize, Serialize};

/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Mid gray.
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Construct a color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Multiply the color channels, leaving alpha untouched.
    pub fn scale_rgb(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s, self.a)
    }

    /// Is any part of the color visible?
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }
}

/// How one edge of a panel border is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderStyle {
    /// No border.
    #[default]
    None,
    /// Reserve the space but draw nothing.
    Hidden,
    /// A solid line.
    Solid,
    /// A dashed line.
    Dashed,
    /// A dotted line.
    Dotted,
    /// Two parallel lines.
    Double,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_keeps_alpha() {
        let c = Color::new(1.0, 0.5, 0.25, 0.5).scale_rgb(0.5);
        assert_eq!(c, Color::new(0.5, 0.25, 0.125, 0.5));
        assert!(!Color::TRANSPARENT.is_visible());
    }
}
