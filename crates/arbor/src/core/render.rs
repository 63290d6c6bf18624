use arbor_geom::{Clip, Edges, Rect};

use crate::core::{host::Glyph, id::NodeId, style::Color};

/// Paint data for one primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// A textured or flat-colored quad.
    Quad {
        /// Texture key, or `None` for a flat color.
        texture: Option<String>,
        /// Tint color.
        color: Color,
        /// Texture coordinates as x, y, width, height in `[0, 1]`.
        uv: Rect,
        /// Border widths.
        border: Edges,
        /// Border colors in left, top, right, bottom order.
        border_color: [Color; 4],
        /// Corner radii in top-left, top-right, bottom-right, bottom-left order.
        radius: [f32; 4],
    },
    /// A run of glyphs in world coordinates.
    Text {
        /// Positioned glyphs.
        glyphs: Vec<Glyph>,
        /// Text color.
        color: Color,
    },
}

/// Full texture coordinates.
pub const FULL_UV: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

impl Paint {
    /// A flat colored quad with no border.
    pub fn flat(color: Color) -> Self {
        Self::Quad {
            texture: None,
            color,
            uv: FULL_UV,
            border: Edges::ZERO,
            border_color: [Color::TRANSPARENT; 4],
            radius: [0.0; 4],
        }
    }

    /// A text run.
    pub fn text(glyphs: Vec<Glyph>, color: Color) -> Self {
        Self::Text { glyphs, color }
    }
}

/// A primitive handed to the graphics backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Node that produced the command.
    pub node: NodeId,
    /// World rectangle.
    pub rect: Rect,
    /// Depth; higher draws in front.
    pub z: f32,
    /// Clip rectangle.
    pub clip: Clip,
    /// What to draw.
    pub paint: Paint,
}
