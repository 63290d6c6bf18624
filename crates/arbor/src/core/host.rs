use std::sync::Arc;

use arbor_geom::{Rect, Vec2};

use crate::error::Result;

/// A text measurement or layout request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRequest<'a> {
    /// Text to lay out.
    pub text: &'a str,
    /// Font face name.
    pub face: &'a str,
    /// Font size in pixels.
    pub size: f32,
    /// Wrap width. Zero or less disables wrapping.
    pub max_width: f32,
    /// Line height. Zero means the font's natural line height.
    pub line_height: f32,
}

/// One positioned glyph, relative to the top left of the text block.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// The character drawn.
    pub ch: char,
    /// Glyph box.
    pub rect: Rect,
}

/// Text shaping and font metrics.
pub trait TextService: Send + Sync {
    /// Measure the size of a block of text.
    fn measure(&self, req: &TextRequest<'_>) -> Vec2;

    /// Lay the text out into positioned glyphs.
    fn layout(&self, req: &TextRequest<'_>) -> Vec<Glyph>;
}

/// Pixel metrics for textures known to the graphics backend.
pub trait TextureSource: Send + Sync {
    /// Pixel dimensions of the texture named by `key`.
    fn texture_size(&self, key: &str) -> Result<Vec2>;
}

/// A resolved texture reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureHandle {
    /// Lookup key.
    pub key: String,
    /// Pixel size.
    pub size: Vec2,
}

/// Services shared by every node: text metrics, texture metrics and the
/// window. Passed explicitly into every operation that needs them.
#[derive(Clone)]
pub struct Host {
    /// Text shaping service.
    text: Arc<dyn TextService>,
    /// Texture metrics.
    textures: Arc<dyn TextureSource>,
    /// Window size in pixels.
    window: Vec2,
}

impl Host {
    /// Construct a host context.
    pub fn new(text: Arc<dyn TextService>, textures: Arc<dyn TextureSource>, window: Vec2) -> Self {
        Self {
            text,
            textures,
            window,
        }
    }

    /// The text service.
    pub fn text(&self) -> &dyn TextService {
        self.text.as_ref()
    }

    /// Resolve a texture, returning its handle.
    pub fn texture(&self, key: &str) -> Result<TextureHandle> {
        let size = self.textures.texture_size(key)?;
        Ok(TextureHandle {
            key: key.to_string(),
            size,
        })
    }

    /// Window size in pixels.
    pub fn window(&self) -> Vec2 {
        self.window
    }

    /// Record a new window size.
    pub(crate) fn set_window(&mut self, size: Vec2) {
        self.window = size;
    }
}
