use std::{collections::HashMap, sync::Arc};

use arbor_geom::{Rect, Vec2};

use crate::core::{
    error::{Error, Result},
    host::{Glyph, Host, TextRequest, TextService, TextureSource},
};

/// Fixed-advance text metrics: every character is half the font size wide,
/// and lines are `line_height` tall, or the font size when that is zero.
/// Lines break on `\n`, and on characters when `max_width` is exceeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoText;

impl MonoText {
    /// Character advance.
    fn advance(req: &TextRequest<'_>) -> f32 {
        req.size * 0.5
    }

    /// Line height.
    fn line(req: &TextRequest<'_>) -> f32 {
        if req.line_height > 0.0 {
            req.line_height
        } else {
            req.size
        }
    }
}

impl TextService for MonoText {
    fn measure(&self, req: &TextRequest<'_>) -> Vec2 {
        if req.text.is_empty() {
            return Vec2::ZERO;
        }
        let glyphs = self.layout(req);
        let w = glyphs.iter().map(|g| g.rect.x + g.rect.w).fold(0.0, f32::max);
        let h = glyphs
            .iter()
            .map(|g| g.rect.y + g.rect.h)
            .fold(Self::line(req), f32::max);
        Vec2::new(w, h)
    }

    fn layout(&self, req: &TextRequest<'_>) -> Vec<Glyph> {
        let adv = Self::advance(req);
        let line = Self::line(req);
        let mut out = Vec::new();
        let mut pos = Vec2::ZERO;
        for ch in req.text.chars() {
            if ch == '\n' {
                pos = Vec2::new(0.0, pos.y + line);
                continue;
            }
            if pos.x > 0.0 && pos.x + adv > req.max_width {
                pos = Vec2::new(0.0, pos.y + line);
            }
            out.push(Glyph {
                ch,
                rect: Rect::new(pos.x, pos.y, adv, line),
            });
            pos.x += adv;
        }
        out
    }
}

/// Texture metrics from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticTextures {
    /// Sizes by key.
    sizes: HashMap<String, Vec2>,
}

impl StaticTextures {
    /// Register a texture.
    pub fn with(mut self, key: &str, w: f32, h: f32) -> Self {
        self.sizes.insert(key.to_string(), Vec2::new(w, h));
        self
    }
}

impl TextureSource for StaticTextures {
    fn texture_size(&self, key: &str) -> Result<Vec2> {
        self.sizes.get(key).copied().ok_or_else(|| Error::Resource {
            key: key.to_string(),
            reason: "unknown texture".into(),
        })
    }
}

/// A host backed by [`MonoText`] and the given textures.
pub fn test_host(textures: StaticTextures, window: Vec2) -> Host {
    Host::new(Arc::new(MonoText), Arc::new(textures), window)
}
