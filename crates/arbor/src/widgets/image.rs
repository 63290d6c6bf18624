//! Images: a single texture, a flip-book of textures, or a sprite sheet
//! animated at a fixed frame rate.

use arbor_geom::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::core::{
    dirty::{DirtyType, mark_dirty},
    error::Result,
    frame::{FrameCx, WorkerScratch},
    host::TextureHandle,
    id::NodeId,
    manager::Manager,
    node::Node,
    render::{FULL_UV, Paint},
    stabilize::LayoutCx,
};
use crate::widgets::{ElementData, PanelData, panel};

/// One frame of a sprite sheet clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    /// Extra frame periods the cell stays up before the next one shows.
    #[serde(rename = "Hold", default)]
    pub hold: i32,
    /// Cell within the sheet texture as x, y, width, height in pixels.
    #[serde(rename = "Rectangle")]
    pub rectangle: [f32; 4],
}

impl SpriteFrame {
    /// Texture coordinates of the cell for a sheet of `size`.
    pub fn uv(&self, size: Vec2) -> Rect {
        let [x, y, w, h] = self.rectangle;
        if size.x <= 0.0 || size.y <= 0.0 {
            return FULL_UV;
        }
        Rect::new(x / size.x, y / size.y, w / size.x, h / size.y)
    }
}

/// A named run of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteClip {
    /// Clip name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Frames in play order.
    #[serde(rename = "Frames")]
    pub frames: Vec<SpriteFrame>,
}

/// Parse a sprite sheet description: a JSON list of clips.
pub fn parse_sprite_sheet(json: &str) -> Result<Vec<SpriteClip>> {
    Ok(serde_json::from_str(json)?)
}

/// Image state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageData {
    /// Container state; its texture is the one currently shown.
    pub(crate) panel: PanelData,
    /// Flip-book frames.
    pub(crate) flip_book: Vec<TextureHandle>,
    /// Sprite sheet clips.
    pub(crate) clips: Vec<SpriteClip>,
    /// Clip being played.
    pub(crate) clip: usize,
    /// Frames per second.
    pub(crate) fps: f32,
    /// Seconds left on the current frame.
    pub(crate) frame_delay: f32,
    /// Current frame, if any has been shown.
    pub(crate) current: Option<usize>,
    /// Is the animation paused?
    pub(crate) paused: bool,
    /// Texture coordinates of the current frame.
    pub(crate) uv: Option<Rect>,
}

impl ImageData {
    /// Frames in the animation.
    pub fn frame_count(&self) -> usize {
        match self.clips.get(self.clip) {
            Some(c) => c.frames.len(),
            None => self.flip_book.len(),
        }
    }

    /// Current frame.
    pub fn frame(&self) -> Option<usize> {
        self.current
    }

    /// Is the animation paused?
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f32 {
        self.fps
    }

    /// Frame periods the current frame is shown for.
    fn periods(&self) -> f32 {
        let hold = self
            .current
            .and_then(|i| self.clips.get(self.clip)?.frames.get(i))
            .map_or(0, |f| f.hold.max(0));
        1.0 + hold as f32
    }

    /// Restart the frame timer for the current frame.
    fn reset_delay(&mut self) {
        self.frame_delay = if self.fps > 0.0 {
            self.periods() / self.fps
        } else {
            f32::INFINITY
        };
    }

    /// Show frame `index`. Returns true if anything changed.
    fn set_frame(&mut self, index: usize) -> bool {
        if self.current == Some(index) || index >= self.frame_count() {
            return false;
        }
        self.current = Some(index);
        if let Some(clip) = self.clips.get(self.clip) {
            let size = self.panel.texture.as_ref().map(|t| t.size).unwrap_or_default();
            self.uv = Some(clip.frames[index].uv(size));
        } else {
            self.panel.texture = self.flip_book.get(index).cloned();
        }
        self.reset_delay();
        true
    }

    /// Count down the frame timer and step to the next frame when it runs
    /// out. Returns true if the frame changed.
    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        if !self.paused {
            self.frame_delay -= dt;
        }
        let count = self.frame_count();
        if count == 0 || self.frame_delay > 0.0 {
            return false;
        }
        let next = self.current.map_or(0, |c| (c + 1) % count);
        if self.set_frame(next) {
            return true;
        }
        self.reset_delay();
        false
    }
}

/// Per-tick frame advance.
pub(crate) fn tick(id: NodeId, node: &mut Node, frame: &FrameCx<'_>, scratch: &mut WorkerScratch) {
    let ElementData::Image(img) = &mut node.data else {
        return;
    };
    if img.advance(frame.dt as f32) {
        scratch.dirty(id, DirtyType::ColorChange);
    }
}

/// Draw the container with the current frame's texture coordinates.
pub(crate) fn render(id: NodeId, node: &mut Node, cx: &LayoutCx<'_>) {
    panel::render_panel(id, node, cx);
    let ElementData::Image(img) = &node.data else {
        return;
    };
    let Some(frame_uv) = img.uv else {
        return;
    };
    for d in &mut node.draws {
        if let Paint::Quad { uv, texture: Some(_), .. } = &mut d.paint {
            *uv = frame_uv;
        }
    }
}

/// Mutable access to an image.
pub struct ImageMut<'a> {
    /// Owning manager.
    pub(crate) man: &'a mut Manager,
    /// Target node.
    pub(crate) id: NodeId,
}

impl ImageMut<'_> {
    /// Read-only image data.
    pub fn data(&self) -> &ImageData {
        match &self.man.nodes[self.id].data {
            ElementData::Image(img) => img,
            _ => unreachable!("image handle on a non-image node"),
        }
    }

    /// The image data.
    fn img(&mut self) -> &mut ImageData {
        match &mut self.man.nodes[self.id].data {
            ElementData::Image(img) => img,
            _ => unreachable!("image handle on a non-image node"),
        }
    }

    /// Resolve a texture, logging failures.
    fn texture(&self, key: &str) -> Option<TextureHandle> {
        match self.man.host.texture(key) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::error!(key, error = %e, "failed to load image texture");
                None
            }
        }
    }

    /// Redraw the image.
    fn touch(&mut self) {
        mark_dirty(&mut self.man.nodes, self.id, DirtyType::ColorChange);
    }

    /// Show a single texture, dropping any animation.
    pub fn set_texture(&mut self, key: &str) {
        let tex = self.texture(key);
        let img = self.img();
        img.flip_book.clear();
        img.clips.clear();
        img.uv = None;
        img.current = None;
        img.panel.texture = tex;
        self.touch();
    }

    /// Animate through a list of textures.
    pub fn set_flip_book(&mut self, fps: f32, keys: &[&str]) {
        let frames: Vec<TextureHandle> = keys.iter().filter_map(|k| self.texture(k)).collect();
        let img = self.img();
        img.clips.clear();
        img.uv = None;
        img.flip_book = frames;
        img.fps = fps;
        img.current = None;
        img.set_frame(0);
        self.touch();
    }

    /// Animate through the first clip of a sprite sheet. A malformed sheet is
    /// logged and the image keeps its previous state.
    pub fn set_sprite_sheet(&mut self, fps: f32, key: &str, json: &str) {
        let clips = match parse_sprite_sheet(json) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "failed to load the sprite sheet");
                return;
            }
        };
        let tex = self.texture(key);
        let img = self.img();
        img.flip_book.clear();
        img.clips = clips;
        img.clip = 0;
        img.fps = fps;
        img.current = None;
        img.panel.texture = tex;
        img.set_frame(0);
        self.touch();
    }

    /// Switch to the sprite sheet clip called `name`. Returns false if there
    /// is no such clip.
    pub fn play_clip(&mut self, name: &str) -> bool {
        let img = self.img();
        let Some(idx) = img.clips.iter().position(|c| c.name == name) else {
            return false;
        };
        img.clip = idx;
        img.current = None;
        img.set_frame(0);
        self.touch();
        true
    }

    /// Jump to a frame.
    pub fn set_frame(&mut self, index: usize) {
        if self.img().set_frame(index) {
            self.touch();
        }
    }

    /// Change the frame rate.
    pub fn set_frame_rate(&mut self, fps: f32) {
        self.img().fps = fps;
    }

    /// Resume the animation.
    pub fn play(&mut self) {
        self.img().paused = false;
    }

    /// Pause the animation.
    pub fn stop(&mut self) {
        self.img().paused = true;
    }
}
