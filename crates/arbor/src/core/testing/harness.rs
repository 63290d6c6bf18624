use arbor_geom::Vec2;
use tracing_subscriber::fmt;

use super::host::{StaticTextures, test_host};
use crate::core::{
    config::Config,
    error::Result,
    event::{InputState, Key, KeyEvent},
    manager::Manager,
};

/// Route engine logs through the test writer. Safe to call repeatedly.
pub fn init_tracing() {
    let format = fmt::format().with_level(true).without_time().compact();
    fmt().with_test_writer().event_format(format).try_init().ok();
}

/// Default frame step in seconds.
const STEP: f64 = 1.0 / 60.0;

/// A manager plus a simulated clock and pointer. Each input helper runs one
/// frame with that input.
pub struct Harness {
    /// The manager under test.
    pub man: Manager,
    /// Seconds since the harness started.
    pub runtime: f64,
    /// Last pointer position.
    pub pointer: Vec2,
}

/// Builder for a [`Harness`].
pub struct HarnessBuilder {
    /// Window size.
    window: Vec2,
    /// Engine configuration.
    config: Config,
    /// Known textures.
    textures: StaticTextures,
}

impl HarnessBuilder {
    /// Window size.
    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.window = Vec2::new(w, h);
        self
    }

    /// Engine configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Register a texture.
    pub fn texture(mut self, key: &str, w: f32, h: f32) -> Self {
        self.textures = self.textures.with(key, w, h);
        self
    }

    /// Build the harness.
    pub fn build(self) -> Result<Harness> {
        init_tracing();
        let man = Manager::new(test_host(self.textures, self.window), self.config)?;
        Ok(Harness {
            man,
            runtime: 0.0,
            pointer: Vec2::ZERO,
        })
    }
}

impl Harness {
    /// A builder with an 800x600 window and two workers.
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder {
            window: Vec2::new(800.0, 600.0),
            config: Config {
                worker_threads: Some(2),
                ..Config::default()
            },
            textures: StaticTextures::default(),
        }
    }

    /// A harness with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Input carrying the current pointer and clock.
    fn base(&self) -> InputState {
        InputState {
            pointer: self.pointer,
            runtime: self.runtime,
            ..InputState::default()
        }
    }

    /// Run one frame with the given input, then advance the clock.
    pub fn step(&mut self, input: InputState) {
        self.pointer = input.pointer;
        self.man.update(input, STEP);
        self.runtime += STEP;
    }

    /// Run one frame with no input.
    pub fn frame(&mut self) {
        let input = self.base();
        self.step(input);
    }

    /// Run `n` idle frames.
    pub fn frames(&mut self, n: usize) {
        for _ in 0..n {
            self.frame();
        }
    }

    /// Let the clock run without frames.
    pub fn advance(&mut self, secs: f64) {
        self.runtime += secs;
    }

    /// Move the pointer.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let input = self.base().moved_to(Vec2::new(x, y));
        self.step(input);
    }

    /// Press the primary button.
    pub fn press(&mut self, x: f32, y: f32) {
        let input = self.base().press(Vec2::new(x, y));
        self.step(input);
    }

    /// Release the primary button.
    pub fn release(&mut self, x: f32, y: f32) {
        let input = self.base().release(Vec2::new(x, y));
        self.step(input);
    }

    /// Hover, press and release at a point.
    pub fn click(&mut self, x: f32, y: f32) {
        self.move_to(x, y);
        self.press(x, y);
        self.release(x, y);
    }

    /// Move the wheel at a point.
    pub fn wheel(&mut self, x: f32, y: f32, delta: Vec2) {
        let input = self.base().moved_to(Vec2::new(x, y)).wheel(delta);
        self.step(input);
    }

    /// Type text into the focused input.
    pub fn type_text(&mut self, text: &str) {
        let input = InputState {
            text: text.into(),
            ..self.base()
        };
        self.step(input);
    }

    /// Press and release a key.
    pub fn key(&mut self, key: Key) {
        let press = InputState {
            keys: vec![KeyEvent {
                key,
                pressed: true,
                shift: false,
            }],
            ..self.base()
        };
        self.step(press);
    }
}
