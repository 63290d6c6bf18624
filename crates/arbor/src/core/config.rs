use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Engine configuration. Every field has a default, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cap on stabilization rounds for a single subtree.
    pub max_iterations: usize,
    /// Worker thread count. `None` lets rayon choose.
    pub worker_threads: Option<usize>,
    /// Maximum seconds between two clicks for them to count as a double click.
    pub double_click_time: f64,
    /// Pointer travel in pixels before a press turns into a drag.
    pub drag_threshold: f32,
    /// Pixels scrolled per wheel unit.
    pub scroll_speed: f32,
    /// Seconds between text cursor blinks.
    pub cursor_blink_rate: f64,
    /// Thickness of scroll bar thumbs.
    pub scroll_bar_width: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            worker_threads: None,
            double_click_time: 0.25,
            drag_threshold: 4.0,
            scroll_speed: 20.0,
            cursor_blink_rate: 0.5,
            scroll_bar_width: 8.0,
        }
    }
}

impl Config {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        let c: Self = serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        c.validate()?;
        Ok(c)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be at least 1".into()));
        }
        if self.worker_threads == Some(0) {
            return Err(Error::Config("worker_threads must be at least 1".into()));
        }
        if self.scroll_bar_width < 0.0 {
            return Err(Error::Config("scroll_bar_width must not be negative".into()));
        }
        Ok(())
    }
}
