//! Canvas configuration (the `[canvas]` table)

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::palette::{Palette, Rgba};

/// Canvas settings, deserializable from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Palette index every pixel starts with
    #[serde(default)]
    pub background_index: u8,
    /// Color painted by every event (`#rrggbb` or `#rrggbbaa`), snapped to
    /// the nearest palette entry
    #[serde(default = "default_paint_color")]
    pub paint_color: String,
    /// Minimum gap between update notifications
    #[serde(default = "default_broadcast_interval_ms")]
    pub broadcast_interval_ms: u64,
    /// Pending notifications buffered per subscriber
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
    /// Queue one notification for each new subscriber
    #[serde(default)]
    pub notify_on_connect: bool,
}

fn default_width() -> u32 {
    320
}
fn default_height() -> u32 {
    200
}
fn default_paint_color() -> String {
    "#ff0000ff".to_string()
}
fn default_broadcast_interval_ms() -> u64 {
    50
}
fn default_subscriber_buffer() -> usize {
    1
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background_index: 0,
            paint_color: default_paint_color(),
            broadcast_interval_ms: default_broadcast_interval_ms(),
            subscriber_buffer: default_subscriber_buffer(),
            notify_on_connect: false,
        }
    }
}

impl CanvasConfig {
    /// Minimum broadcast interval as a `Duration`
    #[must_use]
    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.broadcast_interval_ms)
    }

    /// Check the settings against `palette` and resolve the paint color index
    pub fn validate(&self, palette: &Palette) -> Result<u8> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_config(format!(
                "canvas must not be empty ({}x{})",
                self.width, self.height
            )));
        }
        if usize::from(self.background_index) >= palette.len() {
            return Err(Error::invalid_config(format!(
                "background_index {} outside palette of {} colors",
                self.background_index,
                palette.len()
            )));
        }
        if self.subscriber_buffer == 0 {
            return Err(Error::invalid_config("subscriber_buffer must be at least 1"));
        }
        let color = Rgba::from_hex(&self.paint_color)?;
        Ok(palette.closest(color))
    }
}
