//! Palette Table
//!
//! The fixed, ordered color table shared read-only by the rest of the canvas.
//! The canvas stores indices into it, never raw colors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Largest palette an 8-bit indexed raster can address
pub const MAX_PALETTE_LEN: usize = 256;

/// A single palette color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel
    #[serde(rename = "R")]
    pub r: u8,
    /// Green channel
    #[serde(rename = "G")]
    pub g: u8,
    /// Blue channel
    #[serde(rename = "B")]
    pub b: u8,
    /// Alpha channel
    #[serde(rename = "A")]
    pub a: u8,
}

impl Rgba {
    /// Create a color from its channels
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`. The leading `#` is required.
    pub fn from_hex(s: &str) -> Result<Self> {
        let Some(hex) = s.trim().strip_prefix('#') else {
            return Err(Error::invalid_color(s));
        };
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(Error::invalid_color(s));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::invalid_color(s))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    fn distance(self, other: Self) -> u32 {
        let d = |a: u8, b: u8| {
            let d = i32::from(a) - i32::from(b);
            (d * d) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b) + d(self.a, other.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Immutable ordered color table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette from an explicit color list (1 to 256 entries)
    pub fn new(colors: Vec<Rgba>) -> Result<Self> {
        if colors.is_empty() || colors.len() > MAX_PALETTE_LEN {
            return Err(Error::invalid_config(format!(
                "palette must hold 1..={} colors, got {}",
                MAX_PALETTE_LEN,
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// The 256-entry fire ramp: black, red, yellow, white
    #[must_use]
    pub fn burn() -> Self {
        let ramp = |i: usize, start: usize| (i.saturating_sub(start) * 4).min(255) as u8;
        let colors = (0..MAX_PALETTE_LEN)
            .map(|i| Rgba::opaque(ramp(i, 0), ramp(i, 64), ramp(i, 128)))
            .collect();
        Self { colors }
    }

    /// All colors in index order
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Palettes are never empty, kept for API symmetry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Look up a color by index
    #[must_use]
    pub fn get(&self, index: u8) -> Option<Rgba> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Index of the nearest entry (squared RGBA distance, lowest index on ties)
    #[must_use]
    pub fn closest(&self, color: Rgba) -> u8 {
        let mut best = (0usize, u32::MAX);
        for (i, c) in self.colors.iter().enumerate() {
            let d = c.distance(color);
            if d < best.1 {
                best = (i, d);
                if d == 0 {
                    break;
                }
            }
        }
        // new() caps the palette at 256 entries
        best.0 as u8
    }

    /// Whether any entry carries transparency
    #[must_use]
    pub fn has_transparency(&self) -> bool {
        self.colors.iter().any(|c| c.a != 255)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::burn()
    }
}
