//! Overlay boxes and their display colors.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash;
use crate::types::{BoundingBox, ColorClass, RegionStats};

/// 8-bit RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl DisplayColor {
    /// Light color derived from a seed; every channel is in `128..=255`.
    pub fn light_from_seed(seed: u64) -> Self {
        let channel = |shift: u32| 128 + ((seed >> shift) & 0x7f) as u8;
        Self {
            r: channel(0),
            g: channel(8),
            b: channel(16),
        }
    }

    /// Color for a region, stable across runs over the same grid.
    pub fn for_region(color: ColorClass, stats: &RegionStats) -> Self {
        Self::light_from_seed(canonical_hash(&(color, stats)))
    }

    /// Channels as an array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl std::fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// A bounding box to outline on the source image.
///
/// The box is in the bordered frame used by the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayBox {
    /// Box to draw.
    pub bbox: BoundingBox,
    /// Outline color.
    pub color: DisplayColor,
}
