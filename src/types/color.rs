//! Color classes of a binary raster.

use serde::{Deserialize, Serialize};

/// Binary color value a region represents.
///
/// `Low` is the background value (0) and the color of the synthetic root;
/// `High` is the foreground value (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    /// Cell value 0.
    Low,
    /// Cell value 1.
    High,
}

impl ColorClass {
    /// Convert a raw cell value. Returns `None` for anything outside {0, 1}.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Low),
            1 => Some(Self::High),
            _ => None,
        }
    }

    /// Raw cell value of this color.
    pub fn value(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// The other color.
    pub fn opposite(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl Default for ColorClass {
    fn default() -> Self {
        Self::Low
    }
}

impl std::fmt::Display for ColorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
