//! Axis-aligned bounding boxes over grid coordinates.

use serde::{Deserialize, Serialize};

/// Inclusive bounding box `(min_x, min_y) -- (max_x, max_y)`.
///
/// A fresh box is *empty*: its minimums sit at `usize::MAX` and its maximums
/// at zero, so the first [`include`](Self::include) snaps it onto the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Smallest column (x) seen.
    pub min_x: usize,
    /// Smallest row (y) seen.
    pub min_y: usize,
    /// Largest column (x) seen.
    pub max_x: usize,
    /// Largest row (y) seen.
    pub max_y: usize,
}

impl BoundingBox {
    /// The empty box.
    pub const EMPTY: Self = Self {
        min_x: usize::MAX,
        min_y: usize::MAX,
        max_x: 0,
        max_y: 0,
    };

    /// Box covering exactly the given corners.
    pub fn new(min_x: usize, min_y: usize, max_x: usize, max_y: usize) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// True if no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Widen the box to contain `(x, y)`.
    pub fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Widen the box to contain `other`. Empty boxes are neutral.
    pub fn union(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Number of columns covered (0 when empty).
    pub fn width(&self) -> usize {
        if self.is_empty() { 0 } else { self.max_x - self.min_x + 1 }
    }

    /// Number of rows covered (0 when empty).
    pub fn height(&self) -> usize {
        if self.is_empty() { 0 } else { self.max_y - self.min_y + 1 }
    }

    /// Check whether `(x, y)` lies inside the box.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        !self.is_empty() && x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        write!(f, "({},{}) -- ({},{})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}
