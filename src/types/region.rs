//! Region nodes of the enclosure tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::bbox::BoundingBox;
use super::color::ColorClass;

/// Stable handle of a region inside one tree.
///
/// Ids are handed out in creation order starting at 0 (the root) and are
/// only meaningful within the build that produced them. `Ord` follows
/// creation order, which is also the order children are visited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(u32);

impl RegionId {
    /// The synthetic root of every tree.
    pub const ROOT: Self = Self(0);

    /// Create a RegionId from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena index of this region.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accumulated geometric statistics of a region.
///
/// Coordinates are in the bordered pixel frame: `x` is the encoded column
/// halved, `y` is the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStats {
    /// Number of contributing cells.
    pub area: u64,
    /// Sum of contributing x coordinates.
    pub sum_x: u64,
    /// Sum of contributing y coordinates.
    pub sum_y: u64,
    /// Bounding box of contributing cells.
    pub bbox: BoundingBox,
}

impl RegionStats {
    /// Add one pixel at `(x, y)`.
    pub fn add_point(&mut self, x: usize, y: usize) {
        self.area += 1;
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        self.bbox.include(x, y);
    }

    /// Fold another region's statistics into these.
    pub fn merge(&mut self, other: &Self) {
        self.area += other.area;
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.bbox.union(&other.bbox);
    }

    /// Center of gravity, or `None` for a region without area.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.area == 0 {
            return None;
        }
        let area = self.area as f64;
        Some((self.sum_x as f64 / area, self.sum_y as f64 / area))
    }
}

/// A maximal connected region of one color.
///
/// Regions live in the arena of an [`EnclosureTree`](crate::EnclosureTree)
/// and refer to each other by [`RegionId`]. A region that lost a merge is
/// *retired*: it is detached from the tree, keeps the statistics it had when
/// it was absorbed, and records the survivor in `absorbed_into`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub(crate) id: RegionId,
    pub(crate) color: ColorClass,
    pub(crate) stats: RegionStats,
    pub(crate) parent: Option<RegionId>,
    pub(crate) children: BTreeSet<RegionId>,
    pub(crate) absorbed_into: Option<RegionId>,
}

impl Region {
    /// Create a fresh region: no area, empty box, no links.
    pub fn new(id: RegionId, color: ColorClass) -> Self {
        Self {
            id,
            color,
            stats: RegionStats::default(),
            parent: None,
            children: BTreeSet::new(),
            absorbed_into: None,
        }
    }

    /// Record the cell at `(row, encoded_col)`.
    ///
    /// Even encoded columns are structural padding and never contribute.
    pub fn extend_at(&mut self, row: usize, encoded_col: usize) {
        if encoded_col % 2 == 0 {
            return;
        }
        self.stats.add_point(encoded_col / 2, row);
    }

    /// Region id.
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Color class of the region.
    pub fn color(&self) -> ColorClass {
        self.color
    }

    /// Accumulated statistics.
    pub fn stats(&self) -> &RegionStats {
        &self.stats
    }

    /// Number of contributing cells.
    pub fn area(&self) -> u64 {
        self.stats.area
    }

    /// Bounding box of contributing cells.
    pub fn bbox(&self) -> BoundingBox {
        self.stats.bbox
    }

    /// Center of gravity.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        self.stats.centroid()
    }

    /// Enclosing region, if any.
    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    /// Directly enclosed regions, in creation order.
    pub fn children(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.children.iter().copied()
    }

    /// Number of directly enclosed regions.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Survivor of the merge that retired this region.
    pub fn absorbed_into(&self) -> Option<RegionId> {
        self.absorbed_into
    }

    /// True while the region is part of the tree.
    pub fn is_live(&self) -> bool {
        self.absorbed_into.is_none()
    }

    /// Human-readable label, `"{id}({color})"`.
    pub fn label(&self) -> String {
        format!("{}({})", self.id, self.color)
    }
}
