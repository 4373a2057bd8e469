//! Frontier tracker and merge engine.
//!
//! The builder consumes an encoded grid one cell at a time in row-major
//! order and grows an [`EnclosureTree`] as it goes, without a separate
//! labelling pass.
//!
//! ## Algorithm
//!
//! `frontier[c]` holds the region owning the most recently scanned cell of
//! column `c`. For each cell, `left` is `frontier[c - 1]` (the root at
//! column 0) and `up` is `frontier[c]`:
//!
//! 1. `left` and `up` share a color:
//!    - the cell has the other color: start a child region under `left`;
//!    - the cell matches: extend `left`, and if `left != up` the two regions
//!      just touched, so merge them.
//! 2. Colors differ: extend whichever of the two matches the cell.
//!
//! ## Merge relation
//!
//! Because only left and upper neighbours are inspected, two regions found
//! to touch are always either in an ancestor/descendant relation or
//! siblings. The ancestor (or, for siblings, `up`) survives; the loser is
//! detached, absorbed, and every frontier slot naming it is rewritten. Any
//! other relation means the input broke the encoding contract or the scan
//! has a defect, and is fatal.

use serde::{Deserialize, Serialize};

use crate::encoding::EncodedGrid;
use crate::tree::EnclosureTree;
use crate::types::{ColorClass, RegionId};

/// Error type for driving the builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Width or height is zero.
    #[error("Cannot scan an empty grid ({rows}x{cols})")]
    EmptyGrid {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
    /// More cells were fed than the grid holds.
    #[error("Grid already complete after {cells} cells")]
    Overrun {
        /// Cells in the grid.
        cells: usize,
    },
    /// `finish` was called before every cell was fed.
    #[error("Scan incomplete: stopped at row {row}, column {col}")]
    Incomplete {
        /// Next row to be scanned.
        row: usize,
        /// Next column to be scanned.
        col: usize,
    },
}

/// How the two regions of a merge were related when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeRelation {
    /// The left region encloses the upper one.
    LeftEnclosesUp,
    /// The upper region encloses the left one.
    UpEnclosesLeft,
    /// Both regions share a parent.
    Siblings,
}

/// One merge performed during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRecord {
    /// Region that kept its identity.
    pub survivor: RegionId,
    /// Region that was retired.
    pub absorbed: RegionId,
    /// Relation at the time of the merge.
    pub relation: MergeRelation,
    /// Row of the cell that triggered the merge.
    pub row: usize,
    /// Encoded column of the cell that triggered the merge.
    pub col: usize,
}

/// Counters collected while scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Cells processed.
    pub cells: u64,
    /// Regions created (root excluded).
    pub regions_created: u64,
    /// Merges performed.
    pub merges: u64,
    /// Frontier slots rewritten by merges.
    pub frontier_rewrites: u64,
}

/// Result of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// The finished tree.
    pub tree: EnclosureTree,
    /// Every merge, in the order performed.
    pub merges: Vec<MergeRecord>,
    /// Scan counters.
    pub stats: ScanStats,
}

/// Incremental tree builder over a row-major stream of cells.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    tree: EnclosureTree,
    frontier: Vec<RegionId>,
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    merges: Vec<MergeRecord>,
    stats: ScanStats,
}

impl TreeBuilder {
    /// Create a builder for a `rows` x `cols` encoded grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ScanError> {
        if rows == 0 || cols == 0 {
            return Err(ScanError::EmptyGrid { rows, cols });
        }
        Ok(Self {
            tree: EnclosureTree::new(),
            frontier: vec![RegionId::ROOT; cols],
            rows,
            cols,
            row: 0,
            col: 0,
            merges: Vec::new(),
            stats: ScanStats::default(),
        })
    }

    /// Scan a whole encoded grid.
    pub fn scan(grid: &EncodedGrid) -> ScanOutput {
        let span = tracing::debug_span!("scan", rows = grid.height(), cols = grid.width());
        let _enter = span.enter();

        let mut builder = match Self::new(grid.height(), grid.width()) {
            Ok(b) => b,
            Err(e) => unreachable!("encoded grids are never empty: {e}"),
        };
        for color in grid.colors() {
            builder.push(color);
        }
        match builder.finish() {
            Ok(out) => out,
            Err(e) => unreachable!("encoded grid fed completely: {e}"),
        }
    }

    /// True once every cell has been fed.
    pub fn is_complete(&self) -> bool {
        self.row == self.rows
    }

    /// Cursor of the next cell, `(row, col)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Tree built so far.
    pub fn tree(&self) -> &EnclosureTree {
        &self.tree
    }

    /// Current frontier, one region per column.
    pub fn frontier(&self) -> &[RegionId] {
        &self.frontier
    }

    /// Feed the next cell.
    pub fn process(&mut self, value: ColorClass) -> Result<(), ScanError> {
        if self.is_complete() {
            return Err(ScanError::Overrun {
                cells: self.rows * self.cols,
            });
        }
        self.push(value);
        Ok(())
    }

    /// Consume the builder and return the finished tree.
    pub fn finish(self) -> Result<ScanOutput, ScanError> {
        if !self.is_complete() {
            return Err(ScanError::Incomplete {
                row: self.row,
                col: self.col,
            });
        }
        debug_assert!(
            self.tree.check_invariants().is_ok(),
            "scan produced a malformed tree: {:?}",
            self.tree.check_invariants()
        );
        tracing::debug!(
            cells = self.stats.cells,
            regions = self.tree.len(),
            created = self.stats.regions_created,
            merges = self.stats.merges,
            depth = self.tree.height(),
            "Scan complete"
        );
        Ok(ScanOutput {
            tree: self.tree,
            merges: self.merges,
            stats: self.stats,
        })
    }

    fn push(&mut self, value: ColorClass) {
        let (row, col) = (self.row, self.col);
        let left = if col == 0 { RegionId::ROOT } else { self.frontier[col - 1] };
        let up = self.frontier[col];
        let left_color = self.tree.region(left).color;
        let up_color = self.tree.region(up).color;

        if left_color == up_color {
            if value != left_color {
                let child = self.tree.create(value);
                self.tree.region_mut(child).extend_at(row, col);
                self.tree.add_child(left, child);
                self.frontier[col] = child;
                self.stats.regions_created += 1;
            } else {
                self.tree.region_mut(left).extend_at(row, col);
                if left != up {
                    // The survivor takes over frontier[col] via the rewrite.
                    self.merge(left, up);
                }
            }
        } else {
            let owner = if left_color == value { left } else { up };
            self.tree.region_mut(owner).extend_at(row, col);
            self.frontier[col] = owner;
        }

        self.stats.cells += 1;
        self.col += 1;
        if self.col == self.cols {
            self.col = 0;
            self.row += 1;
        }
    }

    fn merge(&mut self, left: RegionId, up: RegionId) {
        let (survivor, absorbed, relation) = if self.tree.is_ancestor_of(left, up) {
            (left, up, MergeRelation::LeftEnclosesUp)
        } else if self.tree.is_ancestor_of(up, left) {
            (up, left, MergeRelation::UpEnclosesLeft)
        } else {
            let left_parent = self.tree.region(left).parent;
            let up_parent = self.tree.region(up).parent;
            assert!(
                left_parent.is_some() && left_parent == up_parent,
                "merge of unrelated regions {left} and {up} at ({}, {}): parents {:?} / {:?}",
                self.row,
                self.col,
                left_parent,
                up_parent,
            );
            (up, left, MergeRelation::Siblings)
        };

        tracing::trace!(
            survivor = %survivor,
            absorbed = %absorbed,
            relation = ?relation,
            row = self.row,
            col = self.col,
            "Merging regions"
        );

        self.absorb_into(absorbed, survivor);
        self.merges.push(MergeRecord {
            survivor,
            absorbed,
            relation,
            row: self.row,
            col: self.col,
        });
        self.stats.merges += 1;
    }

    fn absorb_into(&mut self, loser: RegionId, winner: RegionId) {
        self.tree.detach_from_parent(loser);
        self.tree.absorb(winner, loser);
        for slot in self.frontier.iter_mut().filter(|s| **s == loser) {
            *slot = winner;
            self.stats.frontier_rewrites += 1;
        }
    }
}
