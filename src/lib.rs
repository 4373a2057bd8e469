//! # surroundedness-tree
//!
//! Enclosure trees for binary raster images.
//!
//! The crate answers one question:
//!
//! > Which regions of a two-color image sit inside which?
//!
//! Every maximal connected region of one color becomes a node. A node's
//! parent is the smallest opposite-color region that surrounds it; the
//! synthetic root stands for the background touching the image boundary.
//!
//! ## Architecture
//!
//! ```text
//! BinaryGrid → encode → EncodedGrid → TreeBuilder → EnclosureTree → TreeEmitter → EmitReport
//!                                        ↓                                        ↓
//!                                  frontier + merges                 text / overlays / diagram
//! ```
//!
//! The builder makes one row-major pass over the encoded grid. It keeps one
//! region per column (the frontier) and creates, extends and merges regions
//! as it goes, so the tree is complete when the last cell is read.
//!
//! ## Determinism Guarantees
//!
//! - Region ids follow creation order within a build; the root is id 0
//! - Children are visited in creation order
//! - Same grid + same policy → identical `EmitReport::report_hash`
//!
//! ## Features
//!
//! - `raster`: load images and draw overlays (`image`, `imageproc`)
//! - `cli`: the `surroundedness` binary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod encoding;
pub mod tree;
pub mod builder;
pub mod policy;
pub mod emit;

#[cfg(feature = "raster")]
pub mod raster;

// Re-exports
pub use types::{BinaryGrid, BoundingBox, ColorClass, GridError, Region, RegionId, RegionStats};
pub use encoding::{encode, EncodedGrid, EncodingError};
pub use tree::{EnclosureTree, TreeInvariantError};
pub use builder::{MergeRecord, MergeRelation, ScanError, ScanOutput, ScanStats, TreeBuilder};
pub use policy::{PolicyError, RenderPolicyV1};
pub use emit::{DiagramMarkup, DisplayColor, EmitReport, OverlayBox, RegionDescriptor, TreeEmitter};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};

#[cfg(feature = "raster")]
pub use raster::{RasterError, RasterOptions};

/// Schema version for emitted reports.
/// Increment on breaking changes to any serialized type.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "render_policy_v1";

/// Encode, scan and emit in one call.
pub fn analyze(grid: &BinaryGrid, policy: &RenderPolicyV1) -> (ScanOutput, EmitReport) {
    let encoded = encode(grid);
    let scan = TreeBuilder::scan(&encoded);
    let report = TreeEmitter::new(policy.clone()).emit(&scan.tree);
    (scan, report)
}
