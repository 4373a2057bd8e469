//! Emitted region records and the report that bundles them.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::diagram::DiagramMarkup;
use super::overlay::OverlayBox;
use crate::canonical::canonical_hash_hex;
use crate::types::{BoundingBox, ColorClass, RegionId};

/// Description of one reported region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    /// Region id within its tree.
    pub id: RegionId,
    /// Label, `"{id}({color})"`.
    pub label: String,
    /// Color class.
    pub color: ColorClass,
    /// Depth below the root.
    pub depth: usize,
    /// Contributing cells.
    pub area: u64,
    /// Center of gravity `(x, y)`.
    pub centroid: Option<(f64, f64)>,
    /// Bounding box.
    pub bbox: BoundingBox,
    /// Labels of reported direct children.
    pub children: Vec<String>,
    /// Visual weight relative to the whole image.
    pub weight: f64,
    /// Whether the region is an explicit diagram node.
    pub drawn: bool,
}

impl RegionDescriptor {
    /// One-line description used in the text log.
    pub fn summary(&self) -> String {
        let (cx, cy) = self.centroid.unwrap_or((0.0, 0.0));
        format!(
            "{} with area {}, center of gravity ({:.6},{:.6}), enclosed by {}",
            self.label, self.area, cx, cy, self.bbox
        )
    }
}

/// Everything the emitter produces for one tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitReport {
    /// Schema version of the report.
    pub schema_version: String,
    /// Policy version used.
    pub policy_id: String,
    /// Hash of the policy parameters.
    pub policy_hash: String,
    /// Sum of live region areas (real cells in the grid).
    pub total_area: u64,
    /// Reported regions, depth-first in child creation order.
    pub records: Vec<RegionDescriptor>,
    /// Boxes to outline, aligned with `records`.
    pub overlays: Vec<OverlayBox>,
    /// Diagram markup.
    pub diagram: DiagramMarkup,
    /// Hash of records, overlays and diagram.
    pub report_hash: String,
}

impl EmitReport {
    pub(crate) fn new(
        policy_id: String,
        policy_hash: String,
        total_area: u64,
        records: Vec<RegionDescriptor>,
        overlays: Vec<OverlayBox>,
        diagram: DiagramMarkup,
    ) -> Self {
        let report_hash = canonical_hash_hex(&(&records, &overlays, &diagram));
        Self {
            schema_version: crate::SCHEMA_VERSION.to_string(),
            policy_id,
            policy_hash,
            total_area,
            records,
            overlays,
            diagram,
            report_hash,
        }
    }

    /// Find a record by label.
    pub fn get(&self, label: &str) -> Option<&RegionDescriptor> {
        self.records.iter().find(|r| r.label == label)
    }

    /// Records at a given depth.
    pub fn at_depth(&self, depth: usize) -> Vec<&RegionDescriptor> {
        self.records.iter().filter(|r| r.depth == depth).collect()
    }

    /// Plain-text dump: one summary line per region, followed by a line
    /// listing its reported children when it has any.
    pub fn text_log(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.summary());
            out.push('\n');
            if !record.children.is_empty() {
                // Writing into a String never fails.
                let _ = writeln!(out, "  encloses {}", record.children.join(" "));
            }
        }
        out
    }

    /// Text log followed by the diagram preamble and tree.
    pub fn log_document(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            self.text_log(),
            self.diagram.preamble,
            self.diagram.tree
        )
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
