//! Depth-first tree emitter.

use crate::policy::{is_drawn, is_significant, visual_weight, RenderPolicyV1};
use crate::tree::EnclosureTree;
use crate::types::RegionId;

use super::diagram::{DiagramMarkup, DiagramNode};
use super::overlay::{DisplayColor, OverlayBox};
use super::report::{EmitReport, RegionDescriptor};

/// Walks a finished tree and produces an [`EmitReport`].
///
/// ## Traversal
///
/// Regions are visited depth-first, children in creation order. A region
/// below the significance threshold is skipped together with its subtree.
/// The root is always reported and always drawn, since it anchors the
/// diagram. Other reported regions become diagram nodes only when they pass
/// the depth cutoff; otherwise they are folded into their nearest drawn
/// ancestor.
#[derive(Debug, Clone, Default)]
pub struct TreeEmitter {
    policy: RenderPolicyV1,
}

struct EmitState {
    total_area: u64,
    records: Vec<RegionDescriptor>,
    overlays: Vec<OverlayBox>,
}

impl TreeEmitter {
    /// Create an emitter with a policy.
    pub fn new(policy: RenderPolicyV1) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &RenderPolicyV1 {
        &self.policy
    }

    /// Emit records, overlays and diagram for `tree`.
    pub fn emit(&self, tree: &EnclosureTree) -> EmitReport {
        let mut state = EmitState {
            total_area: tree.total_area(),
            records: Vec::new(),
            overlays: Vec::new(),
        };

        let mut top = self.visit(tree, RegionId::ROOT, 0, &mut state);
        let root = match top.pop() {
            Some(node) if top.is_empty() => node,
            // The root is always drawn, so it is the single top-level node.
            _ => unreachable!("root must produce exactly one diagram node"),
        };
        let diagram = DiagramMarkup::render(&root, &self.policy.node_style);

        tracing::debug!(
            records = state.records.len(),
            diagram_nodes = diagram.node_count,
            total_area = state.total_area,
            "Tree emitted"
        );

        EmitReport::new(
            self.policy.policy_id().to_string(),
            self.policy.params_hash(),
            state.total_area,
            state.records,
            state.overlays,
            diagram,
        )
    }

    fn visit(
        &self,
        tree: &EnclosureTree,
        id: RegionId,
        depth: usize,
        state: &mut EmitState,
    ) -> Vec<DiagramNode> {
        let region = tree.region(id);
        let is_root = id == RegionId::ROOT;
        if !is_root && !is_significant(region.area(), &self.policy) {
            return Vec::new();
        }

        let reported: Vec<_> = tree
            .children(id)
            .filter(|c| is_significant(c.area(), &self.policy))
            .collect();

        let weight = visual_weight(region.area(), state.total_area, &self.policy);
        let drawn = is_root || is_drawn(region.area(), depth, &self.policy);
        let color = DisplayColor::for_region(region.color(), region.stats());

        state.records.push(RegionDescriptor {
            id,
            label: region.label(),
            color: region.color(),
            depth,
            area: region.area(),
            centroid: region.centroid(),
            bbox: region.bbox(),
            children: reported.iter().map(|c| c.label()).collect(),
            weight,
            drawn,
        });
        state.overlays.push(OverlayBox {
            bbox: region.bbox(),
            color,
        });

        let mut below = Vec::new();
        for child in reported {
            below.extend(self.visit(tree, child.id(), depth + 1, state));
        }

        if !drawn {
            return below;
        }
        vec![DiagramNode {
            color_name: format!("region{id}"),
            color,
            scale: weight,
            pattern: if depth % 2 == 1 {
                self.policy.odd_depth_pattern.clone()
            } else {
                None
            },
            children: below,
        }]
    }
}
