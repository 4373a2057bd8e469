//! Golden tests for the enclosure tree.
//!
//! These tests pin down the tree shape and statistics for hand-drawn
//! images, and check that repeated runs agree.

use surroundedness_tree::{
    analyze, encode, BinaryGrid, BoundingBox, ColorClass, EncodedGrid, MergeRelation, Region,
    RegionId, RenderPolicyV1, ScanOutput, TreeBuilder, TreeEmitter,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn grid(text: &str) -> BinaryGrid {
    text.parse().unwrap()
}

fn scan(text: &str) -> ScanOutput {
    TreeBuilder::scan(&encode(&grid(text)))
}

fn root_children(out: &ScanOutput) -> Vec<&Region> {
    out.tree.children(RegionId::ROOT).collect()
}

fn rings(levels: usize) -> String {
    // Concentric squares alternating #/. from the outside in.
    let size = 2 * levels + 1;
    let mut s = String::new();
    for r in 0..size {
        for c in 0..size {
            let ring = r.min(c).min(size - 1 - r).min(size - 1 - c);
            s.push(if ring % 2 == 0 { '#' } else { '.' });
        }
        s.push('\n');
    }
    s
}

// ─────────────────────────────────────────────────────────────────────────────
// SCENARIOS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_region() {
    let out = scan("###\n###\n###");
    let children = root_children(&out);

    assert_eq!(children.len(), 1);
    let region = children[0];
    assert_eq!(region.color(), ColorClass::High);
    assert_eq!(region.area(), 9);
    // Bordered frame: the 3x3 interior spans (1,1) -- (3,3).
    assert_eq!(region.bbox(), BoundingBox::new(1, 1, 3, 3));
    assert_eq!(region.centroid(), Some((2.0, 2.0)));
    assert_eq!(region.child_count(), 0);
    assert!(out.tree.check_invariants().is_ok());
}

#[test]
fn test_nested_hole() {
    let out = scan("#####\n#####\n##.##\n#####\n#####");
    let children = root_children(&out);

    assert_eq!(children.len(), 1);
    let outer = children[0];
    assert_eq!(outer.color(), ColorClass::High);
    assert_eq!(outer.area(), 24);

    let holes: Vec<_> = out.tree.children(outer.id()).collect();
    assert_eq!(holes.len(), 1);
    let hole = holes[0];
    assert_eq!(hole.color(), ColorClass::Low);
    assert_eq!(hole.area(), 1);
    assert_eq!(hole.centroid(), Some((3.0, 3.0)));
    assert_eq!(out.tree.depth(hole.id()), 2);
}

#[test]
fn test_blocks_joined_by_bridge_row() {
    let out = scan("##..##\n##..##\n######");
    let children = root_children(&out);

    // One region, not two siblings.
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].area(), 4 + 4 + 6);
    assert_eq!(children[0].bbox(), BoundingBox::new(1, 1, 6, 3));

    assert_eq!(out.merges.len(), 1);
    let merge = out.merges[0];
    assert_eq!(merge.relation, MergeRelation::Siblings);
    assert_eq!(merge.survivor, children[0].id());
    let retired = out.tree.region(merge.absorbed);
    assert!(!retired.is_live());
    assert_eq!(retired.absorbed_into(), Some(merge.survivor));
    assert_eq!(out.tree.resolve(merge.absorbed), children[0].id());
}

#[test]
fn test_open_pocket_merges_into_root() {
    // The pocket looks enclosed until the border row below reaches it.
    let out = scan("###\n#.#\n#.#");
    let children = root_children(&out);

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].area(), 7);
    assert_eq!(children[0].child_count(), 0);
    assert!(out
        .merges
        .iter()
        .any(|m| m.relation == MergeRelation::LeftEnclosesUp && m.survivor == RegionId::ROOT));
}

#[test]
fn test_side_pocket_merges_upward() {
    // The pocket opens to the right, where the upper neighbour is the root.
    let out = scan("###.\n#...\n###.");
    let children = root_children(&out);

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].child_count(), 0);
    assert!(out
        .merges
        .iter()
        .any(|m| m.relation == MergeRelation::UpEnclosesLeft && m.survivor == RegionId::ROOT));
}

#[test]
fn test_concentric_rings_nest() {
    let levels = 4;
    let out = scan(&rings(levels));

    // root -> ring -> gap -> ring -> gap -> centre, one region per level.
    assert_eq!(out.tree.len(), levels + 2);
    assert_eq!(out.tree.height(), levels + 1);

    let mut id = RegionId::ROOT;
    let mut color = ColorClass::Low;
    for _ in 0..=levels {
        let kids: Vec<_> = out.tree.children(id).collect();
        assert_eq!(kids.len(), 1);
        assert_eq!(kids[0].color(), color.opposite());
        id = kids[0].id();
        color = kids[0].color();
    }
    assert_eq!(out.tree.region(id).area(), 1);
}

#[test]
fn test_siblings_in_creation_order() {
    let out = scan("#.#.#\n.....\n#.#.#");
    let ids: Vec<_> = root_children(&out).iter().map(|r| r.id()).collect();
    assert_eq!(ids.len(), 6);
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn test_area_conservation() {
    let image = grid("##..#\n#.#.#\n##..#\n...##");
    let encoded = encode(&image);
    let out = TreeBuilder::scan(&encoded);

    assert_eq!(out.tree.total_area(), encoded.real_cell_count());

    let high: u64 = out
        .tree
        .regions()
        .filter(|r| r.color() == ColorClass::High)
        .map(Region::area)
        .sum();
    assert_eq!(high, image.count(ColorClass::High) as u64);
}

#[test]
fn test_prepared_grid_matches_encoded() {
    let image = grid("#..#\n.##.\n#..#");
    let encoded = encode(&image);
    let prepared = EncodedGrid::from_prepared(encoded.grid().clone()).unwrap();

    let a = TreeBuilder::scan(&encoded);
    let b = TreeBuilder::scan(&prepared);
    assert_eq!(a.tree.fingerprint(), b.tree.fingerprint());
}

// ─────────────────────────────────────────────────────────────────────────────
// DETERMINISM TESTS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_same_image_same_report_100_runs() {
    let image = grid(&rings(3));
    let policy = RenderPolicyV1::default();

    let (first_scan, first) = analyze(&image, &policy);
    for i in 1..100 {
        let (scan, report) = analyze(&image, &policy);
        assert_eq!(
            first.report_hash, report.report_hash,
            "Report hash must be deterministic (run {} differs from run 0)",
            i
        );
        assert_eq!(first_scan.tree.fingerprint(), scan.tree.fingerprint());
    }

    eprintln!("Deterministic report_hash: {}", first.report_hash);
}

#[test]
fn test_policy_change_changes_report_not_tree() {
    let image = grid(&rings(3));
    let (scan_a, report_a) = analyze(&image, &RenderPolicyV1::default());

    let mut policy = RenderPolicyV1::default();
    policy.depth_base = 0;
    policy.depth_step = 0;
    let (scan_b, report_b) = analyze(&image, &policy);

    assert_eq!(scan_a.tree.fingerprint(), scan_b.tree.fingerprint());
    assert_ne!(report_a.policy_hash, report_b.policy_hash);
    assert_ne!(report_a.diagram, report_b.diagram);
}

#[test]
fn test_report_json_roundtrip() {
    let image = grid(&rings(2));
    let (_, report) = analyze(&image, &RenderPolicyV1::default());
    let json = report.to_json().unwrap();
    let back: surroundedness_tree::EmitReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.report_hash, report.report_hash);
    assert_eq!(back.records.len(), report.records.len());
}

#[test]
fn test_emitter_on_large_blob() {
    // 6x6 solid block with a 2x2 hole: both significant.
    let image = grid("######\n######\n##..##\n##..##\n######\n######");
    let out = TreeBuilder::scan(&encode(&image));
    let report = TreeEmitter::default().emit(&out.tree);

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].label, "0(0)");
    assert_eq!(report.records[1].area, 32);
    // The 4-cell hole is below the significance threshold.
    assert!(report.records[1].children.is_empty());
    assert_eq!(report.overlays.len(), report.records.len());
    assert!(report.log_document().contains(&report.diagram.tree));
}
