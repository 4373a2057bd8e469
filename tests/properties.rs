//! Property tests over random binary images.
//!
//! The tree is compared against a plain flood-fill labelling of the bordered
//! image: HIGH pixels are 8-connected, LOW pixels 4-connected.

use proptest::prelude::*;
use std::collections::VecDeque;

use surroundedness_tree::{
    analyze, encode, BinaryGrid, ColorClass, EncodedGrid, Region, RegionId, RenderPolicyV1,
    ScanOutput, TreeBuilder,
};

fn arb_grid() -> impl Strategy<Value = BinaryGrid> {
    (1usize..10, 1usize..10).prop_flat_map(|(w, h)| {
        proptest::collection::vec(0u8..2, w * h)
            .prop_map(move |cells| BinaryGrid::from_vec(w, h, cells).unwrap())
    })
}

/// Sorted component sizes of `color` in the bordered image.
fn component_areas(image: &BinaryGrid, color: ColorClass) -> Vec<u64> {
    let g = image.bordered();
    let (w, h) = (g.width() as isize, g.height() as isize);
    let value = color.value();
    let neighbours: &[(isize, isize)] = match color {
        ColorClass::High => &[(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)],
        ColorClass::Low => &[(-1, 0), (0, -1), (0, 1), (1, 0)],
    };

    let mut seen = vec![false; g.len()];
    let mut areas = Vec::new();
    for start in 0..g.len() {
        if seen[start] || g.cells()[start] != value {
            continue;
        }
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        let mut area = 0u64;
        while let Some(i) = queue.pop_front() {
            area += 1;
            let (r, c) = ((i as isize) / w, (i as isize) % w);
            for (dr, dc) in neighbours {
                let (nr, nc) = (r + dr, c + dc);
                if nr < 0 || nc < 0 || nr >= h || nc >= w {
                    continue;
                }
                let j = (nr * w + nc) as usize;
                if !seen[j] && g.cells()[j] == value {
                    seen[j] = true;
                    queue.push_back(j);
                }
            }
        }
        areas.push(area);
    }
    areas.sort_unstable();
    areas
}

fn region_areas(out: &ScanOutput, color: ColorClass) -> Vec<u64> {
    let mut areas: Vec<u64> = out
        .tree
        .regions()
        .filter(|r| r.color() == color)
        .map(Region::area)
        .collect();
    areas.sort_unstable();
    areas
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_tree_is_well_formed(image in arb_grid()) {
        let out = TreeBuilder::scan(&encode(&image));
        prop_assert_eq!(out.tree.check_invariants(), Ok(()));

        for region in out.tree.regions() {
            match region.parent() {
                None => prop_assert_eq!(region.id(), RegionId::ROOT),
                Some(p) => {
                    let parent = out.tree.region(p);
                    prop_assert_ne!(region.color(), parent.color());
                    prop_assert_eq!(
                        parent.children().filter(|c| *c == region.id()).count(),
                        1
                    );
                    prop_assert!(!out.tree.is_ancestor_of(region.id(), region.id()));
                }
            }
        }
    }

    #[test]
    fn prop_area_is_conserved(image in arb_grid()) {
        let encoded = encode(&image);
        let out = TreeBuilder::scan(&encoded);

        prop_assert_eq!(out.tree.total_area(), encoded.real_cell_count());
        let high: u64 = region_areas(&out, ColorClass::High).iter().sum();
        prop_assert_eq!(high, image.count(ColorClass::High) as u64);
        prop_assert_eq!(out.stats.cells, (encoded.width() * encoded.height()) as u64);
    }

    #[test]
    fn prop_regions_match_flood_fill(image in arb_grid()) {
        let out = TreeBuilder::scan(&encode(&image));
        prop_assert_eq!(region_areas(&out, ColorClass::High), component_areas(&image, ColorClass::High));
        prop_assert_eq!(region_areas(&out, ColorClass::Low), component_areas(&image, ColorClass::Low));
    }

    #[test]
    fn prop_merges_retire_exactly_the_loser(image in arb_grid()) {
        let out = TreeBuilder::scan(&encode(&image));
        prop_assert_eq!(out.merges.len() as u64, out.stats.merges);
        prop_assert_eq!(
            out.tree.all_regions().len() - out.tree.len(),
            out.merges.len()
        );

        for merge in &out.merges {
            prop_assert_ne!(merge.survivor, merge.absorbed);
            let retired = out.tree.region(merge.absorbed);
            prop_assert_eq!(retired.absorbed_into(), Some(merge.survivor));
            prop_assert!(out.tree.region(out.tree.resolve(merge.absorbed)).is_live());
        }
    }

    #[test]
    fn prop_rescan_is_identical(image in arb_grid()) {
        let policy = RenderPolicyV1::default();
        let (scan_a, report_a) = analyze(&image, &policy);
        let (scan_b, report_b) = analyze(&image, &policy);
        prop_assert_eq!(scan_a.tree.fingerprint(), scan_b.tree.fingerprint());
        prop_assert_eq!(report_a, report_b);
    }

    #[test]
    fn prop_encoding_is_accepted_as_prepared(image in arb_grid()) {
        let encoded = encode(&image);
        let prepared = EncodedGrid::from_prepared(encoded.grid().clone());
        prop_assert_eq!(prepared, Ok(encoded));
    }
}
