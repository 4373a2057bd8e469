//! Arena-backed enclosure tree.
//!
//! Regions are stored in a `Vec` indexed by [`RegionId`]. Parent and child
//! links are ids, so detaching and reparenting are index rewrites. Regions
//! retired by a merge stay in the arena (with `absorbed_into` set) but are
//! unreachable from the root.

use serde::Serialize;

use crate::canonical::canonical_hash_hex;
use crate::types::{ColorClass, Region, RegionId, RegionStats};

/// Structural problem found by [`EnclosureTree::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeInvariantError {
    /// Root is not LOW or has a parent.
    #[error("Root region is malformed")]
    BadRoot,
    /// A child has the same color as its parent.
    #[error("Region {child} has the same color as its parent {parent}")]
    SameColorChild {
        /// Parent region.
        parent: RegionId,
        /// Child region.
        child: RegionId,
    },
    /// Parent and child links disagree.
    #[error("Region {child} is listed under {parent} but points elsewhere")]
    BrokenLink {
        /// Region listing the child.
        parent: RegionId,
        /// Region being listed.
        child: RegionId,
    },
    /// A live region is not reachable from the root.
    #[error("Region {0} is live but detached from the tree")]
    Orphan(RegionId),
    /// A retired region is still linked into the tree.
    #[error("Retired region {0} is still linked")]
    RetiredLinked(RegionId),
    /// Walking parents from a region never reached the root.
    #[error("Region {0} is on a parent cycle")]
    Cycle(RegionId),
}

/// The enclosure (surroundedness) tree of one image.
#[derive(Debug, Clone)]
pub struct EnclosureTree {
    regions: Vec<Region>,
}

impl Default for EnclosureTree {
    fn default() -> Self {
        Self::new()
    }
}

impl EnclosureTree {
    /// Tree holding only the synthetic LOW root.
    pub fn new() -> Self {
        Self {
            regions: vec![Region::new(RegionId::ROOT, ColorClass::Low)],
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation (used by the builder)
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) fn create(&mut self, color: ColorClass) -> RegionId {
        let id = RegionId::new(self.regions.len() as u32);
        self.regions.push(Region::new(id, color));
        id
    }

    pub(crate) fn region_mut(&mut self, id: RegionId) -> &mut Region {
        &mut self.regions[id.index()]
    }

    pub(crate) fn add_child(&mut self, parent: RegionId, child: RegionId) {
        self.regions[child.index()].parent = Some(parent);
        self.regions[parent.index()].children.insert(child);
    }

    pub(crate) fn detach_from_parent(&mut self, id: RegionId) {
        if let Some(parent) = self.regions[id.index()].parent.take() {
            self.regions[parent.index()].children.remove(&id);
        }
    }

    /// Move `loser`'s children and statistics into `winner`.
    ///
    /// The caller detaches `loser` first; its parent link is left alone.
    pub(crate) fn absorb(&mut self, winner: RegionId, loser: RegionId) {
        let children = std::mem::take(&mut self.regions[loser.index()].children);
        for child in children {
            self.add_child(winner, child);
        }
        let stats = self.regions[loser.index()].stats;
        self.regions[winner.index()].stats.merge(&stats);
        self.regions[loser.index()].absorbed_into = Some(winner);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// The synthetic root.
    pub fn root(&self) -> &Region {
        &self.regions[RegionId::ROOT.index()]
    }

    /// Look up a region, live or retired.
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.index())
    }

    /// Look up a region. Panics on an id from another tree.
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    /// Every region ever created, in creation order.
    pub fn all_regions(&self) -> &[Region] {
        &self.regions
    }

    /// Regions that are part of the finished tree, in creation order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.iter().filter(|r| r.is_live())
    }

    /// Number of live regions, root included.
    pub fn len(&self) -> usize {
        self.regions().count()
    }

    /// Always false: the root is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Direct children of `id` in creation order.
    pub fn children(&self, id: RegionId) -> impl Iterator<Item = &Region> + '_ {
        self.regions[id.index()].children().map(move |c| &self.regions[c.index()])
    }

    /// True iff `ancestor` appears on `descendant`'s parent chain.
    ///
    /// A region is not its own ancestor.
    pub fn is_ancestor_of(&self, ancestor: RegionId, descendant: RegionId) -> bool {
        let mut cur = self.regions[descendant.index()].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.regions[p.index()].parent;
        }
        false
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: RegionId) -> usize {
        let mut depth = 0;
        let mut cur = self.regions[id.index()].parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.regions[p.index()].parent;
        }
        depth
    }

    /// Maximum depth over live regions.
    pub fn height(&self) -> usize {
        self.regions().map(|r| self.depth(r.id)).max().unwrap_or(0)
    }

    /// Follow `absorbed_into` links to the region that finally holds `id`.
    pub fn resolve(&self, id: RegionId) -> RegionId {
        let mut cur = id;
        while let Some(next) = self.regions[cur.index()].absorbed_into {
            cur = next;
        }
        cur
    }

    /// Sum of areas over live regions.
    pub fn total_area(&self) -> u64 {
        self.regions().map(Region::area).sum()
    }

    /// Verify the structural invariants of the tree.
    ///
    /// Checks the root, color alternation, parent/child agreement,
    /// reachability of every live region and absence of cycles.
    pub fn check_invariants(&self) -> Result<(), TreeInvariantError> {
        let root = self.root();
        if root.color != ColorClass::Low || root.parent.is_some() || !root.is_live() {
            return Err(TreeInvariantError::BadRoot);
        }

        for region in &self.regions {
            if !region.is_live() {
                if region.parent.is_some() || !region.children.is_empty() {
                    return Err(TreeInvariantError::RetiredLinked(region.id));
                }
                continue;
            }
            for child in region.children() {
                let c = &self.regions[child.index()];
                if c.parent != Some(region.id) || !c.is_live() {
                    return Err(TreeInvariantError::BrokenLink {
                        parent: region.id,
                        child,
                    });
                }
                if c.color == region.color {
                    return Err(TreeInvariantError::SameColorChild {
                        parent: region.id,
                        child,
                    });
                }
            }
            if region.id != RegionId::ROOT {
                match region.parent {
                    None => return Err(TreeInvariantError::Orphan(region.id)),
                    Some(p) if !self.regions[p.index()].children.contains(&region.id) => {
                        return Err(TreeInvariantError::BrokenLink { parent: p, child: region.id });
                    }
                    Some(_) => {}
                }
            }
        }

        // Every live region must reach the root within `len` steps.
        let limit = self.regions.len();
        for region in self.regions() {
            let mut cur = region.id;
            let mut steps = 0;
            while let Some(p) = self.regions[cur.index()].parent {
                steps += 1;
                if steps > limit {
                    return Err(TreeInvariantError::Cycle(region.id));
                }
                cur = p;
            }
            if cur != RegionId::ROOT {
                return Err(TreeInvariantError::Orphan(region.id));
            }
        }
        Ok(())
    }

    /// Hash of the tree's shape and statistics, independent of region ids.
    ///
    /// Two scans of the same grid produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&self.shape(RegionId::ROOT))
    }

    fn shape(&self, id: RegionId) -> ShapeNode {
        let region = &self.regions[id.index()];
        ShapeNode {
            color: region.color,
            stats: region.stats,
            children: region.children().map(|c| self.shape(c)).collect(),
        }
    }
}

/// Id-free view of a subtree, hashed by [`EnclosureTree::fingerprint`].
#[derive(Serialize)]
struct ShapeNode {
    color: ColorClass,
    stats: RegionStats,
    children: Vec<ShapeNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root(0) -> a(1) -> b(0), plus sibling c(1) under root.
    fn small_tree() -> (EnclosureTree, RegionId, RegionId, RegionId) {
        let mut tree = EnclosureTree::new();
        let a = tree.create(ColorClass::High);
        tree.add_child(RegionId::ROOT, a);
        let b = tree.create(ColorClass::Low);
        tree.add_child(a, b);
        let c = tree.create(ColorClass::High);
        tree.add_child(RegionId::ROOT, c);
        (tree, a, b, c)
    }

    #[test]
    fn test_ancestry_and_depth() {
        let (tree, a, b, c) = small_tree();
        assert!(tree.is_ancestor_of(RegionId::ROOT, b));
        assert!(tree.is_ancestor_of(a, b));
        assert!(!tree.is_ancestor_of(b, a));
        assert!(!tree.is_ancestor_of(c, b));
        assert!(!tree.is_ancestor_of(a, a));
        assert_eq!(tree.depth(b), 2);
        assert_eq!(tree.height(), 2);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_absorb_moves_children_and_stats() {
        let (mut tree, a, b, c) = small_tree();
        tree.region_mut(a).extend_at(1, 3);
        tree.region_mut(c).extend_at(1, 7);
        tree.region_mut(c).extend_at(2, 7);

        tree.detach_from_parent(a);
        tree.absorb(c, a);

        assert_eq!(tree.region(b).parent(), Some(c));
        assert_eq!(tree.region(c).area(), 3);
        assert_eq!(tree.region(a).absorbed_into(), Some(c));
        assert_eq!(tree.resolve(a), c);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().children().collect::<Vec<_>>(), vec![c]);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_invariants_catch_same_color_child() {
        let mut tree = EnclosureTree::new();
        let bad = tree.create(ColorClass::Low);
        tree.add_child(RegionId::ROOT, bad);
        assert_eq!(
            tree.check_invariants(),
            Err(TreeInvariantError::SameColorChild { parent: RegionId::ROOT, child: bad })
        );
    }

    #[test]
    fn test_invariants_catch_orphan() {
        let mut tree = EnclosureTree::new();
        let lost = tree.create(ColorClass::High);
        assert_eq!(tree.check_invariants(), Err(TreeInvariantError::Orphan(lost)));
    }

    #[test]
    fn test_fingerprint_ignores_ids() {
        let (t1, _, _, _) = small_tree();

        // Same shape, created in a different order.
        let mut t2 = EnclosureTree::new();
        let a = t2.create(ColorClass::High);
        let c = t2.create(ColorClass::High);
        let b = t2.create(ColorClass::Low);
        t2.add_child(RegionId::ROOT, a);
        t2.add_child(RegionId::ROOT, c);
        t2.add_child(a, b);

        assert_eq!(t1.fingerprint(), t2.fingerprint());
    }
}
