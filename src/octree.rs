//! A bounded-depth octree over Cα atoms, used to enumerate candidate hydrogen-bond pairs in
//! roughly `O(n * k)` time instead of the `O(n^2)` of an all-pairs scan.
//!
//! The tree only ever needs to answer one question, "which AA-index pairs are within a given
//! cutoff of each other", so it exposes exactly that and nothing more — no nearest-neighbor
//! search, no insertion/removal after construction.

use crate::constants::{OCTREE_LEAF_CAPACITY, OCTREE_MAX_DEPTH};
use crate::errors::SecStructError;
use crate::vec3::Vec3;

/// One item indexed by the octree: a Cα coordinate tagged with its AA-index.
#[derive(Clone, Copy, Debug)]
pub struct OctreeItem {
    pub aa_index: usize,
    pub coord: Vec3,
}

impl OctreeItem {
    pub fn new(aa_index: usize, coord: Vec3) -> OctreeItem {
        OctreeItem { aa_index, coord }
    }
}

enum OctreeNode {
    Leaf(Vec<OctreeItem>),
    Internal { center: Vec3, half_extent: Vec3, children: Box<[OctreeNode; 8]> },
}

/// A bounded axis-aligned octree over a fixed set of [`OctreeItem`]s.
pub struct Octree {
    root: OctreeNode,
    /// Sub-volumes where construction hit [`OCTREE_MAX_DEPTH`] before separating all items.
    /// The affected items are still kept (as an oversized leaf) so no candidate pair is lost,
    /// but the anomaly is recorded for the caller to log, per the `OctreeExcessiveDivision`
    /// entry in the error taxonomy.
    excessive_divisions: Vec<SecStructError>,
}

impl Octree {
    /// Builds a tree around the bounding box of `items`, expanded by `margin` on each axis.
    pub fn build(items: Vec<OctreeItem>, margin: f64) -> Octree {
        let mut excessive_divisions = Vec::new();
        if items.is_empty() {
            return Octree { root: OctreeNode::Leaf(items), excessive_divisions };
        }

        let (center, half_extent) = bounding_box(&items, margin);
        let root = build_node(items, center, half_extent, 0, &mut excessive_divisions);
        Octree { root, excessive_divisions }
    }

    /// Sub-volumes that exceeded the maximum subdivision depth during construction.
    pub fn excessive_divisions(&self) -> &[SecStructError] {
        &self.excessive_divisions
    }

    /// All unordered AA-index pairs `{i, j}` with `i < j` whose Cα atoms are within `cutoff` of
    /// one another. The order of pairs in the returned vector is unspecified.
    pub fn candidate_pairs(&self, cutoff: f64) -> Vec<(usize, usize)> {
        let mut leaves = Vec::new();
        collect_leaves(&self.root, &mut leaves);

        let mut pairs = Vec::new();
        for a in 0..leaves.len() {
            let (center_a, half_a, items_a) = leaves[a];
            pairs_within_leaf(items_a, cutoff, &mut pairs);
            for b in (a + 1)..leaves.len() {
                let (center_b, half_b, items_b) = leaves[b];
                if boxes_within(center_a, half_a, center_b, half_b, cutoff) {
                    pairs_across_leaves(items_a, items_b, cutoff, &mut pairs);
                }
            }
        }
        pairs
    }
}

fn bounding_box(items: &[OctreeItem], margin: f64) -> (Vec3, Vec3) {
    let mut min = items[0].coord;
    let mut max = items[0].coord;
    for item in items {
        let p = item.coord;
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }
    min -= Vec3::new(margin, margin, margin);
    max += Vec3::new(margin, margin, margin);

    let center = (min + max) * 0.5;
    let half_extent = (max - min) * 0.5;
    (center, half_extent)
}

fn octant_index(p: &Vec3, center: &Vec3) -> usize {
    let mut idx = 0;
    if p.x >= center.x {
        idx |= 1;
    }
    if p.y >= center.y {
        idx |= 2;
    }
    if p.z >= center.z {
        idx |= 4;
    }
    idx
}

fn child_center(center: &Vec3, half_extent: &Vec3, octant: usize) -> Vec3 {
    let q = *half_extent * 0.5;
    Vec3::new(
        center.x + if octant & 1 != 0 { q.x } else { -q.x },
        center.y + if octant & 2 != 0 { q.y } else { -q.y },
        center.z + if octant & 4 != 0 { q.z } else { -q.z },
    )
}

fn build_node(
    items: Vec<OctreeItem>,
    center: Vec3,
    half_extent: Vec3,
    depth: u32,
    excessive_divisions: &mut Vec<SecStructError>,
) -> OctreeNode {
    if items.len() <= OCTREE_LEAF_CAPACITY {
        return OctreeNode::Leaf(items);
    }
    if depth >= OCTREE_MAX_DEPTH {
        let item_count = items.len();
        log::warn!("octree: could not separate {item_count} atoms within {OCTREE_MAX_DEPTH} levels");
        excessive_divisions.push(SecStructError::OctreeExcessiveDivision { item_count });
        return OctreeNode::Leaf(items);
    }

    let mut buckets: [Vec<OctreeItem>; 8] = Default::default();
    for item in items {
        let octant = octant_index(&item.coord, &center);
        buckets[octant].push(item);
    }

    let half_child = half_extent * 0.5;
    let mut children: Vec<OctreeNode> = Vec::with_capacity(8);
    for (octant, bucket) in buckets.into_iter().enumerate() {
        let child_center = child_center(&center, &half_extent, octant);
        children.push(build_node(bucket, child_center, half_child, depth + 1, excessive_divisions));
    }
    let children: Box<[OctreeNode; 8]> = children.try_into().ok().unwrap();

    OctreeNode::Internal { center, half_extent, children }
}

fn collect_leaves<'a>(node: &'a OctreeNode, out: &mut Vec<(Vec3, Vec3, &'a [OctreeItem])>) {
    match node {
        OctreeNode::Leaf(items) => {
            if !items.is_empty() {
                out.push((Vec3::zero(), Vec3::zero(), items));
            }
        }
        OctreeNode::Internal { center, half_extent, children } => {
            for child in children.iter() {
                match child {
                    OctreeNode::Leaf(items) => {
                        if !items.is_empty() {
                            out.push((*center, *half_extent, items));
                        }
                    }
                    internal => collect_leaves(internal, out),
                }
            }
        }
    }
}

/// Lower bound on the distance between any point in box A and any point in box B (axis-aligned,
/// given by center and half-extent); boxes that overlap return `0.0`.
fn box_distance_lower_bound(center_a: Vec3, half_a: Vec3, center_b: Vec3, half_b: Vec3) -> f64 {
    let dx = (center_a.x - center_b.x).abs() - half_a.x - half_b.x;
    let dy = (center_a.y - center_b.y).abs() - half_a.y - half_b.y;
    let dz = (center_a.z - center_b.z).abs() - half_a.z - half_b.z;
    let dx = dx.max(0.0);
    let dy = dy.max(0.0);
    let dz = dz.max(0.0);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

fn boxes_within(center_a: Vec3, half_a: Vec3, center_b: Vec3, half_b: Vec3, cutoff: f64) -> bool {
    // Leaves carry no box of their own (see collect_leaves), so a zero half-extent degrades
    // gracefully to "always compare" rather than incorrectly pruning.
    if half_a == Vec3::zero() || half_b == Vec3::zero() {
        return true;
    }
    box_distance_lower_bound(center_a, half_a, center_b, half_b) <= cutoff
}

fn pairs_within_leaf(items: &[OctreeItem], cutoff: f64, out: &mut Vec<(usize, usize)>) {
    for a in 0..items.len() {
        for b in (a + 1)..items.len() {
            push_if_within(items[a], items[b], cutoff, out);
        }
    }
}

fn pairs_across_leaves(a: &[OctreeItem], b: &[OctreeItem], cutoff: f64, out: &mut Vec<(usize, usize)>) {
    for &ia in a {
        for &ib in b {
            push_if_within(ia, ib, cutoff, out);
        }
    }
}

/// Compares squared distance against `cutoff^2` so the hot inner loop of candidate-pair
/// enumeration never pays for a `sqrt` that a plain inequality doesn't need.
fn push_if_within(a: OctreeItem, b: OctreeItem, cutoff: f64, out: &mut Vec<(usize, usize)>) {
    if a.coord.dist_squared(&b.coord) <= cutoff * cutoff {
        let (lo, hi) = if a.aa_index < b.aa_index { (a.aa_index, b.aa_index) } else { (b.aa_index, a.aa_index) };
        out.push((lo, hi));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(i: usize, x: f64, y: f64, z: f64) -> OctreeItem {
        OctreeItem::new(i, Vec3::new(x, y, z))
    }

    #[test]
    fn candidate_pairs_finds_nearby_points() {
        let items = vec![item(0, 0.0, 0.0, 0.0), item(1, 1.0, 0.0, 0.0), item(2, 100.0, 0.0, 0.0)];
        let tree = Octree::build(items, 1.0);
        let mut pairs = tree.candidate_pairs(5.0);
        pairs.sort();
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn pairs_are_ascending_by_aa_index() {
        let items = vec![item(5, 0.0, 0.0, 0.0), item(2, 0.5, 0.0, 0.0)];
        let tree = Octree::build(items, 1.0);
        let pairs = tree.candidate_pairs(5.0);
        assert_eq!(pairs, vec![(2, 5)]);
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        let tree = Octree::build(vec![], 1.0);
        assert!(tree.candidate_pairs(8.0).is_empty());
    }

    #[test]
    fn dense_cluster_past_leaf_capacity_still_finds_all_pairs() {
        let items: Vec<OctreeItem> = (0..64)
            .map(|i| item(i, (i as f64) * 0.01, 0.0, 0.0))
            .collect();
        let tree = Octree::build(items, 1.0);
        let pairs = tree.candidate_pairs(8.0);
        // all 64 points fit within the cutoff of one another
        assert_eq!(pairs.len(), 64 * 63 / 2);
        assert!(tree.excessive_divisions().is_empty());
    }

    #[test]
    fn coincident_points_beyond_leaf_capacity_trigger_excessive_division_but_keep_all_pairs() {
        let items: Vec<OctreeItem> = (0..20).map(|i| item(i, 0.0, 0.0, 0.0)).collect();
        let tree = Octree::build(items, 1.0);
        assert!(!tree.excessive_divisions().is_empty());
        let pairs = tree.candidate_pairs(8.0);
        assert_eq!(pairs.len(), 20 * 19 / 2);
    }
}
