//! Spatial indexing for neighbour queries.
//!
//! Wraps a KD-tree over body centres. Query results are returned as sorted
//! body indices so callers iterate in a deterministic order.

use geo::Coord;
use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};

use super::body::Body;

/// 2D KD-tree keyed by body index.
pub type Tree2D = KdTree<f64, usize, [f64; 2]>;

/// KD-tree over body centres plus the largest radius in the set.
pub struct SpatialIndex {
    tree: Tree2D,
    max_radius: f64,
}

impl SpatialIndex {
    /// Builds an index from the current body positions.
    ///
    /// Fails if any position is not finite.
    pub fn build(bodies: &[Body]) -> Result<Self, KdTreeError> {
        let mut tree = KdTree::new(2);
        let mut max_radius: f64 = 0.0;
        for (i, body) in bodies.iter().enumerate() {
            tree.add([body.pos.x, body.pos.y], i)?;
            max_radius = max_radius.max(body.radius);
        }
        Ok(Self { tree, max_radius })
    }

    /// Largest radius among indexed bodies.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Indices of bodies whose centres lie within `radius` of `pos`, ascending.
    pub fn query(&self, pos: Coord<f64>, radius: f64) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .tree
            .within(&[pos.x, pos.y], radius.powi(2), &squared_euclidean)
            .unwrap_or_default()
            .into_iter()
            .map(|(_, &idx)| idx)
            .collect();
        found.sort_unstable();
        found
    }
}

/// Index pairs `(i, j)`, `i < j`, whose circles overlap, in ascending order.
///
/// Uses the KD-tree when it can be built and falls back to a full scan
/// otherwise, so non-finite positions never abort a frame.
pub fn overlapping_pairs(bodies: &[Body]) -> Vec<(usize, usize)> {
    let Ok(index) = SpatialIndex::build(bodies) else {
        return (0..bodies.len())
            .flat_map(|i| (i + 1..bodies.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| overlaps(&bodies[i], &bodies[j]))
            .collect();
    };

    let mut pairs = Vec::new();
    for (i, body) in bodies.iter().enumerate() {
        for j in index.query(body.pos, body.radius + index.max_radius()) {
            if j > i && overlaps(body, &bodies[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Whether two circles overlap.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let dx = b.pos.x - a.pos.x;
    let dy = b.pos.y - a.pos.y;
    let reach = a.radius + b.radius;
    dx * dx + dy * dy < reach * reach
}
