//! Spatial indexing of committed placements using an R*-tree.
//!
//! Broad phase for the exact nester: a candidate's bounding box, inflated by
//! the part spacing, is queried against the boxes of everything already on the
//! plate, and only the hits go on to the exact contour test.

use rstar::{RTree, RTreeObject, AABB};
use sheetnest_core::AxisAlignedBox;

/// An entry in the index: one committed placement.
#[derive(Debug, Clone)]
pub struct SpatialEntry2D {
    /// Index of the placement in the committed arena.
    pub index: usize,
    /// Bounding box of the placed part.
    pub bounds: AxisAlignedBox,
}

impl SpatialEntry2D {
    /// Creates a new spatial entry.
    pub fn new(index: usize, bounds: AxisAlignedBox) -> Self {
        Self { index, bounds }
    }
}

impl RTreeObject for SpatialEntry2D {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_envelope(&self.bounds)
    }
}

fn to_envelope(bounds: &AxisAlignedBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bounds.min_x, bounds.min_y], [bounds.max_x, bounds.max_y])
}

/// R*-tree over committed placement boxes.
#[derive(Debug)]
pub struct SpatialIndex2D {
    tree: RTree<SpatialEntry2D>,
}

impl SpatialIndex2D {
    /// Creates a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Inserts a placement box.
    pub fn insert(&mut self, index: usize, bounds: AxisAlignedBox) {
        self.tree.insert(SpatialEntry2D::new(index, bounds));
    }

    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Entries whose boxes overlap `bounds` grown by `margin`.
    ///
    /// Uses the open-interval convention: boxes that only touch the grown
    /// query box are not returned. Results are sorted by arena index.
    pub fn query_with_margin(&self, bounds: &AxisAlignedBox, margin: f64) -> Vec<&SpatialEntry2D> {
        let query = bounds.inflate(margin);
        let mut hits: Vec<&SpatialEntry2D> = self
            .tree
            .locate_in_envelope_intersecting(&to_envelope(&query))
            .filter(|entry| entry.bounds.intersects(&query))
            .collect();
        hits.sort_by_key(|entry| entry.index);
        hits
    }

    /// Arena indices of placements that may collide with `bounds`.
    pub fn potential_collisions(&self, bounds: &AxisAlignedBox, spacing: f64) -> Vec<usize> {
        self.query_with_margin(bounds, spacing)
            .iter()
            .map(|entry| entry.index)
            .collect()
    }
}

impl Default for SpatialIndex2D {
    fn default() -> Self {
        Self::new()
    }
}
