//! Axis-aligned bounding boxes.

use crate::vector::Point2D;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in plate or part coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisAlignedBox {
    /// Minimum x coordinate.
    pub min_x: f64,
    /// Minimum y coordinate.
    pub min_y: f64,
    /// Maximum x coordinate.
    pub max_x: f64,
    /// Maximum y coordinate.
    pub max_y: f64,
}

impl AxisAlignedBox {
    /// Creates a new box from min/max coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a box spanning `origin` to `origin + (width, height)`.
    pub fn from_origin_size(origin: Point2D, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    /// Creates the tightest box around a set of points.
    ///
    /// # Errors
    /// Returns [`Error::EmptyPointSet`] if `points` is empty.
    pub fn from_points(points: &[Point2D]) -> Result<Self> {
        let (first, rest) = points.split_first().ok_or(Error::EmptyPointSet)?;

        let mut aabb = Self::new(first.x, first.y, first.x, first.y);
        for p in rest {
            aabb.min_x = aabb.min_x.min(p.x);
            aabb.min_y = aabb.min_y.min(p.y);
            aabb.max_x = aabb.max_x.max(p.x);
            aabb.max_y = aabb.max_y.max(p.y);
        }
        Ok(aabb)
    }

    /// Returns the width of the box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> Point2D {
        Point2D::new(self.min_x, self.min_y)
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> Point2D {
        Point2D::new(self.max_x, self.max_y)
    }

    /// Returns the center point.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Closed-interval point containment: points on the border are inside.
    pub fn contains_point(&self, p: Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Returns true if `other` lies entirely within this box, borders included.
    pub fn contains_box(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Open-interval intersection: boxes that only share an edge or a corner
    /// do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Returns the union (bounding box) of two boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Expands the box by a margin on all sides. A negative margin shrinks it.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Returns the box shifted by `offset`.
    pub fn translate(&self, offset: Point2D) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Returns the four corners in counter-clockwise order starting at the minimum corner.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.max_x, self.min_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.min_x, self.max_y),
        ]
    }
}
