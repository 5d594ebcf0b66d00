//! Closed polygon contours.

use geo::{Coord, LineString};
use sheetnest_core::robust::signed_area;
use sheetnest_core::{AxisAlignedBox, Error, Point2D, Result, Transform2D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative area below which a contour is considered degenerate.
const DEGENERATE_AREA_RATIO: f64 = 1e-12;

/// A closed polygon loop. The first vertex is not repeated at the end.
///
/// Outer contours describe part material, holes describe voids inside it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contour {
    vertices: Vec<Point2D>,
    is_outer: bool,
}

impl Contour {
    /// Creates a contour from ordered vertices.
    pub fn new(vertices: Vec<Point2D>, is_outer: bool) -> Self {
        Self { vertices, is_outer }
    }

    /// Creates an outer contour.
    pub fn outer(vertices: Vec<Point2D>) -> Self {
        Self::new(vertices, true)
    }

    /// Creates a hole contour.
    pub fn hole(vertices: Vec<Point2D>) -> Self {
        Self::new(vertices, false)
    }

    /// Creates a contour from `(x, y)` tuples.
    pub fn from_tuples(vertices: &[(f64, f64)], is_outer: bool) -> Self {
        Self::new(vertices.iter().copied().map(Point2D::from).collect(), is_outer)
    }

    /// Returns the vertices.
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Returns true for outer (material) contours.
    pub fn is_outer(&self) -> bool {
        self.is_outer
    }

    /// Returns true for hole contours.
    pub fn is_hole(&self) -> bool {
        !self.is_outer
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the contour has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Signed area by the shoelace formula; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    /// Absolute area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Returns true if the winding is counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Bounding box of the vertices.
    pub fn bounds(&self) -> Result<AxisAlignedBox> {
        AxisAlignedBox::from_points(&self.vertices)
    }

    /// Perimeter length including the closing edge.
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// Iterates over edges, wrapping from the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Rotates every vertex about the origin by `rotation_rad`, then translates
    /// by `translation`. Vertex order and the outer/hole flag are preserved.
    pub fn transform(&self, translation: Point2D, rotation_rad: f64) -> Contour {
        let t = Transform2D::from_parts(translation, rotation_rad);
        Contour::new(t.apply_all(&self.vertices), self.is_outer)
    }

    /// Rotates about the origin.
    pub fn rotate(&self, rotation_rad: f64) -> Contour {
        self.transform(Point2D::ZERO, rotation_rad)
    }

    /// Translates every vertex by `offset`.
    pub fn translate(&self, offset: Point2D) -> Contour {
        Contour::new(
            self.vertices.iter().map(|&v| v + offset).collect(),
            self.is_outer,
        )
    }

    /// Reflects about the vertical line `x = axis_x`.
    ///
    /// Vertex order is reversed so the winding sign is kept.
    pub fn mirror_x(&self, axis_x: f64) -> Contour {
        Contour::new(
            self.vertices
                .iter()
                .rev()
                .map(|v| Point2D::new(2.0 * axis_x - v.x, v.y))
                .collect(),
            self.is_outer,
        )
    }

    /// Returns the contour with reversed vertex order.
    pub fn reversed(&self) -> Contour {
        Contour::new(self.vertices.iter().rev().copied().collect(), self.is_outer)
    }

    /// Returns the contour wound counter-clockwise when `ccw` is true, clockwise otherwise.
    pub fn oriented(&self, ccw: bool) -> Contour {
        if self.is_ccw() == ccw {
            self.clone()
        } else {
            self.reversed()
        }
    }

    /// Returns a copy with the outer/hole flag replaced.
    pub fn with_outer(mut self, is_outer: bool) -> Contour {
        self.is_outer = is_outer;
        self
    }

    /// Checks that the contour has at least 3 finite vertices and non-zero area.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "contour must have at least 3 vertices, got {}",
                self.vertices.len()
            )));
        }
        if self.vertices.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidGeometry(
                "contour has non-finite coordinates".to_string(),
            ));
        }

        let bounds = self.bounds()?;
        let area = self.area();
        if area <= DEGENERATE_AREA_RATIO * bounds.area() || area == 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "contour is degenerate (area {:e})",
                area
            )));
        }
        Ok(())
    }

    /// Converts to a closed `geo` line string.
    pub fn to_line_string(&self) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = self
            .vertices
            .iter()
            .map(|v| Coord { x: v.x, y: v.y })
            .collect();
        if let Some(&first) = coords.first() {
            coords.push(first);
        }
        LineString::from(coords)
    }
}
