//! Rigid 2D transforms.

use crate::vector::Point2D;
use nalgebra::{Isometry2, Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D rigid transformation: rotation about the origin, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform2D {
    /// Translation in x direction.
    pub tx: f64,
    /// Translation in y direction.
    pub ty: f64,
    /// Rotation angle in radians.
    pub angle: f64,
}

impl Transform2D {
    /// Creates a new identity transform.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Creates a new transform with translation only.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(tx, ty, 0.0)
    }

    /// Creates a new transform with rotation only.
    pub fn rotation(angle: f64) -> Self {
        Self::new(0.0, 0.0, angle)
    }

    /// Creates a transform rotating by `angle` radians and then translating by `offset`.
    pub fn from_parts(offset: Point2D, angle: f64) -> Self {
        Self::new(offset.x, offset.y, angle)
    }

    /// Creates a new transform with both translation and rotation.
    pub fn new(tx: f64, ty: f64, angle: f64) -> Self {
        Self { tx, ty, angle }
    }

    /// Converts to a nalgebra Isometry2.
    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.tx, self.ty), self.angle)
    }

    /// Transforms a single point.
    pub fn apply(&self, p: Point2D) -> Point2D {
        let q = self.to_isometry().transform_point(&Point2::new(p.x, p.y));
        Point2D::new(q.x, q.y)
    }

    /// Transforms a sequence of points, preserving order.
    pub fn apply_all(&self, points: &[Point2D]) -> Vec<Point2D> {
        let iso = self.to_isometry();
        points
            .iter()
            .map(|p| {
                let q = iso.transform_point(&Point2::new(p.x, p.y));
                Point2D::new(q.x, q.y)
            })
            .collect()
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_identity() {
        let p = Transform2D::identity().apply(Point2D::new(1.0, 2.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rotate_then_translate() {
        let t = Transform2D::new(10.0, 20.0, PI / 2.0);
        let p = t.apply(Point2D::new(1.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-10);
        assert_relative_eq!(p.y, 21.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rotation_round_trip() {
        let points = vec![Point2D::new(3.0, 1.0), Point2D::new(-2.0, 5.0)];
        let angle = PI / 4.0;
        let turned = Transform2D::rotation(angle).apply_all(&points);
        let back = Transform2D::rotation(-angle).apply_all(&turned);
        for (b, p) in back.iter().zip(&points) {
            assert!(b.approx_eq(*p, 1e-12));
        }
    }

    #[test]
    fn test_apply_all_matches_point_rotation() {
        let points = vec![Point2D::new(3.0, 1.0), Point2D::new(-2.0, 5.0)];
        let angle = 0.7;
        let moved = Transform2D::rotation(angle).apply_all(&points);
        for (m, p) in moved.iter().zip(&points) {
            let r = p.rotate(angle);
            assert_relative_eq!(m.x, r.x, epsilon = 1e-12);
            assert_relative_eq!(m.y, r.y, epsilon = 1e-12);
        }
    }
}
