//! Robust geometric predicates.
//!
//! Orientation tests are the foundation of every collision decision made by the
//! nester, so they use Shewchuk's adaptive precision arithmetic (via the
//! `robust` crate) instead of a bare cross product. Near-collinear inputs that a
//! naive determinant would misclassify get an exact answer.
//!
//! ## Example
//!
//! ```rust
//! use sheetnest_core::robust::{orient2d, Orientation};
//! use sheetnest_core::Point2D;
//!
//! let a = Point2D::new(0.0, 0.0);
//! let b = Point2D::new(1.0, 0.0);
//! let c = Point2D::new(0.5, 1.0);
//!
//! assert_eq!(orient2d(a, b, c), Orientation::CounterClockwise);
//! ```

use crate::vector::Point2D;
use robust::{orient2d as robust_orient2d, Coord};

/// Default tolerance for on-segment checks.
pub const SEGMENT_TOLERANCE: f64 = 1e-9;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are arranged counter-clockwise (left turn).
    CounterClockwise,
    /// Points are arranged clockwise (right turn).
    Clockwise,
    /// Points are collinear.
    Collinear,
}

impl Orientation {
    /// Returns true if the orientation is counter-clockwise.
    #[inline]
    pub fn is_ccw(self) -> bool {
        matches!(self, Orientation::CounterClockwise)
    }

    /// Returns true if the orientation is clockwise.
    #[inline]
    pub fn is_cw(self) -> bool {
        matches!(self, Orientation::Clockwise)
    }

    /// Returns true if the points are collinear.
    #[inline]
    pub fn is_collinear(self) -> bool {
        matches!(self, Orientation::Collinear)
    }

    /// Returns true if `self` and `other` are strictly on opposite sides.
    #[inline]
    pub fn opposes(self, other: Orientation) -> bool {
        matches!(
            (self, other),
            (Orientation::CounterClockwise, Orientation::Clockwise)
                | (Orientation::Clockwise, Orientation::CounterClockwise)
        )
    }
}

#[inline]
fn coord(p: Point2D) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Determines on which side of the directed line `pa -> pb` the point `pc` lies.
#[inline]
pub fn orient2d(pa: Point2D, pb: Point2D, pc: Point2D) -> Orientation {
    let result = orient2d_raw(pa, pb, pc);

    if result > 0.0 {
        Orientation::CounterClockwise
    } else if result < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns the raw orientation determinant (twice the signed triangle area).
#[inline]
pub fn orient2d_raw(pa: Point2D, pb: Point2D, pc: Point2D) -> f64 {
    robust_orient2d(coord(pa), coord(pb), coord(pc))
}

/// Returns true if `p` lies on the closed segment `a..b`, within `tolerance`
/// measured as perpendicular distance and as overshoot past the endpoints.
pub fn on_segment(p: Point2D, a: Point2D, b: Point2D, tolerance: f64) -> bool {
    let ab = b - a;
    let len = ab.length();
    if len <= tolerance {
        return p.distance(a) <= tolerance;
    }

    let ap = p - a;
    let perpendicular = ab.cross(ap).abs() / len;
    if perpendicular > tolerance {
        return false;
    }

    let along = ab.dot(ap) / len;
    along >= -tolerance && along <= len + tolerance
}

/// Signed area of a closed vertex loop using compensated (Kahan) summation.
///
/// Positive for counter-clockwise winding.
pub fn signed_area(polygon: &[Point2D]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut c = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        let term = polygon[i].cross(polygon[j]);

        let y = term - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }

    sum / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_orient2d_basic() {
        assert_eq!(
            orient2d(p(0.0, 0.0), p(1.0, 0.0), p(0.5, 1.0)),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orient2d(p(0.0, 0.0), p(0.5, 1.0), p(1.0, 0.0)),
            Orientation::Clockwise
        );
    }

    #[test]
    fn test_orient2d_collinear() {
        assert_eq!(
            orient2d(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_opposes() {
        assert!(Orientation::Clockwise.opposes(Orientation::CounterClockwise));
        assert!(!Orientation::Clockwise.opposes(Orientation::Collinear));
        assert!(!Orientation::Collinear.opposes(Orientation::Collinear));
    }

    #[test]
    fn test_on_segment() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 0.0);
        assert!(on_segment(p(5.0, 0.0), a, b, SEGMENT_TOLERANCE));
        assert!(on_segment(p(10.0, 0.0), a, b, SEGMENT_TOLERANCE));
        assert!(!on_segment(p(10.1, 0.0), a, b, SEGMENT_TOLERANCE));
        assert!(!on_segment(p(5.0, 0.1), a, b, SEGMENT_TOLERANCE));
    }

    #[test]
    fn test_signed_area() {
        let ccw = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0), p(0.0, 2.0)];
        assert_eq!(signed_area(&ccw), 8.0);
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_eq!(signed_area(&cw), -8.0);
        assert_eq!(signed_area(&ccw[..2]), 0.0);
    }
}
