//! Polygon intersection predicates.
//!
//! Parts may touch but must not overlap: two polygons collide only when their
//! interiors share area. The tests run cheapest first and short-circuit:
//!
//! 1. Bounding-box rejection with open intervals.
//! 2. Proper edge crossings, decided by the robust orientation predicate.
//!    Collinear and endpoint contacts are not crossings.
//! 3. Containment: a vertex strictly inside the other polygon, or a sample
//!    point just inside one polygon's edge that lies strictly inside the other.
//!    The samples catch coincident polygons and nested polygons sharing
//!    boundary, where no vertex is strictly inside.

use crate::contour::Contour;
use sheetnest_core::robust::{on_segment, orient2d, signed_area, SEGMENT_TOLERANCE};
use sheetnest_core::{AxisAlignedBox, Point2D};

/// Sample offset as a fraction of the polygon's larger bounding extent.
const SAMPLE_OFFSET_RATIO: f64 = 1e-7;

/// Smallest sample offset. Samples closer than the on-boundary tolerance would
/// count as boundary points and be discarded.
const SAMPLE_MIN_OFFSET: f64 = 100.0 * SEGMENT_TOLERANCE;

/// How two segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentContact {
    /// No common point.
    Disjoint,
    /// Common points only at endpoints or along a collinear stretch.
    Touching,
    /// Each segment strictly straddles the other.
    Crossing,
}

/// Classifies the contact between segments `a1..a2` and `b1..b2`.
pub fn segment_contact(a1: Point2D, a2: Point2D, b1: Point2D, b2: Point2D) -> SegmentContact {
    let o1 = orient2d(a1, a2, b1);
    let o2 = orient2d(a1, a2, b2);
    let o3 = orient2d(b1, b2, a1);
    let o4 = orient2d(b1, b2, a2);

    if o1.opposes(o2) && o3.opposes(o4) {
        return SegmentContact::Crossing;
    }

    let tol = SEGMENT_TOLERANCE;
    if on_segment(b1, a1, a2, tol)
        || on_segment(b2, a1, a2, tol)
        || on_segment(a1, b1, b2, tol)
        || on_segment(a2, b1, b2, tol)
    {
        SegmentContact::Touching
    } else {
        SegmentContact::Disjoint
    }
}

/// Returns true if the segments properly cross.
#[inline]
pub fn segments_intersect(a1: Point2D, a2: Point2D, b1: Point2D, b2: Point2D) -> bool {
    segment_contact(a1, a2, b1, b2) == SegmentContact::Crossing
}

fn edges(polygon: &[Point2D]) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Returns true if `p` lies on any edge of `polygon` within tolerance.
pub fn point_on_boundary(p: Point2D, polygon: &[Point2D]) -> bool {
    edges(polygon).any(|(a, b)| on_segment(p, a, b, SEGMENT_TOLERANCE))
}

/// Returns true if `p` is strictly inside `polygon`.
///
/// Ray-crossing test; points on the boundary are outside.
pub fn point_in_polygon(p: Point2D, polygon: &[Point2D]) -> bool {
    if polygon.len() < 3 || point_on_boundary(p, polygon) {
        return false;
    }

    let mut inside = false;
    for (a, b) in edges(polygon) {
        if (a.y > p.y) != (b.y > p.y) {
            let dy = b.y - a.y;
            if dy.abs() <= f64::MIN_POSITIVE {
                continue;
            }
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / dy;
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Returns true if `p` is inside `polygon` or on its boundary.
fn point_in_or_on(p: Point2D, polygon: &[Point2D]) -> bool {
    point_on_boundary(p, polygon) || point_in_polygon(p, polygon)
}

/// Points offset a tiny distance from each edge midpoint towards the interior.
///
/// The offset scales with the polygon but never drops below
/// `SAMPLE_MIN_OFFSET`, and stays under a quarter of the edge length.
fn interior_samples(polygon: &[Point2D]) -> Vec<Point2D> {
    let Ok(bounds) = AxisAlignedBox::from_points(polygon) else {
        return Vec::new();
    };
    let extent = bounds.width().max(bounds.height());
    let offset = (SAMPLE_OFFSET_RATIO * extent).max(SAMPLE_MIN_OFFSET);
    let inward = if signed_area(polygon) >= 0.0 { 1.0 } else { -1.0 };

    edges(polygon)
        .filter_map(|(a, b)| {
            let d = b - a;
            let len = d.length();
            if len <= SEGMENT_TOLERANCE {
                return None;
            }
            let left = Point2D::new(-d.y, d.x) * (1.0 / len);
            let depth = offset.min(0.25 * len);
            Some((a + b) * 0.5 + left * (inward * depth))
        })
        .collect()
}

fn bounds_of(polygon: &[Point2D]) -> Option<AxisAlignedBox> {
    AxisAlignedBox::from_points(polygon).ok()
}

/// Returns true if the interiors of the two polygons overlap.
///
/// Symmetric. Polygons that only touch along edges or at vertices do not
/// intersect. Inputs with fewer than 3 vertices never intersect.
pub fn intersects(a: &[Point2D], b: &[Point2D]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    let (Some(box_a), Some(box_b)) = (bounds_of(a), bounds_of(b)) else {
        return false;
    };
    if !box_a.intersects(&box_b) {
        return false;
    }

    for (a1, a2) in edges(a) {
        for (b1, b2) in edges(b) {
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    if a.iter().any(|&p| point_in_polygon(p, b)) || b.iter().any(|&p| point_in_polygon(p, a)) {
        return true;
    }

    interior_samples(a).into_iter().any(|p| point_in_polygon(p, b))
        || interior_samples(b).into_iter().any(|p| point_in_polygon(p, a))
}

/// Distance from `p` to the closed segment `a..b`.
pub fn point_segment_distance(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq <= f64::MIN_POSITIVE {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Minimum distance between the boundaries of two polygons.
///
/// Zero when the boundaries cross or touch. Containment is not considered:
/// a polygon nested deep inside another still reports its boundary gap.
pub fn polygon_distance(a: &[Point2D], b: &[Point2D]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }

    let mut best = f64::INFINITY;
    for (a1, a2) in edges(a) {
        for (b1, b2) in edges(b) {
            if segment_contact(a1, a2, b1, b2) != SegmentContact::Disjoint {
                return 0.0;
            }
            best = best
                .min(point_segment_distance(a1, b1, b2))
                .min(point_segment_distance(b1, a1, a2));
        }
    }
    best
}

/// Returns true if `inner` lies entirely within `outer` (boundary contact allowed).
pub fn contains_polygon(outer: &[Point2D], inner: &[Point2D]) -> bool {
    if outer.len() < 3 || inner.len() < 3 {
        return false;
    }
    if let (Some(box_o), Some(box_i)) = (bounds_of(outer), bounds_of(inner)) {
        if !box_o.inflate(SEGMENT_TOLERANCE).contains_box(&box_i) {
            return false;
        }
    }
    if !inner.iter().all(|&p| point_in_or_on(p, outer)) {
        return false;
    }
    for (a1, a2) in edges(inner) {
        for (b1, b2) in edges(outer) {
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    edges(inner).all(|(a, b)| point_in_or_on((a + b) * 0.5, outer))
}

/// Returns true if `outer` sits inside one of `holes` with at least `spacing`
/// between it and the hole boundary.
fn inside_hole(outer: &Contour, holes: &[&Contour], spacing: f64) -> bool {
    holes.iter().any(|hole| {
        contains_polygon(hole.vertices(), outer.vertices())
            && (spacing <= 0.0
                || polygon_distance(hole.vertices(), outer.vertices()) + SEGMENT_TOLERANCE
                    >= spacing)
    })
}

/// Collision test between two parts given as contour sets.
///
/// Every outer contour of `a` is tested against every outer contour of `b`.
/// A pair collides when the polygons overlap, unless one lies entirely inside
/// a hole of the other part. With `spacing > 0`, outer boundaries closer than
/// `spacing` also collide.
pub fn contour_sets_collide(a: &[Contour], b: &[Contour], spacing: f64) -> bool {
    let holes_a: Vec<&Contour> = a.iter().filter(|c| c.is_hole()).collect();
    let holes_b: Vec<&Contour> = b.iter().filter(|c| c.is_hole()).collect();

    for outer_a in a.iter().filter(|c| c.is_outer()) {
        let Ok(box_a) = outer_a.bounds() else {
            continue;
        };
        for outer_b in b.iter().filter(|c| c.is_outer()) {
            let Ok(box_b) = outer_b.bounds() else {
                continue;
            };
            if !box_a.inflate(spacing.max(0.0)).intersects(&box_b) {
                continue;
            }

            let overlapping = intersects(outer_a.vertices(), outer_b.vertices());
            if overlapping {
                if inside_hole(outer_b, &holes_a, spacing) || inside_hole(outer_a, &holes_b, spacing)
                {
                    continue;
                }
                return true;
            }

            if spacing > 0.0
                && polygon_distance(outer_a.vertices(), outer_b.vertices()) + SEGMENT_TOLERANCE
                    < spacing
            {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2D> {
        vec![
            p(x, y),
            p(x + size, y),
            p(x + size, y + size),
            p(x, y + size),
        ]
    }

    #[test]
    fn test_segment_contact() {
        let o = p(0.0, 0.0);
        assert_eq!(
            segment_contact(o, p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)),
            SegmentContact::Crossing
        );
        assert_eq!(
            segment_contact(o, p(2.0, 0.0), p(2.0, 0.0), p(3.0, 1.0)),
            SegmentContact::Touching
        );
        assert_eq!(
            segment_contact(o, p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)),
            SegmentContact::Touching
        );
        assert_eq!(
            segment_contact(o, p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)),
            SegmentContact::Disjoint
        );
        assert!(!segments_intersect(o, p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square(0.0, 0.0, 2.0);
        assert!(point_in_polygon(p(1.0, 1.0), &sq));
        assert!(!point_in_polygon(p(3.0, 1.0), &sq));
        assert!(!point_in_polygon(p(2.0, 1.0), &sq));
        assert!(!point_in_polygon(p(0.0, 0.0), &sq));
        assert!(point_on_boundary(p(2.0, 1.0), &sq));

        let mut cw = sq.clone();
        cw.reverse();
        assert!(point_in_polygon(p(1.0, 1.0), &cw));
    }

    #[test]
    fn test_overlapping_squares_collide() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_gap_and_touching_do_not_collide() {
        let a = square(0.0, 0.0, 1.0);
        assert!(!intersects(&a, &square(1.1, 0.0, 1.0)));
        assert!(!intersects(&a, &square(1.0, 0.0, 1.0)));
        assert!(!intersects(&a, &square(1.0, 1.0, 1.0)));
        assert!(!intersects(&a, &square(1.0, 0.5, 1.0)));
    }

    #[test]
    fn test_symmetry() {
        let shapes = [
            square(0.0, 0.0, 1.0),
            square(0.5, 0.5, 1.0),
            square(1.0, 0.0, 1.0),
            square(0.25, 0.25, 0.5),
            vec![p(0.0, 0.0), p(3.0, 0.0), p(0.0, 3.0)],
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(intersects(a, b), intersects(b, a));
            }
        }
    }

    #[test]
    fn test_nested_and_coincident() {
        let big = square(0.0, 0.0, 4.0);
        let small = square(1.0, 1.0, 1.0);
        assert!(intersects(&big, &small));
        assert!(intersects(&small, &big));

        // Coincident: no vertex strictly inside, no proper crossing.
        assert!(intersects(&big, &big.clone()));

        // Nested and sharing the lower-left corner and two edges.
        let corner = square(0.0, 0.0, 2.0);
        assert!(intersects(&big, &corner));
    }

    #[test]
    fn test_cross_shape_without_contained_vertices() {
        let horizontal = vec![p(0.0, 1.0), p(3.0, 1.0), p(3.0, 2.0), p(0.0, 2.0)];
        let vertical = vec![p(1.0, 0.0), p(2.0, 0.0), p(2.0, 3.0), p(1.0, 3.0)];
        assert!(intersects(&horizontal, &vertical));
    }

    #[test]
    fn test_degenerate_input() {
        assert!(!intersects(&[p(0.0, 0.0), p(1.0, 1.0)], &square(0.0, 0.0, 1.0)));
        assert!(!intersects(&[], &[]));
    }

    #[test]
    fn test_polygon_distance() {
        let a = square(0.0, 0.0, 1.0);
        assert_relative_eq!(polygon_distance(&a, &square(3.0, 0.0, 1.0)), 2.0);
        assert_relative_eq!(polygon_distance(&a, &square(1.0, 0.0, 1.0)), 0.0);
        assert_relative_eq!(
            polygon_distance(&a, &square(2.0, 2.0, 1.0)),
            2.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_contains_polygon() {
        let big = square(0.0, 0.0, 4.0);
        assert!(contains_polygon(&big, &square(1.0, 1.0, 1.0)));
        assert!(contains_polygon(&big, &square(0.0, 0.0, 2.0)));
        assert!(!contains_polygon(&big, &square(3.0, 3.0, 2.0)));
        assert!(!contains_polygon(&square(1.0, 1.0, 1.0), &big));
    }

    fn frame() -> Vec<Contour> {
        vec![
            Contour::outer(square(0.0, 0.0, 10.0)),
            Contour::hole(square(2.0, 2.0, 6.0)).oriented(false),
        ]
    }

    #[test]
    fn test_part_inside_hole_does_not_collide() {
        let inner = vec![Contour::outer(square(3.0, 3.0, 2.0))];
        assert!(!contour_sets_collide(&frame(), &inner, 0.0));
        assert!(!contour_sets_collide(&inner, &frame(), 0.0));

        // One unit from the hole boundary.
        assert!(!contour_sets_collide(&frame(), &inner, 1.0));
        assert!(contour_sets_collide(&frame(), &inner, 1.5));
    }

    #[test]
    fn test_part_over_frame_collides() {
        let straddling = vec![Contour::outer(square(7.0, 3.0, 2.0))];
        assert!(contour_sets_collide(&frame(), &straddling, 0.0));
        assert!(contour_sets_collide(&straddling, &frame(), 0.0));
    }

    #[test]
    fn test_spacing_between_neighbours() {
        let a = vec![Contour::outer(square(0.0, 0.0, 10.0))];
        let b = vec![Contour::outer(square(12.0, 0.0, 10.0))];
        assert!(!contour_sets_collide(&a, &b, 0.0));
        assert!(!contour_sets_collide(&a, &b, 2.0));
        assert!(contour_sets_collide(&a, &b, 2.5));

        let touching = vec![Contour::outer(square(10.0, 0.0, 10.0))];
        assert!(!contour_sets_collide(&a, &touching, 0.0));
        assert!(contour_sets_collide(&a, &touching, 0.1));
    }

    const SCALES: [f64; 3] = [1e-3, 1.0, 1e4];

    #[test]
    fn test_predicate_is_scale_independent() {
        for s in SCALES {
            let unit = square(0.0, 0.0, s);

            assert!(intersects(&unit, &unit.clone()), "coincident at {}", s);
            let nested = square(0.25 * s, 0.25 * s, 0.5 * s);
            assert!(intersects(&unit, &nested), "nested at {}", s);
            assert!(intersects(&nested, &unit), "nested at {}", s);
            let corner = square(0.0, 0.0, 0.5 * s);
            assert!(intersects(&unit, &corner), "corner nested at {}", s);
            assert!(intersects(&corner, &unit), "corner nested at {}", s);
            assert!(intersects(&unit, &square(0.5 * s, 0.5 * s, s)), "overlap at {}", s);

            assert!(!intersects(&unit, &square(s, 0.0, s)), "edge contact at {}", s);
            assert!(!intersects(&unit, &square(s, s, s)), "corner contact at {}", s);
            assert!(!intersects(&unit, &square(1.1 * s, 0.0, s)), "gap at {}", s);
        }
    }

    #[test]
    fn test_contour_sets_collide_is_scale_independent() {
        for s in SCALES {
            let a = vec![Contour::outer(square(0.0, 0.0, s))];

            assert!(contour_sets_collide(&a, &a.clone(), 0.0), "coincident at {}", s);
            let corner = vec![Contour::outer(square(0.0, 0.0, 0.5 * s))];
            assert!(contour_sets_collide(&a, &corner, 0.0), "corner nested at {}", s);

            let touching = vec![Contour::outer(square(s, 0.0, s))];
            assert!(!contour_sets_collide(&a, &touching, 0.0), "edge contact at {}", s);
            assert!(contour_sets_collide(&a, &touching, 0.01 * s), "edge contact at {}", s);

            let gap = vec![Contour::outer(square(1.1 * s, 0.0, s))];
            assert!(!contour_sets_collide(&a, &gap, 0.05 * s), "gap at {}", s);
            assert!(contour_sets_collide(&a, &gap, 0.2 * s), "gap at {}", s);

            let framed = vec![
                Contour::outer(square(0.0, 0.0, 10.0 * s)),
                Contour::hole(square(2.0 * s, 2.0 * s, 6.0 * s)).oriented(false),
            ];
            let inner = vec![Contour::outer(square(3.0 * s, 3.0 * s, 2.0 * s))];
            assert!(!contour_sets_collide(&framed, &inner, 0.5 * s), "in hole at {}", s);
            assert!(contour_sets_collide(&framed, &inner, 1.5 * s), "in hole at {}", s);
        }
    }
}
