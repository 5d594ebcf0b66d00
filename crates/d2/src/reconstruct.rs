//! Contour reconstruction from unordered line and arc segments.
//!
//! CAD sources rarely hand over clean polygons: an outline usually arrives as a
//! soup of lines and arcs in arbitrary order and direction. [`reconstruct`]
//! samples every arc into a polyline, greedily joins the resulting chains into
//! closed loops by matching endpoints within a tolerance, cleans each loop, and
//! classifies the loop with the largest area as the outer contour.
//!
//! ## Example
//!
//! ```rust
//! use sheetnest_d2::reconstruct::{reconstruct, ReconstructConfig, Segment};
//! use sheetnest_d2::Point2D;
//!
//! let p = |x, y| Point2D::new(x, y);
//! let segments = vec![
//!     Segment::line(p(1.0, 1.0), p(0.0, 1.0)),
//!     Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
//!     Segment::line(p(0.0, 1.0), p(0.0, 0.0)),
//!     Segment::line(p(1.0, 0.0), p(1.0, 1.0)),
//! ];
//!
//! let contours = reconstruct(&segments, &ReconstructConfig::default()).unwrap();
//! assert_eq!(contours.len(), 1);
//! assert_eq!(contours[0].len(), 4);
//! assert!(contours[0].signed_area() > 0.0);
//! ```

use crate::contour::Contour;
use sheetnest_core::{AxisAlignedBox, Error, Point2D, Result};
use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative cross-product threshold for dropping collinear vertices.
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Sweeps smaller than this are treated as a full circle.
const FULL_SWEEP_EPSILON: f64 = 1e-12;

/// A raw boundary fragment handed over by geometry acquisition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Segment {
    /// Straight segment between two endpoints.
    Line {
        /// Start point.
        start: Point2D,
        /// End point.
        end: Point2D,
    },
    /// Circular arc. Angles are in radians; equal start and end angles denote
    /// a full circle.
    Arc {
        /// Arc center.
        center: Point2D,
        /// Arc radius.
        radius: f64,
        /// Start angle in radians.
        start_angle: f64,
        /// End angle in radians.
        end_angle: f64,
        /// Sweep direction: counter-clockwise when true.
        ccw: bool,
    },
}

impl Segment {
    /// Creates a line segment.
    pub fn line(start: Point2D, end: Point2D) -> Self {
        Segment::Line { start, end }
    }

    /// Creates an arc segment.
    pub fn arc(center: Point2D, radius: f64, start_angle: f64, end_angle: f64, ccw: bool) -> Self {
        Segment::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            ccw,
        }
    }

    /// Creates a full counter-clockwise circle.
    pub fn circle(center: Point2D, radius: f64) -> Self {
        Self::arc(center, radius, 0.0, 0.0, true)
    }

    /// Returns the start and end points.
    pub fn endpoints(&self) -> (Point2D, Point2D) {
        match *self {
            Segment::Line { start, end } => (start, end),
            Segment::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ..
            } => (
                point_on_circle(center, radius, start_angle),
                point_on_circle(center, radius, end_angle),
            ),
        }
    }

    /// Converts the segment into a polyline chain.
    ///
    /// Lines become 2-point chains. Arcs are sampled with
    /// `max(arc_min_segments, ceil(length / linear_tolerance))` steps, capped at
    /// `arc_max_segments`.
    pub fn sample(&self, config: &ReconstructConfig) -> Vec<Point2D> {
        match *self {
            Segment::Line { start, end } => vec![start, end],
            Segment::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ccw,
            } => {
                let sweep = arc_sweep(start_angle, end_angle, ccw);
                let steps = config.arc_steps(radius.abs() * sweep.abs());
                (0..=steps)
                    .map(|i| {
                        let angle = if i == steps {
                            start_angle + sweep
                        } else {
                            start_angle + sweep * i as f64 / steps as f64
                        };
                        point_on_circle(center, radius, angle)
                    })
                    .collect()
            }
        }
    }
}

fn point_on_circle(center: Point2D, radius: f64, angle: f64) -> Point2D {
    let (sin, cos) = angle.sin_cos();
    Point2D::new(center.x + radius * cos, center.y + radius * sin)
}

/// Signed sweep from `start` to `end` in the requested direction, in `(0, 2π]`
/// for counter-clockwise arcs and `[-2π, 0)` for clockwise ones.
fn arc_sweep(start: f64, end: f64, ccw: bool) -> f64 {
    let raw = if ccw { end - start } else { start - end };
    let mut sweep = raw.rem_euclid(TAU);
    if sweep <= FULL_SWEEP_EPSILON {
        sweep = TAU;
    }
    if ccw {
        sweep
    } else {
        -sweep
    }
}

/// Tolerances, sampling resolution and safety caps for reconstruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReconstructConfig {
    /// Maximum endpoint distance for two chains to be joined, and for a loop
    /// to count as closed.
    pub join_tolerance: f64,

    /// Minimum number of steps per sampled arc.
    pub arc_min_segments: usize,

    /// Maximum number of steps per sampled arc.
    pub arc_max_segments: usize,

    /// Target arc length per sampling step.
    pub linear_tolerance: f64,

    /// Maximum number of loops started before giving up.
    pub max_loops: usize,

    /// Maximum number of chains joined into a single loop.
    pub max_joins_per_loop: usize,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            join_tolerance: 1e-5,
            arc_min_segments: 24,
            arc_max_segments: 512,
            linear_tolerance: 0.05,
            max_loops: 10_000,
            max_joins_per_loop: 100_000,
        }
    }
}

impl ReconstructConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint join tolerance.
    pub fn with_join_tolerance(mut self, tolerance: f64) -> Self {
        self.join_tolerance = tolerance;
        self
    }

    /// Sets the minimum and maximum arc step counts.
    pub fn with_arc_segments(mut self, min: usize, max: usize) -> Self {
        self.arc_min_segments = min.max(1);
        self.arc_max_segments = max.max(self.arc_min_segments);
        self
    }

    /// Sets the target arc length per sampling step.
    pub fn with_linear_tolerance(mut self, tolerance: f64) -> Self {
        self.linear_tolerance = tolerance;
        self
    }

    /// Sets the loop and join safety caps.
    pub fn with_limits(mut self, max_loops: usize, max_joins_per_loop: usize) -> Self {
        self.max_loops = max_loops;
        self.max_joins_per_loop = max_joins_per_loop;
        self
    }

    fn arc_steps(&self, arc_length: f64) -> usize {
        let min = self.arc_min_segments.max(1);
        let by_length = if self.linear_tolerance > 0.0 && arc_length.is_finite() {
            (arc_length / self.linear_tolerance).ceil() as usize
        } else {
            0
        };
        by_length.max(min).min(self.arc_max_segments.max(min))
    }
}

/// Reconstructs closed contours from unordered segments.
///
/// The contour with the largest absolute area is returned first, wound
/// counter-clockwise and flagged as outer; every other closed loop follows as a
/// clockwise hole. Chains that never close are discarded.
///
/// # Errors
/// [`Error::NoClosedRegion`] if no loop closes.
pub fn reconstruct(segments: &[Segment], config: &ReconstructConfig) -> Result<Vec<Contour>> {
    let chains: Vec<Vec<Point2D>> = segments
        .iter()
        .map(|s| s.sample(config))
        .filter(|chain| chain.len() >= 2)
        .collect();

    let loops = join_chains(chains, config);
    classify(loops)
}

/// Walks a loop through straight segments only.
///
/// Starting at the first segment, repeatedly follows an unused segment incident
/// to the current point until the walk returns to the start point.
///
/// # Errors
/// [`Error::NoClosedRegion`] if the walk dead-ends or the input is empty.
pub fn trace_line_loop(lines: &[(Point2D, Point2D)], config: &ReconstructConfig) -> Result<Contour> {
    let tol = config.join_tolerance;
    let (&(start, first_end), _) = lines.split_first().ok_or(Error::NoClosedRegion)?;

    let mut used = vec![false; lines.len()];
    used[0] = true;
    let mut path = vec![start, first_end];
    let mut current = first_end;
    let mut steps = 0;

    while !is_closed(&path, tol) && steps < config.max_joins_per_loop {
        let next = lines.iter().enumerate().find_map(|(i, &(a, b))| {
            if used[i] {
                None
            } else if a.distance(current) <= tol {
                Some((i, b))
            } else if b.distance(current) <= tol {
                Some((i, a))
            } else {
                None
            }
        });

        match next {
            Some((i, point)) => {
                used[i] = true;
                path.push(point);
                current = point;
                steps += 1;
            }
            None => break,
        }
    }

    if !is_closed(&path, tol) {
        log::debug!("line walk dead-ended after {} segments", steps + 1);
        return Err(Error::NoClosedRegion);
    }

    clean_loop(path, tol)
        .map(|vertices| Contour::outer(vertices).oriented(true))
        .ok_or(Error::NoClosedRegion)
}

/// Degraded fallback: the bounding rectangle of all sampled segment geometry.
///
/// Callers use this explicitly when [`reconstruct`] reports
/// [`Error::NoClosedRegion`] and an approximate silhouette is acceptable.
pub fn bounding_rectangle(segments: &[Segment], config: &ReconstructConfig) -> Result<Contour> {
    let points: Vec<Point2D> = segments.iter().flat_map(|s| s.sample(config)).collect();
    let bounds = AxisAlignedBox::from_points(&points)?;
    let contour = Contour::outer(bounds.corners().to_vec());
    contour.validate()?;
    Ok(contour)
}

/// How a candidate chain attaches to the loop being grown.
enum Attach {
    TailForward,
    TailReversed,
    HeadForward,
    HeadReversed,
}

fn is_closed(path: &[Point2D], tol: f64) -> bool {
    match (path.first(), path.last()) {
        (Some(&head), Some(&tail)) => path.len() >= 4 && head.distance(tail) <= tol,
        _ => false,
    }
}

fn find_attachment(
    remaining: &[Option<Vec<Point2D>>],
    head: Point2D,
    tail: Point2D,
    tol: f64,
) -> Option<(usize, Attach)> {
    remaining.iter().enumerate().find_map(|(i, slot)| {
        let chain = slot.as_ref()?;
        let (&first, &last) = (chain.first()?, chain.last()?);
        if first.distance(tail) <= tol {
            Some((i, Attach::TailForward))
        } else if last.distance(tail) <= tol {
            Some((i, Attach::TailReversed))
        } else if last.distance(head) <= tol {
            Some((i, Attach::HeadForward))
        } else if first.distance(head) <= tol {
            Some((i, Attach::HeadReversed))
        } else {
            None
        }
    })
}

fn join_chains(chains: Vec<Vec<Point2D>>, config: &ReconstructConfig) -> Vec<Vec<Point2D>> {
    let tol = config.join_tolerance;
    let mut remaining: Vec<Option<Vec<Point2D>>> = chains.into_iter().map(Some).collect();
    let mut closed = Vec::new();
    let mut loops_started = 0;

    for seed in 0..remaining.len() {
        if loops_started >= config.max_loops {
            log::warn!(
                "loop limit {} reached, {} chains left unjoined",
                config.max_loops,
                remaining.iter().filter(|c| c.is_some()).count()
            );
            break;
        }
        let Some(mut path) = remaining[seed].take() else {
            continue;
        };
        loops_started += 1;

        let mut joins = 0;
        while !is_closed(&path, tol) && joins < config.max_joins_per_loop {
            let (Some(&head), Some(&tail)) = (path.first(), path.last()) else {
                break;
            };
            let Some((idx, attach)) = find_attachment(&remaining, head, tail, tol) else {
                break;
            };
            let Some(chain) = remaining[idx].take() else {
                break;
            };

            match attach {
                Attach::TailForward => path.extend(chain.into_iter().skip(1)),
                Attach::TailReversed => path.extend(chain.into_iter().rev().skip(1)),
                Attach::HeadForward => {
                    let n = chain.len() - 1;
                    path.splice(0..0, chain.into_iter().take(n));
                }
                Attach::HeadReversed => {
                    let n = chain.len() - 1;
                    path.splice(0..0, chain.into_iter().rev().take(n));
                }
            }
            joins += 1;
        }

        if !is_closed(&path, tol) {
            log::debug!("discarding open chain with {} points", path.len());
            continue;
        }
        match clean_loop(path, tol) {
            Some(vertices) => closed.push(vertices),
            None => log::debug!("discarding degenerate closed loop"),
        }
    }

    closed
}

/// Removes the closing duplicate, merges near-duplicate neighbours and drops
/// collinear interior points until stable. Returns `None` for degenerate loops.
fn clean_loop(mut points: Vec<Point2D>, tol: f64) -> Option<Vec<Point2D>> {
    points.pop();

    let mut changed = true;
    while changed && points.len() >= 3 {
        changed = false;

        let before = points.len();
        let mut merged: Vec<Point2D> = Vec::with_capacity(points.len());
        for p in points.drain(..) {
            if merged.last().map_or(true, |last| last.distance(p) > tol) {
                merged.push(p);
            }
        }
        while merged.len() > 1 {
            let (Some(&first), Some(&last)) = (merged.first(), merged.last()) else {
                break;
            };
            if first.distance(last) > tol {
                break;
            }
            merged.pop();
        }
        points = merged;
        changed |= points.len() != before;

        let mut i = 0;
        while points.len() >= 3 && i < points.len() {
            let n = points.len();
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let d1 = cur - prev;
            let d2 = next - cur;
            if d1.cross(d2).abs() <= COLLINEAR_EPSILON * d1.length() * d2.length() {
                points.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }

    let contour = Contour::outer(points);
    if contour.validate().is_ok() {
        Some(contour.vertices().to_vec())
    } else {
        None
    }
}

fn classify(loops: Vec<Vec<Point2D>>) -> Result<Vec<Contour>> {
    let contours: Vec<Contour> = loops.into_iter().map(Contour::outer).collect();

    let outer_idx = contours
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, c)| {
            let area = c.area();
            match best {
                Some((_, best_area)) if best_area >= area => best,
                _ => Some((i, area)),
            }
        })
        .map(|(i, _)| i)
        .ok_or(Error::NoClosedRegion)?;

    let mut result = Vec::with_capacity(contours.len());
    result.push(contours[outer_idx].oriented(true));
    result.extend(
        contours
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != outer_idx)
            .map(|(_, c)| c.oriented(false).with_outer(false)),
    );
    Ok(result)
}
