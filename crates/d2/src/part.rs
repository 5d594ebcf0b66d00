//! Parts: named contour sets to be cut from the plate.

use crate::contour::Contour;
use crate::reconstruct::{reconstruct, ReconstructConfig, Segment};
use geo::{Centroid, Euclidean, Length, LineString, MultiPolygon, Polygon};
use sheetnest_core::{AxisAlignedBox, Config, Error, Placement, Point2D, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of segments used by [`Part::circle`].
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 32;

/// Smallest positive rotation step, in degrees. Finer steps would expand into
/// more than 3600 pre-transformed shapes per part.
pub const MIN_ROTATION_STEP_DEG: f64 = 0.1;

/// A part definition: one or more outer contours, optional holes, a quantity
/// and a rotation granularity.
///
/// The bounding box and net area are derived from the contours. Every method
/// that changes the contours recomputes them; [`Part::recompute_derived`] does
/// so explicitly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Part {
    name: String,
    quantity: usize,
    rotation_step_deg: f64,
    contours: Vec<Contour>,
    bounds: Option<AxisAlignedBox>,
    net_area: f64,
}

impl Part {
    /// Creates an empty part with quantity 1 and no rotation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
            rotation_step_deg: 0.0,
            contours: Vec::new(),
            bounds: None,
            net_area: 0.0,
        }
    }

    /// Adds a contour.
    pub fn with_contour(mut self, contour: Contour) -> Self {
        self.contours.push(contour);
        self.recompute_derived();
        self
    }

    /// Adds several contours.
    pub fn with_contours(mut self, contours: impl IntoIterator<Item = Contour>) -> Self {
        self.contours.extend(contours);
        self.recompute_derived();
        self
    }

    /// Sets the number of copies to place.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the rotation granularity in degrees. Zero tests 0° only.
    pub fn with_rotation_step(mut self, step_deg: f64) -> Self {
        self.rotation_step_deg = step_deg;
        self
    }

    /// Creates a `width` x `height` rectangle with its corner at the origin.
    pub fn rectangle(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new(name).with_contour(Contour::from_tuples(
            &[(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)],
            true,
        ))
    }

    /// Creates a circle approximation with [`DEFAULT_CIRCLE_SEGMENTS`] vertices.
    pub fn circle(name: impl Into<String>, radius: f64) -> Self {
        Self::circle_with_segments(name, radius, DEFAULT_CIRCLE_SEGMENTS)
    }

    /// Creates a circle approximation with `segments` vertices (at least 3),
    /// its bounding box touching the origin.
    pub fn circle_with_segments(name: impl Into<String>, radius: f64, segments: usize) -> Self {
        let n = segments.max(3);
        let step = std::f64::consts::TAU / n as f64;
        let vertices = (0..n)
            .map(|i| {
                let (sin, cos) = (i as f64 * step).sin_cos();
                Point2D::new(radius * cos + radius, radius * sin + radius)
            })
            .collect();
        Self::new(name).with_contour(Contour::outer(vertices))
    }

    /// Creates an L-shaped part: a `width` x `height` rectangle with the upper
    /// right corner cut away, leaving a foot of height `notch_height` and a
    /// leg of width `notch_width`.
    pub fn l_shape(
        name: impl Into<String>,
        width: f64,
        height: f64,
        notch_width: f64,
        notch_height: f64,
    ) -> Self {
        Self::new(name).with_contour(Contour::from_tuples(
            &[
                (0.0, 0.0),
                (width, 0.0),
                (width, notch_height),
                (notch_width, notch_height),
                (notch_width, height),
                (0.0, height),
            ],
            true,
        ))
    }

    /// Builds a part from raw segments via contour reconstruction.
    pub fn from_segments(
        name: impl Into<String>,
        segments: &[Segment],
        config: &ReconstructConfig,
    ) -> Result<Self> {
        let contours = reconstruct(segments, config)?;
        Ok(Self::new(name).with_contours(contours))
    }

    /// Replaces all contours.
    pub fn set_contours(&mut self, contours: Vec<Contour>) {
        self.contours = contours;
        self.recompute_derived();
    }

    /// Recomputes the bounding box and net area from the contours.
    pub fn recompute_derived(&mut self) {
        let points: Vec<Point2D> = self
            .contours
            .iter()
            .flat_map(|c| c.vertices().iter().copied())
            .collect();
        self.bounds = AxisAlignedBox::from_points(&points).ok();

        let (outer, holes) = self.contours.iter().fold((0.0, 0.0), |(o, h), c| {
            if c.is_outer() {
                (o + c.area(), h)
            } else {
                (o, h + c.area())
            }
        });
        self.net_area = (outer - holes).max(0.0);
    }

    /// Returns the part name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of copies to place.
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Returns the rotation granularity in degrees.
    pub fn rotation_step_deg(&self) -> f64 {
        self.rotation_step_deg
    }

    /// Returns all contours.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Iterates over outer contours.
    pub fn outer_contours(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| c.is_outer())
    }

    /// Iterates over hole contours.
    pub fn holes(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| c.is_hole())
    }

    /// The largest-area outer contour.
    pub fn silhouette(&self) -> Option<&Contour> {
        self.outer_contours()
            .fold(None, |best: Option<&Contour>, c| match best {
                Some(b) if b.area() >= c.area() => Some(b),
                _ => Some(c),
            })
    }

    /// Bounding box of all contours, `None` when the part has no vertices.
    pub fn bounds(&self) -> Option<AxisAlignedBox> {
        self.bounds
    }

    /// Outer areas minus hole areas, never negative.
    pub fn net_area(&self) -> f64 {
        self.net_area
    }

    /// Total boundary length of all contours.
    pub fn perimeter(&self) -> f64 {
        self.contours
            .iter()
            .map(|c| c.to_line_string().length::<Euclidean>())
            .sum()
    }

    /// Area centroid of the material (outer contours minus holes).
    pub fn centroid(&self) -> Option<Point2D> {
        self.to_geo_multi_polygon()
            .centroid()
            .map(|p| Point2D::new(p.x(), p.y()))
    }

    /// Converts to a `geo` multi-polygon: one polygon per outer contour, each
    /// holding the holes whose first vertex falls inside it.
    pub fn to_geo_multi_polygon(&self) -> MultiPolygon<f64> {
        let polygons = self
            .outer_contours()
            .map(|outer| {
                let holes: Vec<LineString<f64>> = self
                    .holes()
                    .filter(|h| {
                        h.vertices().first().is_some_and(|&p| {
                            crate::intersect::point_in_polygon(p, outer.vertices())
                        })
                    })
                    .map(Contour::to_line_string)
                    .collect();
                Polygon::new(outer.to_line_string(), holes)
            })
            .collect::<Vec<_>>();
        MultiPolygon::new(polygons)
    }

    /// Checks quantity and contour validity.
    pub fn validate(&self) -> Result<()> {
        if self.quantity == 0 {
            return Err(Error::InvalidGeometry(format!(
                "quantity for '{}' must be at least 1",
                self.name
            )));
        }
        if self.outer_contours().next().is_none() {
            return Err(Error::InvalidGeometry(format!(
                "part '{}' has no outer contour",
                self.name
            )));
        }
        if !self.rotation_step_deg.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "rotation step for '{}' must be finite",
                self.name
            )));
        }
        if self.rotation_step_deg > 0.0 && self.rotation_step_deg < MIN_ROTATION_STEP_DEG {
            return Err(Error::InvalidGeometry(format!(
                "rotation step for '{}' must be 0 or at least {} degrees, got {}",
                self.name, MIN_ROTATION_STEP_DEG, self.rotation_step_deg
            )));
        }
        for contour in &self.contours {
            contour.validate().map_err(|e| match e {
                Error::InvalidGeometry(msg) => {
                    Error::InvalidGeometry(format!("part '{}': {}", self.name, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Contours normalized to the local origin, optionally mirrored, then rotated.
    pub fn prepare(&self, rotation_deg: f64, mirrored: bool) -> Result<PreparedShape> {
        let bounds = self.bounds.ok_or_else(|| {
            Error::InvalidGeometry(format!("part '{}' has no contours", self.name))
        })?;
        let origin = bounds.min();
        let width = bounds.width();

        let contours: Vec<Contour> = self
            .contours
            .iter()
            .map(|c| {
                let local = c.translate(-origin);
                let local = if mirrored {
                    local.mirror_x(width * 0.5)
                } else {
                    local
                };
                rotate_deg(&local, rotation_deg)
            })
            .collect();

        let points: Vec<Point2D> = contours
            .iter()
            .flat_map(|c| c.vertices().iter().copied())
            .collect();
        let local_bounds = AxisAlignedBox::from_points(&points)?;

        Ok(PreparedShape {
            contours,
            local_bounds,
            rotation_deg,
            mirrored,
        })
    }

    /// World-space contours of this part as committed by `placement`.
    pub fn world_contours(&self, placement: &Placement) -> Result<Vec<Contour>> {
        Ok(self
            .prepare(placement.rotation_deg, placement.mirrored)?
            .placed_contours(placement.translation))
    }
}

/// Rotates about the origin, exactly for multiples of 90°.
fn rotate_deg(contour: &Contour, rotation_deg: f64) -> Contour {
    let turns = rotation_deg / 90.0;
    if (turns - turns.round()).abs() > 1e-12 {
        return contour.rotate(rotation_deg.to_radians());
    }

    let quarter = (turns.round() as i64).rem_euclid(4);
    let vertices = contour
        .vertices()
        .iter()
        .map(|&v| match quarter {
            0 => v,
            1 => Point2D::new(-v.y, v.x),
            2 => Point2D::new(-v.x, -v.y),
            _ => Point2D::new(v.y, -v.x),
        })
        .collect();
    Contour::new(vertices, contour.is_outer())
}

/// A part's contours after the local pre-transform for one rotation and
/// mirror state, ready to be translated onto the plate.
#[derive(Debug, Clone)]
pub struct PreparedShape {
    contours: Vec<Contour>,
    local_bounds: AxisAlignedBox,
    rotation_deg: f64,
    mirrored: bool,
}

impl PreparedShape {
    /// Pre-transformed contours in local coordinates.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Bounding box in local coordinates.
    pub fn local_bounds(&self) -> AxisAlignedBox {
        self.local_bounds
    }

    /// Rotation this shape was prepared for.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// Whether the shape was mirrored before rotation.
    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    /// Bounding box after translating by `translation`.
    pub fn bounds_at(&self, translation: Point2D) -> AxisAlignedBox {
        self.local_bounds.translate(translation)
    }

    /// Fresh contours translated by `translation`.
    pub fn placed_contours(&self, translation: Point2D) -> Vec<Contour> {
        self.contours.iter().map(|c| c.translate(translation)).collect()
    }
}

/// Rotation angles, in degrees, to try for one part.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRotations(Vec<f64>);

impl ResolvedRotations {
    /// Uses the configured list when present, else the part's rotation step:
    /// 0° alone when the step is not positive, otherwise every multiple of the
    /// step below 360° in ascending order.
    pub fn resolve(part: &Part, config: &Config) -> Self {
        if let Some(angles) = &config.rotations {
            if !angles.is_empty() {
                return Self(angles.clone());
            }
        }
        Self::from_step(part.rotation_step_deg())
    }

    /// Every multiple of `step_deg` below 360°, or `[0]` for non-positive steps.
    pub fn from_step(step_deg: f64) -> Self {
        if !(step_deg.is_finite() && step_deg > 0.0) {
            return Self(vec![0.0]);
        }
        let angles = (0..)
            .map(|k| k as f64 * step_deg)
            .take_while(|&a| a < 360.0 - 1e-9)
            .collect();
        Self(angles)
    }

    /// Angles in degrees.
    pub fn angles(&self) -> &[f64] {
        &self.0
    }

    /// Number of angles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no angles.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
