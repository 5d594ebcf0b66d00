//! Placement representation for positioned parts.

use crate::bounds::AxisAlignedBox;
use crate::vector::Point2D;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The committed position of one part instance on the plate.
///
/// Placements are immutable once created. World-space vertices of the placed
/// part are obtained by taking each part vertex, subtracting the part's bounding
/// box minimum, mirroring about the local vertical axis when [`mirrored`](Self::mirrored)
/// is set, rotating by [`rotation_deg`](Self::rotation_deg) about the local origin
/// and finally adding [`translation`](Self::translation).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Index of the part in the input slice.
    pub part_index: usize,

    /// Name of the placed part.
    pub part_name: String,

    /// Copy index (0-based) among the part's quantity.
    pub instance: usize,

    /// Translation applied after rotation.
    pub translation: Point2D,

    /// Rotation in degrees, counter-clockwise.
    pub rotation_deg: f64,

    /// Whether the part was mirrored before rotation.
    pub mirrored: bool,

    /// Bounding box of the placed part in plate coordinates.
    pub bounds: AxisAlignedBox,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        part_index: usize,
        part_name: impl Into<String>,
        instance: usize,
        translation: Point2D,
        rotation_deg: f64,
        bounds: AxisAlignedBox,
    ) -> Self {
        Self {
            part_index,
            part_name: part_name.into(),
            instance,
            translation,
            rotation_deg,
            mirrored: false,
            bounds,
        }
    }

    /// Sets the mirrored flag.
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Returns the rotation in radians.
    pub fn rotation_rad(&self) -> f64 {
        self.rotation_deg.to_radians()
    }
}
