//! Rectangular stock.

use sheetnest_core::{AxisAlignedBox, Error, Point2D, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rectangular plate with its lower-left corner at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plate {
    width: f64,
    height: f64,
}

impl Plate {
    /// Creates a plate.
    ///
    /// # Errors
    /// [`Error::InvalidPlate`] if either dimension is not a positive finite number.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let plate = Self { width, height };
        plate.validate()?;
        Ok(plate)
    }

    /// Plate width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Plate height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Plate area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The full plate rectangle.
    pub fn bounds(&self) -> AxisAlignedBox {
        AxisAlignedBox::from_origin_size(Point2D::ZERO, self.width, self.height)
    }

    /// The region available to part bounding boxes when every part must keep
    /// `margin` from the plate edge. `None` if nothing remains.
    pub fn usable_bounds(&self, margin: f64) -> Option<AxisAlignedBox> {
        let usable = self.bounds().inflate(-margin);
        (usable.width() >= 0.0 && usable.height() >= 0.0).then_some(usable)
    }

    /// Checks the dimensions.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidPlate(format!(
                    "{} must be positive and finite, got {}",
                    label, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plate_new() {
        let plate = Plate::new(100.0, 50.0).unwrap();
        assert_relative_eq!(plate.area(), 5000.0);
        assert_eq!(plate.bounds(), AxisAlignedBox::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_plate_rejects_bad_dimensions() {
        assert!(matches!(Plate::new(0.0, 10.0), Err(Error::InvalidPlate(_))));
        assert!(matches!(Plate::new(10.0, -1.0), Err(Error::InvalidPlate(_))));
        assert!(matches!(
            Plate::new(f64::INFINITY, 10.0),
            Err(Error::InvalidPlate(_))
        ));
        assert!(Plate::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_usable_bounds() {
        let plate = Plate::new(10.0, 6.0).unwrap();
        assert_eq!(
            plate.usable_bounds(1.0),
            Some(AxisAlignedBox::new(1.0, 1.0, 9.0, 5.0))
        );
        assert_eq!(plate.usable_bounds(4.0), None);
    }
}
