//! # SheetNest 2D
//!
//! Plate nesting for flat parts: contour reconstruction from raw CAD segments,
//! exact polygon collision and grid/strip placement search.
//!
//! ## Features
//!
//! - Contour reconstruction from unordered lines and arcs, with holes
//! - Robust polygon overlap test where touching is not overlapping
//! - Grid-sweep first-fit nester with exact collision or cell occupancy
//! - Strip (shelf) nester for fast rectangular layouts
//! - Clearance and kerf spacing, discrete rotations, mirrored copies
//! - Optional parallel rotation probing with deterministic results
//!
//! ## Quick Start
//!
//! ```rust
//! use sheetnest_d2::{Config, Nester2D, Part, Plate, Solver, Strategy};
//!
//! let bracket = Part::l_shape("bracket", 100.0, 80.0, 30.0, 30.0)
//!     .with_quantity(4)
//!     .with_rotation_step(90.0);
//! let plate = Plate::new(500.0, 300.0).unwrap();
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::Exact)
//!     .with_grid_step(5.0)
//!     .with_clearance(2.0);
//!
//! let result = Nester2D::new(config).nest(&[bracket], &plate).unwrap();
//! assert!(result.all_placed());
//! println!("utilization: {}", result.utilization_percent());
//! ```
//!
//! ## Parts from CAD segments
//!
//! ```rust
//! use sheetnest_d2::{Part, Point2D, ReconstructConfig, Segment};
//!
//! let p = |x, y| Point2D::new(x, y);
//! let segments = vec![
//!     Segment::line(p(0.0, 0.0), p(40.0, 0.0)),
//!     Segment::line(p(40.0, 0.0), p(40.0, 20.0)),
//!     Segment::line(p(40.0, 20.0), p(0.0, 20.0)),
//!     Segment::line(p(0.0, 20.0), p(0.0, 0.0)),
//!     Segment::circle(p(20.0, 10.0), 5.0),
//! ];
//!
//! let part = Part::from_segments("flange", &segments, &ReconstructConfig::default()).unwrap();
//! assert_eq!(part.holes().count(), 1);
//! ```

pub mod contour;
pub mod grid_nester;
pub mod intersect;
pub mod nester;
pub mod occupancy;
pub mod part;
pub mod plate;
pub mod reconstruct;
pub mod spatial_index;
pub mod strip_nester;

// Re-exports
pub use contour::Contour;
pub use intersect::{contour_sets_collide, intersects};
pub use nester::Nester2D;
pub use part::{Part, PreparedShape, ResolvedRotations};
pub use plate::Plate;
pub use reconstruct::{reconstruct, ReconstructConfig, Segment};
pub use sheetnest_core::{
    AxisAlignedBox, Config, Error, NestingResult, NestingSummary, Placement, Point2D, Result,
    Solver, Strategy, Transform2D, UnplacedPart,
};
