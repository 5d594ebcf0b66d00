//! # SheetNest Core
//!
//! Primitives and contracts shared by the SheetNest plate nesting engine.
//!
//! ## Core Components
//!
//! - **Vector algebra**: [`Point2D`]
//! - **Bounding boxes**: [`AxisAlignedBox`]
//! - **Rigid transforms**: [`Transform2D`]
//! - **Robust predicates**: [`robust::orient2d`] and friends
//! - **Solver contract**: [`Solver`], [`Config`], [`Strategy`]
//! - **Results**: [`Placement`], [`NestingResult`], [`UnplacedPart`]
//!
//! ## Strategies
//!
//! | Strategy | Speed | Precision | Description |
//! |----------|-------|-----------|-------------|
//! | `Exact` | Medium | Exact polygon | Grid sweep, first fit, exact collision |
//! | `GridOccupancy` | Fast | Cell | Grid sweep against a cell occupancy map |
//! | `Strip` | Fastest | Bounding box | Shelf rows, no rotation |
//!
//! ## Configuration
//!
//! ```rust
//! use sheetnest_core::{Config, Strategy};
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::Exact)
//!     .with_grid_step(2.0)
//!     .with_clearance(1.5)
//!     .with_kerf(0.2)
//!     .with_rotations_deg(vec![0.0, 90.0, 180.0, 270.0]);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod bounds;
pub mod error;
pub mod placement;
pub mod result;
pub mod robust;
pub mod solver;
pub mod transform;
pub mod vector;

// Re-exports
pub use bounds::AxisAlignedBox;
pub use error::{Error, Result};
pub use placement::Placement;
pub use result::{NestingResult, NestingSummary, UnplacedPart};
pub use solver::{Config, Solver, Strategy};
pub use transform::Transform2D;
pub use vector::Point2D;
