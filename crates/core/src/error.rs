//! Error types for SheetNest.

use thiserror::Error;

/// Result type alias for SheetNest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building geometry or configuring a nesting run.
///
/// Running out of room on the plate is not an error: instances that cannot be
/// placed are reported in [`NestingResult::unplaced`](crate::NestingResult).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A bounding box was requested for an empty point set.
    #[error("Cannot build a bounding box from an empty point set")]
    EmptyPointSet,

    /// Invalid part or contour geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid plate dimensions.
    #[error("Invalid plate: {0}")]
    InvalidPlate(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Segment reconstruction did not produce a single closed loop.
    #[error("No closed region found in segment data")]
    NoClosedRegion,
}
