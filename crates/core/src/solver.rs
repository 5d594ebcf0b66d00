//! Solver traits and configuration.

use crate::result::NestingResult;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placement search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Grid sweep with exact polygon collision (first fit, rotations outer).
    #[default]
    Exact,
    /// Grid sweep tested against a coarse cell-occupancy map.
    GridOccupancy,
    /// Row-based shelf placement without rotation.
    Strip,
}

impl Strategy {
    /// Returns a short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Exact => "Exact",
            Strategy::GridOccupancy => "GridOccupancy",
            Strategy::Strip => "Strip",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for a nesting run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Placement strategy.
    pub strategy: Strategy,

    /// Step between candidate translations (and cell size for grid occupancy).
    pub grid_step: f64,

    /// Minimum gap between parts and between parts and the plate edge.
    pub clearance: f64,

    /// Width of material removed by the cutting tool.
    pub kerf: f64,

    /// Explicit rotation angles in degrees. When `None`, each part's rotation
    /// step decides.
    pub rotations: Option<Vec<f64>>,

    /// Alternate mirrored copies (odd copy indices are mirrored).
    pub allow_mirror: bool,

    /// Evaluate rotation candidates concurrently. Results are identical to the
    /// sequential search.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            grid_step: 1.0,
            clearance: 0.0,
            kerf: 0.0,
            rotations: None,
            allow_mirror: false,
            parallel: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placement strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the grid step.
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = step;
        self
    }

    /// Sets the clearance.
    pub fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    /// Sets the kerf width.
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    /// Sets an explicit list of rotation angles in degrees for every part.
    pub fn with_rotations_deg(mut self, angles: Vec<f64>) -> Self {
        self.rotations = Some(angles);
        self
    }

    /// Enables or disables mirrored copies.
    pub fn with_mirror(mut self, allow: bool) -> Self {
        self.allow_mirror = allow;
        self
    }

    /// Enables or disables parallel rotation probing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Total spacing kept between parts and from the plate edge.
    pub fn spacing(&self) -> f64 {
        self.clearance + self.kerf
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(Error::ConfigError(format!(
                "grid step must be positive, got {}",
                self.grid_step
            )));
        }
        if !(self.clearance.is_finite() && self.clearance >= 0.0) {
            return Err(Error::ConfigError(format!(
                "clearance must be non-negative, got {}",
                self.clearance
            )));
        }
        if !(self.kerf.is_finite() && self.kerf >= 0.0) {
            return Err(Error::ConfigError(format!(
                "kerf must be non-negative, got {}",
                self.kerf
            )));
        }
        if let Some(angles) = &self.rotations {
            if let Some(bad) = angles.iter().find(|a| !a.is_finite()) {
                return Err(Error::ConfigError(format!(
                    "rotation angles must be finite, got {}",
                    bad
                )));
            }
        }
        Ok(())
    }
}

/// Trait for nesting solvers.
pub trait Solver {
    /// The part type this solver handles.
    type Part;
    /// The stock type this solver handles.
    type Plate;

    /// Places as many part instances as possible on the plate.
    ///
    /// Instances that do not fit are reported in [`NestingResult::unplaced`];
    /// errors are reserved for invalid input.
    fn nest(&self, parts: &[Self::Part], plate: &Self::Plate) -> Result<NestingResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.strategy, Strategy::Exact);
        assert_eq!(config.grid_step, 1.0);
        assert_eq!(config.spacing(), 0.0);
        assert!(config.rotations.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_strategy(Strategy::Strip)
            .with_grid_step(2.5)
            .with_clearance(2.0)
            .with_kerf(0.5)
            .with_rotations_deg(vec![0.0, 90.0])
            .with_mirror(true);

        assert_eq!(config.strategy, Strategy::Strip);
        assert_eq!(config.grid_step, 2.5);
        assert_eq!(config.spacing(), 2.5);
        assert_eq!(config.rotations, Some(vec![0.0, 90.0]));
        assert!(config.allow_mirror);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Config::new().with_grid_step(0.0).validate().is_err());
        assert!(Config::new().with_grid_step(-1.0).validate().is_err());
        assert!(Config::new().with_clearance(-0.1).validate().is_err());
        assert!(Config::new().with_kerf(f64::NAN).validate().is_err());
        assert!(Config::new()
            .with_rotations_deg(vec![0.0, f64::INFINITY])
            .validate()
            .is_err());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::GridOccupancy.to_string(), "GridOccupancy");
    }
}
