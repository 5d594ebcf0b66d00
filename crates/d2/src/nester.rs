//! 2D nesting solver.

use crate::grid_nester::{nest_exact, nest_occupancy};
use crate::part::Part;
use crate::plate::Plate;
use crate::strip_nester::nest_strip;
use log::{info, warn};
use sheetnest_core::solver::{Config, Solver, Strategy};
use sheetnest_core::{NestingResult, Result};
use std::time::Instant;

/// 2D nesting solver.
///
/// Validates its input, dispatches to the configured [`Strategy`] and fills in
/// utilization, timing and the strategy name on the result.
#[derive(Debug, Clone, Default)]
pub struct Nester2D {
    config: Config,
}

impl Nester2D {
    /// Creates a new nester with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Creates a nester with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn validate(&self, parts: &[Part], plate: &Plate) -> Result<()> {
        self.config.validate()?;
        plate.validate()?;
        parts.iter().try_for_each(Part::validate)
    }
}

impl Solver for Nester2D {
    type Part = Part;
    type Plate = Plate;

    fn nest(&self, parts: &[Self::Part], plate: &Self::Plate) -> Result<NestingResult> {
        let start = Instant::now();
        self.validate(parts, plate)?;

        let strategy = self.config.strategy;
        let mut result = match strategy {
            Strategy::Exact => nest_exact(parts, plate, &self.config),
            Strategy::GridOccupancy => nest_occupancy(parts, plate, &self.config),
            Strategy::Strip => nest_strip(parts, plate, &self.config),
        }?;

        for u in &result.unplaced {
            warn!("could not place {}#{}", u.part_name, u.instance);
        }

        let placed_area: f64 = result
            .placements
            .iter()
            .map(|p| parts[p.part_index].net_area())
            .sum();
        result.utilization = placed_area / plate.area();
        result.computation_time_ms = start.elapsed().as_millis() as u64;
        result.strategy = Some(strategy.name().to_string());

        info!(
            "{}: placed {}/{} instances, utilization {}, {} ms",
            strategy,
            result.placed_count(),
            result.placed_count() + result.unplaced_count(),
            result.utilization_percent(),
            result.computation_time_ms
        );
        Ok(result)
    }
}
