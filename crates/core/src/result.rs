//! Nesting result representation.

use crate::placement::Placement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A part instance that could not be placed after exhausting every allowed
/// rotation and candidate position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnplacedPart {
    /// Index of the part in the input slice.
    pub part_index: usize,
    /// Name of the part.
    pub part_name: String,
    /// Copy index (0-based) among the part's quantity.
    pub instance: usize,
}

/// Result of a nesting run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NestingResult {
    /// Successful placements, in the order they were committed.
    pub placements: Vec<Placement>,

    /// Instances that could not be placed, in the order they were attempted.
    pub unplaced: Vec<UnplacedPart>,

    /// Utilization ratio (0.0 - 1.0): placed net part area over plate area.
    pub utilization: f64,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Strategy used for solving.
    pub strategy: Option<String>,
}

impl NestingResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every instance was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns the number of placed instances.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns the number of unplaced instances.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Returns the distinct names of parts with at least one unplaced instance,
    /// in first-failure order.
    pub fn unplaced_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.unplaced
            .iter()
            .map(|u| u.part_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization * 100.0)
    }

    /// Builds a compact summary of the run.
    pub fn summary(&self) -> NestingSummary {
        NestingSummary::from(self)
    }
}

/// Summary statistics for a nesting result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NestingSummary {
    /// Total instances requested.
    pub total_requested: usize,
    /// Total instances placed.
    pub total_placed: usize,
    /// Utilization percentage.
    pub utilization_percent: f64,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Strategy used.
    pub strategy: String,
}

impl From<&NestingResult> for NestingSummary {
    fn from(result: &NestingResult) -> Self {
        Self {
            total_requested: result.placements.len() + result.unplaced.len(),
            total_placed: result.placements.len(),
            utilization_percent: result.utilization * 100.0,
            time_ms: result.computation_time_ms,
            strategy: result
                .strategy
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}
