//! Placeholder resolution.
//!
//! Turns unmet-demand slots into concrete employee suggestions with a
//! weighted greedy heuristic, optionally refined by simulated annealing,
//! and reports the metrics before and after.
//!
//! # Usage
//!
//! ```
//! use u_staffing::optimizer::{OptimizationWeights, PlaceholderOptimizer, strategies};
//! use u_staffing::models::{Assignment, Dataset, Employee, Project};
//!
//! let dataset = Dataset::new(
//!     vec![Employee::new("E1", 40.0)],
//!     vec![Project::new("P1")],
//!     vec![Assignment::placeholder("A1", "P1", 8.0).with_week("W1")],
//! );
//! let optimizer = PlaceholderOptimizer::new()
//!     .with_strategy(strategies::WeightedGreedy)
//!     .with_weights(OptimizationWeights::new(0.2, 0.3, 0.5));
//!
//! let result = optimizer.optimize(&dataset, None);
//! assert_eq!(result.suggestions[0].suggested_employee_id, "E1");
//! ```
//!
//! # Selection vs. reporting
//!
//! The strategy score that picks a winner is a single weighted scalar. The
//! component scores attached to each [`Suggestion`] are recomputed on a
//! human-readable scale (hours of overtime, percent utilization, percent
//! skills coverage) and are not the selection score.

mod annealing;
mod candidate;
mod config;
mod placeholder;
pub mod strategies;

pub use annealing::refine_group;
pub use candidate::Candidate;
pub use config::{AnnealingConfig, Algorithm, CapacityScope, OptimizerConfig};
pub use placeholder::{MetricsComparison, OptimizationResult, PlaceholderOptimizer, Suggestion};

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Score returned by a candidate strategy.
///
/// **Higher score = better candidate.**
pub type CandidateScore = f64;

/// Relative importance of the three objectives.
///
/// Non-negative; they need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationWeights {
    pub overtime: f64,
    pub utilization: f64,
    pub skills: f64,
}

impl OptimizationWeights {
    /// Creates a weight triple.
    pub fn new(overtime: f64, utilization: f64, skills: f64) -> Self {
        Self {
            overtime,
            utilization,
            skills,
        }
    }

    /// Returns weights scaled to sum to 1. All-zero weights are returned unchanged.
    pub fn normalized(&self) -> Self {
        let sum = self.overtime + self.utilization + self.skills;
        if sum <= 0.0 {
            return *self;
        }
        Self::new(self.overtime / sum, self.utilization / sum, self.skills / sum)
    }
}

impl Default for OptimizationWeights {
    fn default() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }
}

/// Scores one employee for one placeholder slot.
///
/// Implementations must be deterministic: the optimizer relies on equal
/// scores to keep the first employee in input order.
pub trait CandidateStrategy: Send + Sync + Debug {
    /// Strategy name (e.g., "weighted-greedy").
    fn name(&self) -> &'static str;

    /// Scores a candidate. Higher is better.
    fn score(&self, candidate: &Candidate<'_>, weights: &OptimizationWeights) -> CandidateScore;

    /// Which booked hours count against the candidate's capacity.
    ///
    /// Also used when recomputing the reported component scores.
    fn capacity_scope(&self) -> CapacityScope {
        CapacityScope::Dataset
    }

    /// Strategy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
