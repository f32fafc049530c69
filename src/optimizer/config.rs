//! Optimizer configuration.
//!
//! Every field has a default, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "weights": { "overtime": 0.5, "utilization": 0.2, "skills": 0.3 },
//!   "algorithm": "annealing",
//!   "capacity_scope": "period",
//!   "annealing": { "iterations": 500, "initial_temperature": 1.0, "cooling_rate": 0.99, "seed": 7 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::strategies::{PeriodScopedGreedy, WeightedGreedy};
use super::{OptimizationWeights, PlaceholderOptimizer};
use crate::error::{ConfigError, ConfigResult};

/// How slots within a group are filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// One pass, best candidate per slot in order.
    #[default]
    Greedy,
    /// Greedy pass followed by simulated annealing within each group.
    Annealing,
}

/// Which booked hours count against a candidate's capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityScope {
    /// All hours booked anywhere in the dataset.
    #[default]
    Dataset,
    /// Only hours booked in the slot's period.
    Period,
}

/// Simulated annealing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Moves attempted per group.
    pub iterations: usize,
    /// Starting temperature, in score units.
    pub initial_temperature: f64,
    /// Multiplicative cooling per move, in (0, 1).
    pub cooling_rate: f64,
    /// RNG seed; equal seeds give equal results.
    pub seed: u64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            initial_temperature: 1.0,
            cooling_rate: 0.995,
            seed: 42,
        }
    }
}

/// Full optimizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub weights: OptimizationWeights,
    pub algorithm: Algorithm,
    pub capacity_scope: CapacityScope,
    pub annealing: AnnealingConfig,
}

impl OptimizerConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks weights and annealing settings.
    pub fn validate(&self) -> ConfigResult<()> {
        let w = &self.weights;
        for (name, value) in [
            ("overtime", w.overtime),
            ("utilization", w.utilization),
            ("skills", w.skills),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        if self.algorithm == Algorithm::Annealing {
            let a = &self.annealing;
            if a.iterations == 0 {
                return Err(ConfigError::InvalidAnnealing(
                    "iterations must be positive".into(),
                ));
            }
            if !(a.initial_temperature.is_finite() && a.initial_temperature > 0.0) {
                return Err(ConfigError::InvalidAnnealing(format!(
                    "initial_temperature must be positive, got {}",
                    a.initial_temperature
                )));
            }
            if !(a.cooling_rate > 0.0 && a.cooling_rate < 1.0) {
                return Err(ConfigError::InvalidAnnealing(format!(
                    "cooling_rate must be in (0, 1), got {}",
                    a.cooling_rate
                )));
            }
        }
        Ok(())
    }

    /// Builds an optimizer with the configured strategy and settings.
    pub fn build_optimizer(&self) -> PlaceholderOptimizer {
        let optimizer = match self.capacity_scope {
            CapacityScope::Dataset => PlaceholderOptimizer::new().with_strategy(WeightedGreedy),
            CapacityScope::Period => PlaceholderOptimizer::new().with_strategy(PeriodScopedGreedy),
        };
        optimizer
            .with_weights(self.weights)
            .with_algorithm(self.algorithm)
            .with_annealing(self.annealing)
    }
}
