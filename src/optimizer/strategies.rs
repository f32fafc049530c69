//! Built-in candidate strategies.
//!
//! Both strategies share one formula and differ only in which booked hours
//! count against capacity:
//!
//! ```text
//! projected = booked + slot
//! load      = projected / max_hours
//! score     = w_skills × skill_score
//!           + w_util   × load              (only when load ≤ 1)
//!           − w_ot     × max(0, projected − max_hours)
//! ```
//!
//! # Score Convention
//! Higher scores are better.

use super::candidate::load_ratio;
use super::{Candidate, CandidateScore, CandidateStrategy, CapacityScope, OptimizationWeights};

/// Weighted score for a candidate with `booked` hours already committed.
pub fn weighted_score(
    booked: f64,
    slot_hours: f64,
    max_hours: f64,
    skill_score: f64,
    weights: &OptimizationWeights,
) -> CandidateScore {
    let projected = booked + slot_hours;
    let load = load_ratio(projected, max_hours);

    let mut score = weights.skills * skill_score;
    if load <= 1.0 {
        score += weights.utilization * load;
    }
    score - weights.overtime * (projected - max_hours).max(0.0)
}

/// Weighted greedy scoring against the employee's total booked hours.
///
/// Capacity is checked against every hour the employee has in the dataset,
/// regardless of which period the slot falls in.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedGreedy;

impl CandidateStrategy for WeightedGreedy {
    fn name(&self) -> &'static str {
        "weighted-greedy"
    }

    fn score(&self, candidate: &Candidate<'_>, weights: &OptimizationWeights) -> CandidateScore {
        weighted_score(
            candidate.dataset_hours,
            candidate.slot_hours,
            candidate.employee.max_hours,
            candidate.skill_score,
            weights,
        )
    }

    fn description(&self) -> &'static str {
        "Weighted greedy over dataset-wide hours"
    }
}

/// Weighted greedy scoring against hours booked in the slot's own period.
///
/// Stricter about weekly capacity, looser about employees who are busy in
/// other weeks. Selects differently from [`WeightedGreedy`] whenever an
/// employee's load is uneven across periods.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodScopedGreedy;

impl CandidateStrategy for PeriodScopedGreedy {
    fn name(&self) -> &'static str {
        "period-scoped-greedy"
    }

    fn score(&self, candidate: &Candidate<'_>, weights: &OptimizationWeights) -> CandidateScore {
        weighted_score(
            candidate.period_hours,
            candidate.slot_hours,
            candidate.employee.max_hours,
            candidate.skill_score,
            weights,
        )
    }

    fn capacity_scope(&self) -> CapacityScope {
        CapacityScope::Period
    }

    fn description(&self) -> &'static str {
        "Weighted greedy over hours in the slot's period"
    }
}
