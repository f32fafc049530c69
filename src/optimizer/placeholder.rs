//! Weighted greedy placeholder resolver.
//!
//! # Algorithm
//!
//! 1. Collect placeholder assignments; with none, return current metrics twice.
//! 2. Group them by (project, period), groups in order of first appearance.
//! 3. For each slot of a group, in input order, score every real employee not
//!    yet used in the group and keep the highest; ties keep the earliest
//!    employee in input order. Slots with no eligible employee are skipped.
//! 4. With [`Algorithm::Annealing`], refine each group's fill.
//! 5. Replace resolved placeholders with concrete assignments and compare
//!    batch metrics before and after.
//!
//! # Complexity
//! O(s × e) strategy evaluations, where s = placeholders, e = employees.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::annealing::refine_group;
use super::candidate::load_ratio;
use super::strategies::WeightedGreedy;
use super::{
    Algorithm, AnnealingConfig, Candidate, CandidateScore, CandidateStrategy, OptimizationWeights,
};
use crate::metrics::{calculate_metrics_with, Metrics, SkillScoreMatrix};
use crate::models::{
    is_placeholder_id, Assignment, AssignmentPatch, DateRange, Dataset, Employee, PeriodKey,
    ProficiencyLevel, Project,
};
use crate::validation;

/// A proposed employee for one placeholder slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The placeholder assignment this resolves.
    pub placeholder_id: String,
    pub project_id: String,
    pub period: PeriodKey,
    /// Hours the placeholder demanded.
    pub original_hours: f64,
    pub suggested_employee_id: String,
    /// Overtime hours the slot pushes the employee into.
    pub overtime_score: f64,
    /// Employee load after taking the slot, percent, capped at 100.
    pub utilization_score: f64,
    /// Skills coverage of the project, percent of the maximum achievable.
    pub skills_score: f64,
}

impl Suggestion {
    /// Patch that applies this suggestion to the placeholder assignment.
    pub fn to_patch(&self) -> AssignmentPatch {
        AssignmentPatch::employee(self.suggested_employee_id.clone())
    }

    /// Weighted sum of the reported component scores.
    pub fn weighted_score(&self, weights: &OptimizationWeights) -> f64 {
        weights.skills * self.skills_score + weights.utilization * self.utilization_score
            - weights.overtime * self.overtime_score
    }
}

/// Batch metrics before and after applying every suggestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsComparison {
    pub current: Metrics,
    pub predicted: Metrics,
}

/// Output of an optimizer run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub suggestions: Vec<Suggestion>,
    /// Σ of each suggestion's weighted component scores.
    pub total_score: f64,
    pub metrics: MetricsComparison,
    /// The run stopped early; `suggestions` covers the groups finished.
    pub cancelled: bool,
}

/// Resolves placeholder assignments to concrete employees.
///
/// # Example
///
/// ```
/// use u_staffing::optimizer::{Algorithm, PlaceholderOptimizer};
/// use u_staffing::models::{Assignment, Dataset, Employee, Project};
///
/// let dataset = Dataset::new(
///     vec![Employee::new("E1", 40.0), Employee::new("E2", 40.0)],
///     vec![Project::new("P1")],
///     vec![
///         Assignment::placeholder("A1", "P1", 8.0).with_week("W1"),
///         Assignment::placeholder("A2", "P1", 8.0).with_week("W1"),
///     ],
/// );
///
/// let result = PlaceholderOptimizer::new()
///     .with_algorithm(Algorithm::Greedy)
///     .optimize(&dataset, None);
/// assert_eq!(result.suggestions.len(), 2);
/// assert_ne!(
///     result.suggestions[0].suggested_employee_id,
///     result.suggestions[1].suggested_employee_id
/// );
/// ```
#[derive(Clone)]
pub struct PlaceholderOptimizer {
    strategy: Arc<dyn CandidateStrategy>,
    weights: OptimizationWeights,
    algorithm: Algorithm,
    annealing: AnnealingConfig,
    cancel: Option<Arc<AtomicBool>>,
}

/// Read-only lookups shared across groups.
struct RunContext<'a> {
    matrix: SkillScoreMatrix,
    projects: HashMap<&'a str, &'a Project>,
    eligible: Vec<&'a Employee>,
    dataset_hours: HashMap<&'a str, f64>,
    period_hours: HashMap<(&'a str, PeriodKey), f64>,
}

struct Group<'a> {
    project_id: &'a str,
    period: PeriodKey,
    slots: Vec<&'a Assignment>,
}

impl PlaceholderOptimizer {
    /// Creates an optimizer with [`WeightedGreedy`] and balanced weights.
    pub fn new() -> Self {
        Self {
            strategy: Arc::new(WeightedGreedy),
            weights: OptimizationWeights::default(),
            algorithm: Algorithm::Greedy,
            annealing: AnnealingConfig::default(),
            cancel: None,
        }
    }

    /// Sets the candidate strategy.
    pub fn with_strategy<S: CandidateStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Sets the objective weights.
    pub fn with_weights(mut self, weights: OptimizationWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the fill algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the annealing parameters (used with [`Algorithm::Annealing`]).
    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    /// Sets a flag that stops the run between groups once raised.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Name of the configured strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Resolves placeholders in `dataset`.
    pub fn optimize(
        &self,
        dataset: &Dataset,
        date_range: Option<&DateRange>,
    ) -> OptimizationResult {
        self.optimize_with_progress(dataset, date_range, &mut |_: u8| {})
    }

    /// Resolves placeholders, reporting percent complete (0..=100) as slots
    /// are processed. Progress is advisory.
    pub fn optimize_with_progress(
        &self,
        dataset: &Dataset,
        date_range: Option<&DateRange>,
        progress: &mut dyn FnMut(u8),
    ) -> OptimizationResult {
        if cfg!(debug_assertions) {
            validation::log_findings(
                "optimizer input",
                &dataset.employees,
                &dataset.projects,
                &dataset.assignments,
            );
        }

        let matrix = SkillScoreMatrix::build(&dataset.employees, &dataset.projects);
        let current = calculate_metrics_with(
            &matrix,
            &dataset.employees,
            &dataset.assignments,
            date_range,
        );

        let groups = group_placeholders(&dataset.assignments);
        if groups.is_empty() {
            progress(100);
            return OptimizationResult {
                metrics: MetricsComparison {
                    current,
                    predicted: current,
                },
                ..Default::default()
            };
        }

        let ctx = RunContext::new(dataset, matrix);
        let total_slots: usize = groups.iter().map(|g| g.slots.len()).sum();
        let mut processed = 0usize;
        let mut suggestions = Vec::new();
        let mut cancelled = false;

        for (index, group) in groups.iter().enumerate() {
            if self.is_cancelled() {
                log::info!(
                    "optimizer cancelled after {index}/{} groups",
                    groups.len()
                );
                cancelled = true;
                break;
            }

            let fill = self.fill_group(&ctx, group, index);
            for (slot, chosen) in group.slots.iter().zip(&fill) {
                if let Some(c) = chosen {
                    suggestions.push(self.report(&ctx, group, slot, ctx.eligible[*c]));
                }
                processed += 1;
                progress((processed * 100 / total_slots) as u8);
            }
            log::debug!(
                "optimizer group project={} period={}: slots={} filled={}",
                group.project_id,
                group.period,
                group.slots.len(),
                fill.iter().flatten().count()
            );
        }

        let predicted_dataset = apply_suggestions(dataset, &suggestions);
        let predicted = calculate_metrics_with(
            &ctx.matrix,
            &predicted_dataset.employees,
            &predicted_dataset.assignments,
            date_range,
        );
        let total_score = suggestions
            .iter()
            .map(|s| s.weighted_score(&self.weights))
            .sum();

        log::info!(
            "optimizer: strategy={} algorithm={:?} placeholders={} suggestions={} total_score={:.2}",
            self.strategy.name(),
            self.algorithm,
            total_slots,
            suggestions.len(),
            total_score
        );

        OptimizationResult {
            suggestions,
            total_score,
            metrics: MetricsComparison { current, predicted },
            cancelled,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Returns, per slot, the index into `ctx.eligible` of the chosen employee.
    fn fill_group(
        &self,
        ctx: &RunContext<'_>,
        group: &Group<'_>,
        index: usize,
    ) -> Vec<Option<usize>> {
        let table: Vec<Vec<CandidateScore>> = group
            .slots
            .iter()
            .map(|slot| {
                ctx.eligible
                    .iter()
                    .map(|e| self.strategy.score(&ctx.candidate(e, group, slot), &self.weights))
                    .collect()
            })
            .collect();

        let mut used = vec![false; ctx.eligible.len()];
        let mut fill = Vec::with_capacity(group.slots.len());
        for row in &table {
            let mut best: Option<(usize, CandidateScore)> = None;
            for (c, &score) in row.iter().enumerate() {
                if used[c] {
                    continue;
                }
                // Strictly greater keeps the earliest employee on ties.
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((c, score));
                }
            }
            if let Some((c, _)) = best {
                used[c] = true;
            }
            fill.push(best.map(|(c, _)| c));
        }

        match self.algorithm {
            Algorithm::Greedy => fill,
            Algorithm::Annealing => {
                let config = AnnealingConfig {
                    seed: self.annealing.seed.wrapping_add(index as u64),
                    ..self.annealing
                };
                refine_group(&table, &fill, &config)
            }
        }
    }

    /// Recomputes the human-readable component scores for a chosen employee.
    fn report(
        &self,
        ctx: &RunContext<'_>,
        group: &Group<'_>,
        slot: &Assignment,
        employee: &Employee,
    ) -> Suggestion {
        let candidate = ctx.candidate(employee, group, slot);
        let projected = candidate.projected_hours(self.strategy.capacity_scope());

        let overtime_score = (projected - employee.max_hours).max(0.0);
        let utilization_score = (load_ratio(projected, employee.max_hours) * 100.0).min(100.0);
        let skills_score = match candidate.project {
            Some(p) if p.has_requirements() => {
                let max = ProficiencyLevel::MAX_POINTS * p.required_skills.len() as f64;
                100.0 * candidate.skill_score / max
            }
            _ => 0.0,
        };

        Suggestion {
            placeholder_id: slot.id.clone(),
            project_id: group.project_id.to_string(),
            period: group.period.clone(),
            original_hours: slot.hours,
            suggested_employee_id: employee.id.clone(),
            overtime_score,
            utilization_score,
            skills_score,
        }
    }
}

impl Default for PlaceholderOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlaceholderOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderOptimizer")
            .field("strategy", &self.strategy.name())
            .field("weights", &self.weights)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl<'a> RunContext<'a> {
    fn new(dataset: &'a Dataset, matrix: SkillScoreMatrix) -> Self {
        let mut dataset_hours: HashMap<&str, f64> = HashMap::new();
        let mut period_hours: HashMap<(&str, PeriodKey), f64> = HashMap::new();
        for a in dataset.assignments.iter().filter(|a| !a.is_placeholder()) {
            *dataset_hours.entry(a.employee_id.as_str()).or_insert(0.0) += a.hours;
            *period_hours
                .entry((a.employee_id.as_str(), a.period_key()))
                .or_insert(0.0) += a.hours;
        }

        // One candidate per ID; the first record wins.
        let mut seen = HashSet::new();
        let eligible = dataset
            .employees
            .iter()
            .filter(|e| !is_placeholder_id(&e.id) && seen.insert(e.id.as_str()))
            .collect();

        Self {
            matrix,
            projects: dataset.project_index(),
            eligible,
            dataset_hours,
            period_hours,
        }
    }

    fn candidate<'c>(
        &'c self,
        employee: &'c Employee,
        group: &'c Group<'_>,
        slot: &Assignment,
    ) -> Candidate<'c> {
        let id = employee.id.as_str();
        Candidate {
            employee,
            project: self.projects.get(group.project_id).copied(),
            period: &group.period,
            slot_hours: slot.hours,
            dataset_hours: self.dataset_hours.get(id).copied().unwrap_or(0.0),
            period_hours: self
                .period_hours
                .get(&(id, group.period.clone()))
                .copied()
                .unwrap_or(0.0),
            skill_score: self.matrix.score(id, group.project_id),
        }
    }
}

/// Groups placeholders by (project, period) in order of first appearance.
fn group_placeholders(assignments: &[Assignment]) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut index: HashMap<(&str, PeriodKey), usize> = HashMap::new();

    for a in assignments.iter().filter(|a| a.is_placeholder()) {
        let key = (a.project_id.as_str(), a.period_key());
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                project_id: key.0,
                period: key.1.clone(),
                slots: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].slots.push(a);
    }
    groups
}

/// Drops resolved placeholders and appends their concrete replacements.
///
/// Each replacement keeps the placeholder's ID, project, hours and period.
/// Slots left unfilled stay in the result as placeholders.
fn apply_suggestions(dataset: &Dataset, suggestions: &[Suggestion]) -> Dataset {
    let assignments = &dataset.assignments;
    let resolved: HashMap<&str, &Suggestion> = suggestions
        .iter()
        .map(|s| (s.placeholder_id.as_str(), s))
        .collect();

    let mut predicted: Vec<Assignment> = assignments
        .iter()
        .filter(|a| !(a.is_placeholder() && resolved.contains_key(a.id.as_str())))
        .cloned()
        .collect();

    for s in suggestions {
        if let Some(original) = assignments
            .iter()
            .find(|a| a.is_placeholder() && a.id == s.placeholder_id)
        {
            let mut concrete = original.clone();
            concrete.apply(&s.to_patch());
            predicted.push(concrete);
        }
    }
    dataset.with_assignments(predicted)
}
