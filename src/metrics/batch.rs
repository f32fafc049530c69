//! Stateless metrics over an immutable snapshot.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Overtime | Σ over employees and periods of max(0, period hours − max hours) |
//! | Utilization | round(100 × assigned hours / (Σ max hours × periods)) |
//! | Skills match | Σ of matrix scores over unique (employee, project) pairs |
//!
//! Placeholder assignments never count towards overtime or the utilization
//! numerator. They do count when inferring the number of periods.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::SkillScoreMatrix;
use crate::models::{Assignment, DateRange, Dataset, Employee, PeriodKey};

/// Aggregate performance of an allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Total overtime hours, rounded.
    pub overtime_hours: u32,
    /// Utilization percentage (0..=100).
    pub resource_utilization: u32,
    /// Skills score, rounded. A total in the batch calculator, an average
    /// percentage in the incremental cache.
    pub skills_matching: u32,
}

/// Rounds a non-negative metric to the nearest integer; NaN and negatives map to 0.
pub(crate) fn round_metric(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

/// Number of periods the utilization denominator spans.
///
/// With a date range: its inclusive week span. Without one: the number of
/// distinct period keys present in `assignments`. Never less than 1.
pub fn period_count(assignments: &[Assignment], date_range: Option<&DateRange>) -> usize {
    let count = match date_range {
        Some(range) => range.week_span(),
        None => assignments
            .iter()
            .map(Assignment::period_key)
            .collect::<HashSet<PeriodKey>>()
            .len(),
    };
    count.max(1)
}

/// Overall resource utilization as a rounded percentage, capped at 100.
///
/// Returns 0 when there are no employees or total capacity is zero.
pub fn resource_utilization(
    employees: &[Employee],
    assignments: &[Assignment],
    date_range: Option<&DateRange>,
) -> u32 {
    if employees.is_empty() {
        return 0;
    }

    let periods = period_count(assignments, date_range) as f64;
    let capacity: f64 = employees.iter().map(|e| e.max_hours).sum::<f64>() * periods;
    if capacity <= 0.0 {
        return 0;
    }

    let assigned: f64 = assignments
        .iter()
        .filter(|a| !a.is_placeholder())
        .map(|a| a.hours)
        .sum();

    round_metric(100.0 * assigned / capacity).min(100)
}

/// Hours per period for each employee, placeholders excluded.
pub fn hours_by_employee_period(
    assignments: &[Assignment],
) -> HashMap<&str, BTreeMap<PeriodKey, f64>> {
    let mut hours: HashMap<&str, BTreeMap<PeriodKey, f64>> = HashMap::new();
    for a in assignments.iter().filter(|a| !a.is_placeholder()) {
        *hours
            .entry(a.employee_id.as_str())
            .or_default()
            .entry(a.period_key())
            .or_insert(0.0) += a.hours;
    }
    hours
}

/// Period-scoped overtime for one employee.
///
/// Each period is judged on its own: being over capacity cumulatively but
/// under it every week yields zero.
pub fn period_overtime<'a>(
    max_hours: f64,
    period_hours: impl IntoIterator<Item = &'a f64>,
) -> f64 {
    period_hours
        .into_iter()
        .map(|&h| (h - max_hours).max(0.0))
        .sum()
}

/// Total period-scoped overtime across all known employees.
///
/// Assignments referencing unknown employees contribute nothing.
pub fn overtime_hours(employees: &[Employee], assignments: &[Assignment]) -> f64 {
    let hours = hours_by_employee_period(assignments);
    employees
        .iter()
        .filter_map(|e| {
            hours
                .get(e.id.as_str())
                .map(|periods| period_overtime(e.max_hours, periods.values()))
        })
        .sum()
}

/// Total skills score over unique (employee, project) pairs.
///
/// A pair spanning many periods is counted once. Unknown references and
/// projects without requirements score 0 through the matrix.
pub fn skills_match(matrix: &SkillScoreMatrix, assignments: &[Assignment]) -> f64 {
    let pairs: BTreeSet<(&str, &str)> = assignments
        .iter()
        .filter(|a| !a.is_placeholder())
        .map(|a| (a.employee_id.as_str(), a.project_id.as_str()))
        .collect();

    pairs
        .into_iter()
        .map(|(employee_id, project_id)| matrix.score(employee_id, project_id))
        .sum()
}

/// Computes all three metrics with a prebuilt matrix.
pub fn calculate_metrics_with(
    matrix: &SkillScoreMatrix,
    employees: &[Employee],
    assignments: &[Assignment],
    date_range: Option<&DateRange>,
) -> Metrics {
    Metrics {
        overtime_hours: round_metric(overtime_hours(employees, assignments)),
        resource_utilization: resource_utilization(employees, assignments, date_range),
        skills_matching: round_metric(skills_match(matrix, assignments)),
    }
}

/// Computes all three metrics for a snapshot.
pub fn calculate_metrics(dataset: &Dataset, date_range: Option<&DateRange>) -> Metrics {
    let matrix = SkillScoreMatrix::build(&dataset.employees, &dataset.projects);
    calculate_metrics_with(&matrix, &dataset.employees, &dataset.assignments, date_range)
}
