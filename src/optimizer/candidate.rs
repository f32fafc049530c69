//! Candidate context passed to strategies.

use crate::models::{Employee, PeriodKey, Project};

use super::CapacityScope;

/// One employee considered for one placeholder slot.
///
/// Hours exclude placeholders and the slot itself.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The employee being considered.
    pub employee: &'a Employee,
    /// The slot's project, if the reference resolves.
    pub project: Option<&'a Project>,
    /// The slot's period.
    pub period: &'a PeriodKey,
    /// Hours the slot demands.
    pub slot_hours: f64,
    /// Employee's booked hours across the whole dataset.
    pub dataset_hours: f64,
    /// Employee's booked hours in the slot's period.
    pub period_hours: f64,
    /// Skill score matrix value for (employee, project).
    pub skill_score: f64,
}

impl Candidate<'_> {
    /// Hours already booked under the given scope.
    pub fn booked_hours(&self, scope: CapacityScope) -> f64 {
        match scope {
            CapacityScope::Dataset => self.dataset_hours,
            CapacityScope::Period => self.period_hours,
        }
    }

    /// Booked hours plus the slot, under the given scope.
    pub fn projected_hours(&self, scope: CapacityScope) -> f64 {
        self.booked_hours(scope) + self.slot_hours
    }

    /// Whether taking the slot would exceed capacity.
    pub fn would_overtime(&self, scope: CapacityScope) -> bool {
        self.projected_hours(scope) > self.employee.max_hours
    }
}

/// `projected / max_hours`, treating zero capacity as infinitely loaded
/// unless nothing is projected.
pub(crate) fn load_ratio(projected: f64, max_hours: f64) -> f64 {
    if max_hours > 0.0 {
        projected / max_hours
    } else if projected > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_hours() {
        let employee = Employee::new("E1", 40.0);
        let period = PeriodKey::Label("W1".into());
        let c = Candidate {
            employee: &employee,
            project: None,
            period: &period,
            slot_hours: 10.0,
            dataset_hours: 60.0,
            period_hours: 20.0,
            skill_score: 0.0,
        };

        assert!((c.projected_hours(CapacityScope::Dataset) - 70.0).abs() < 1e-10);
        assert!((c.projected_hours(CapacityScope::Period) - 30.0).abs() < 1e-10);
        assert!(c.would_overtime(CapacityScope::Dataset));
        assert!(!c.would_overtime(CapacityScope::Period));
    }

    #[test]
    fn test_load_ratio() {
        assert!((load_ratio(20.0, 40.0) - 0.5).abs() < 1e-10);
        assert!(load_ratio(1.0, 0.0).is_infinite());
        assert!((load_ratio(0.0, 0.0) - 0.0).abs() < 1e-10);
    }
}
