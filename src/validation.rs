//! Data-quality checks for allocation inputs.
//!
//! The engine itself never fails on bad data: unknown references score
//! zero. These checks exist to surface upstream import bugs early.
//! Detects:
//! - Duplicate IDs
//! - Negative hours and capacities
//! - Dangling employee and project references (placeholders excepted)
//! - Assignments with neither a date nor a week label

use crate::models::{Assignment, Employee, Project};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Finding category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// An assignment books negative hours.
    NegativeHours,
    /// An employee has negative capacity.
    NegativeCapacity,
    /// An assignment names an employee that does not exist.
    UnknownEmployee,
    /// An assignment names a project that does not exist.
    UnknownProject,
    /// An assignment has neither a date nor a week label.
    MissingPeriod,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a dataset.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every finding.
pub fn validate_dataset(
    employees: &[Employee],
    projects: &[Project],
    assignments: &[Assignment],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut employee_ids = HashSet::new();
    for e in employees {
        if !employee_ids.insert(e.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", e.id),
            ));
        }
        if e.max_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeCapacity,
                format!("Employee '{}' has negative capacity {}", e.id, e.max_hours),
            ));
        }
    }

    let mut project_ids = HashSet::new();
    for p in projects {
        if !project_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate project ID: {}", p.id),
            ));
        }
    }

    let mut assignment_ids = HashSet::new();
    for a in assignments {
        if !assignment_ids.insert(a.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate assignment ID: {}", a.id),
            ));
        }
        if a.hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeHours,
                format!("Assignment '{}' books negative hours {}", a.id, a.hours),
            ));
        }
        if !a.is_placeholder() && !employee_ids.contains(a.employee_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownEmployee,
                format!(
                    "Assignment '{}' references unknown employee '{}'",
                    a.id, a.employee_id
                ),
            ));
        }
        if !project_ids.contains(a.project_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProject,
                format!(
                    "Assignment '{}' references unknown project '{}'",
                    a.id, a.project_id
                ),
            ));
        }
        let has_label = a.week.as_deref().is_some_and(|w| !w.trim().is_empty());
        if a.date.is_none() && !has_label {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingPeriod,
                format!("Assignment '{}' has no date or week label", a.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Logs every finding at warn level. Used on ingest in debug builds.
pub(crate) fn log_findings(
    context: &str,
    employees: &[Employee],
    projects: &[Project],
    assignments: &[Assignment],
) {
    if let Err(errors) = validate_dataset(employees, projects, assignments) {
        for e in &errors {
            log::warn!("{context}: {:?}: {}", e.kind, e.message);
        }
    }
}
