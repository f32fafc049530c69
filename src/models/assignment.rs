//! Assignment model.
//!
//! An assignment books `hours` of one employee on one project for one
//! period. Assignments whose employee reference is a reserved sentinel
//! are placeholders: unmet demand waiting for a real person.
//!
//! # Placeholder sentinel
//! An employee reference is a placeholder if it is empty, equals
//! [`PLACEHOLDER_EMPLOYEE_ID`], or is the sentinel followed by a space
//! and one or more ASCII digits (`"placeholder 3"`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PeriodKey;

/// Reserved employee reference marking unmet demand.
pub const PLACEHOLDER_EMPLOYEE_ID: &str = "placeholder";

/// Whether an employee reference denotes a placeholder.
pub fn is_placeholder_id(employee_id: &str) -> bool {
    if employee_id.is_empty() || employee_id == PLACEHOLDER_EMPLOYEE_ID {
        return true;
    }
    match employee_id
        .strip_prefix(PLACEHOLDER_EMPLOYEE_ID)
        .and_then(|rest| rest.strip_prefix(' '))
    {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Hours booked for one employee on one project in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique assignment identifier.
    pub id: String,
    /// Employee reference (may be a placeholder sentinel or dangling).
    pub employee_id: String,
    /// Project reference (may be dangling).
    pub project_id: String,
    /// Booked hours (non-negative).
    pub hours: f64,
    /// Calendar date within the booked week. Takes precedence over `week`.
    pub date: Option<NaiveDate>,
    /// Legacy free-text week label.
    pub week: Option<String>,
}

/// Partial changes to an existing assignment.
///
/// `None` leaves a field unchanged. For `date` and `week`, `Some(None)`
/// clears the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPatch {
    pub employee_id: Option<String>,
    pub project_id: Option<String>,
    pub hours: Option<f64>,
    pub date: Option<Option<NaiveDate>>,
    pub week: Option<Option<String>>,
}

impl Assignment {
    /// Creates an assignment without a period.
    pub fn new(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        project_id: impl Into<String>,
        hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            employee_id: employee_id.into(),
            project_id: project_id.into(),
            hours,
            date: None,
            week: None,
        }
    }

    /// Creates a placeholder slot for unmet demand.
    pub fn placeholder(id: impl Into<String>, project_id: impl Into<String>, hours: f64) -> Self {
        Self::new(id, PLACEHOLDER_EMPLOYEE_ID, project_id, hours)
    }

    /// Sets the booked date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the legacy week label.
    pub fn with_week(mut self, label: impl Into<String>) -> Self {
        self.week = Some(label.into());
        self
    }

    /// Whether this assignment represents unmet demand.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        is_placeholder_id(&self.employee_id)
    }

    /// Aggregation period: the Monday of `date`, else the `week` label,
    /// else the unscheduled bucket `Label("")`.
    pub fn period_key(&self) -> PeriodKey {
        match (&self.date, &self.week) {
            (Some(date), _) => PeriodKey::week_of(*date),
            (None, Some(label)) => PeriodKey::Label(label.trim().to_string()),
            (None, None) => PeriodKey::Label(String::new()),
        }
    }

    /// Applies a patch in place.
    pub fn apply(&mut self, patch: &AssignmentPatch) {
        if let Some(employee_id) = &patch.employee_id {
            self.employee_id = employee_id.clone();
        }
        if let Some(project_id) = &patch.project_id {
            self.project_id = project_id.clone();
        }
        if let Some(hours) = patch.hours {
            self.hours = hours;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(week) = &patch.week {
            self.week = week.clone();
        }
    }
}

impl AssignmentPatch {
    /// Patch that reassigns to another employee.
    pub fn employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Default::default()
        }
    }

    /// Patch that moves to another project.
    pub fn project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Default::default()
        }
    }

    /// Patch that changes the booked hours.
    pub fn hours(hours: f64) -> Self {
        Self {
            hours: Some(hours),
            ..Default::default()
        }
    }

    /// Patch that moves the booking to another date.
    pub fn date(date: NaiveDate) -> Self {
        Self {
            date: Some(Some(date)),
            ..Default::default()
        }
    }
}
