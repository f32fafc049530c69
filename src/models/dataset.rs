//! Input snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Assignment, Employee, Project};

/// An immutable snapshot of employees, projects and assignments.
///
/// Order is significant: the optimizer breaks ties by employee order and
/// processes placeholders in assignment order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub employees: Vec<Employee>,
    pub projects: Vec<Project>,
    pub assignments: Vec<Assignment>,
}

impl Dataset {
    /// Creates a dataset.
    pub fn new(
        employees: Vec<Employee>,
        projects: Vec<Project>,
        assignments: Vec<Assignment>,
    ) -> Self {
        Self {
            employees,
            projects,
            assignments,
        }
    }

    /// Returns a copy with a different assignment list.
    pub fn with_assignments(&self, assignments: Vec<Assignment>) -> Self {
        Self {
            employees: self.employees.clone(),
            projects: self.projects.clone(),
            assignments,
        }
    }

    /// Employees indexed by ID. Later duplicates win.
    pub fn employee_index(&self) -> HashMap<&str, &Employee> {
        self.employees.iter().map(|e| (e.id.as_str(), e)).collect()
    }

    /// Projects indexed by ID. Later duplicates win.
    pub fn project_index(&self) -> HashMap<&str, &Project> {
        self.projects.iter().map(|p| (p.id.as_str(), p)).collect()
    }

    /// Placeholder assignments, in input order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| a.is_placeholder())
    }
}
