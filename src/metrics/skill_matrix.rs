//! Employee-to-project compatibility scores.
//!
//! `score(e, p) = Σ over p.required_skills of e's proficiency points`
//! (Beginner 1, Intermediate 2, Expert 3; 0 for a missing skill).
//!
//! The matrix is sparse: zero scores are not stored, and an employee with
//! no positive score against any project has no row at all.
//!
//! # Complexity
//! O(E × P × S) to build, where S is the average number of required skills.

use std::collections::HashMap;

use crate::models::{Employee, Project};

/// Sparse employee → project → score mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillScoreMatrix {
    scores: HashMap<String, HashMap<String, f64>>,
}

impl SkillScoreMatrix {
    /// Builds the matrix for every employee/project pair.
    pub fn build(employees: &[Employee], projects: &[Project]) -> Self {
        let mut scores: HashMap<String, HashMap<String, f64>> = HashMap::new();

        for employee in employees {
            let mut row = HashMap::new();
            for project in projects {
                let score = pair_score(employee, project);
                if score > 0.0 {
                    row.insert(project.id.clone(), score);
                }
            }
            if !row.is_empty() {
                scores.insert(employee.id.clone(), row);
            }
        }

        Self { scores }
    }

    /// Score for a pair; 0 when either side is unknown or nothing overlaps.
    pub fn score(&self, employee_id: &str, project_id: &str) -> f64 {
        self.scores
            .get(employee_id)
            .and_then(|row| row.get(project_id))
            .copied()
            .unwrap_or(0.0)
    }

    /// Non-zero scores for one employee.
    pub fn row(&self, employee_id: &str) -> Option<&HashMap<String, f64>> {
        self.scores.get(employee_id)
    }

    /// Whether the employee has any non-zero score.
    pub fn contains_employee(&self, employee_id: &str) -> bool {
        self.scores.contains_key(employee_id)
    }

    /// Number of employees with at least one non-zero score.
    pub fn employee_count(&self) -> usize {
        self.scores.len()
    }

    /// Number of stored (non-zero) entries.
    pub fn entry_count(&self) -> usize {
        self.scores.values().map(HashMap::len).sum()
    }

    /// Whether the matrix holds no entries.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Sum of proficiency points over the project's required skills.
pub fn pair_score(employee: &Employee, project: &Project) -> f64 {
    project
        .required_skills
        .iter()
        .filter_map(|skill| employee.proficiency(skill))
        .map(|level| level.points())
        .sum()
}
