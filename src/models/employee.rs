//! Employee model.
//!
//! Employees are the people whose weekly capacity is allocated across
//! projects. Each employee has a capacity in hours per period and a set
//! of skills with proficiency levels.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A person whose hours can be assigned to projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Weekly capacity in hours (non-negative).
    pub max_hours: f64,
    /// Skills keyed by name.
    pub skills: HashMap<String, ProficiencyLevel>,
}

/// Skill proficiency.
///
/// Two weightings coexist and are used by different code paths:
///
/// | Level | `points()` (batch, matrix, optimizer) | `fraction()` (incremental cache) |
/// |-------|------|------|
/// | Beginner | 1 | 0.4 |
/// | Intermediate | 2 | 0.7 |
/// | Expert | 3 | 1.0 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl ProficiencyLevel {
    /// Highest value `points()` can return.
    pub const MAX_POINTS: f64 = 3.0;

    /// Integer weighting used by the skill score matrix.
    pub fn points(self) -> f64 {
        match self {
            ProficiencyLevel::Beginner => 1.0,
            ProficiencyLevel::Intermediate => 2.0,
            ProficiencyLevel::Expert => 3.0,
        }
    }

    /// Fractional weighting used by per-project skills averaging.
    pub fn fraction(self) -> f64 {
        match self {
            ProficiencyLevel::Beginner => 0.4,
            ProficiencyLevel::Intermediate => 0.7,
            ProficiencyLevel::Expert => 1.0,
        }
    }
}

impl Employee {
    /// Creates an employee with the given weekly capacity.
    pub fn new(id: impl Into<String>, max_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            max_hours,
            skills: HashMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds (or replaces) a skill.
    pub fn with_skill(mut self, name: impl Into<String>, level: ProficiencyLevel) -> Self {
        self.skills.insert(name.into(), level);
        self
    }

    /// Proficiency for a skill, if the employee has it.
    pub fn proficiency(&self, skill: &str) -> Option<ProficiencyLevel> {
        self.skills.get(skill).copied()
    }

    /// Whether this employee has a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains_key(skill)
    }
}
