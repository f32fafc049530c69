//! Project model.
//!
//! A project is a body of work that demands hours and a set of skills.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A project employees can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Required skill names, in order, without duplicates. May be empty.
    pub required_skills: Vec<String>,
    /// First day of the project.
    pub start_date: Option<NaiveDate>,
    /// Last day of the project.
    pub end_date: Option<NaiveDate>,
}

impl Project {
    /// Creates a project with no required skills.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            required_skills: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a required skill. Duplicates are ignored.
    pub fn with_required_skill(mut self, skill: impl Into<String>) -> Self {
        let skill = skill.into();
        if !self.required_skills.contains(&skill) {
            self.required_skills.push(skill);
        }
        self
    }

    /// Sets the project dates.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Whether the project requires any skills at all.
    #[inline]
    pub fn has_requirements(&self) -> bool {
        !self.required_skills.is_empty()
    }
}
