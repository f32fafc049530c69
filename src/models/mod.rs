//! Workforce allocation domain models.
//!
//! Plain value records produced upstream by an import layer. This crate
//! reads them; it never creates or deletes employees or projects.
//!
//! # Domain Mappings
//!
//! | u-staffing | Consulting | Engineering | Healthcare |
//! |------------|-----------|-------------|------------|
//! | Employee | Consultant | Engineer | Nurse |
//! | Project | Engagement | Product Team | Ward |
//! | Assignment | Booking | Allocation | Shift Block |
//! | PeriodKey | Billing Week | Sprint Week | Roster Week |

mod assignment;
mod dataset;
mod employee;
mod period;
mod project;

pub use assignment::{is_placeholder_id, Assignment, AssignmentPatch, PLACEHOLDER_EMPLOYEE_ID};
pub use dataset::Dataset;
pub use employee::{Employee, ProficiencyLevel};
pub use period::{week_start, DateRange, PeriodKey};
pub use project::Project;
