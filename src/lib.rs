//! Workforce allocation engine for the U-Engine ecosystem.
//!
//! Scores how well employees are allocated to projects and proposes
//! concrete employees for unfilled demand.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Employee`, `Project`, `Assignment`,
//!   `PeriodKey`, `DateRange`, `Dataset`
//! - **`metrics`**: Skill score matrix, batch metrics, incremental metrics cache
//! - **`optimizer`**: Placeholder resolution (weighted greedy, optional annealing)
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling references)
//! - **`error`**: Configuration errors
//!
//! # Placeholders
//!
//! An assignment whose employee ID is `"placeholder"`, empty, or
//! `"placeholder <n>"` represents demand no one is booked against yet.
//! Placeholders never count as work done; the optimizer replaces them.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod error;
pub mod metrics;
pub mod models;
pub mod optimizer;
pub mod validation;
