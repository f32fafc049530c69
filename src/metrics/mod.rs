//! Allocation quality metrics.
//!
//! Three views over the same numbers:
//!
//! - **`skill_matrix`**: precomputed employee ↔ project compatibility
//! - **`batch`**: stateless overtime, utilization and skills-match over a snapshot
//! - **`incremental`**: a stateful cache that recomputes only what a mutation touched
//!
//! # Two proficiency scales
//!
//! The batch path and the skill matrix weigh proficiency 1/2/3 and report
//! skills as a total. The incremental cache weighs 0.4/0.7/1.0 and reports
//! an average percentage per project. Utilization differs too: batch divides
//! by the periods of the whole dataset (or a date range), the cache by each
//! employee's own active periods. The two are not interchangeable.

pub mod batch;
mod incremental;
mod skill_matrix;

pub use batch::{calculate_metrics, calculate_metrics_with, Metrics};
pub use incremental::MetricsCache;
pub use skill_matrix::{pair_score, SkillScoreMatrix};
