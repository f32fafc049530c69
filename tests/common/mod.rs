//! Shared helpers for the cache integration and property tests.

use std::collections::BTreeSet;

use u_staffing::metrics::MetricsCache;
use u_staffing::models::Assignment;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn booking(id: &str, employee: &str, project: &str, hours: f64, week: &str) -> Assignment {
    Assignment::new(id, employee, project, hours).with_week(week)
}

/// Asserts two caches report the same aggregate and per-entity values for
/// every employee and project either of them knows or references.
pub fn assert_caches_agree(left: &mut MetricsCache, right: &mut MetricsCache) {
    assert_eq!(left.get_metrics(), right.get_metrics());

    let mut employee_ids = BTreeSet::new();
    let mut project_ids = BTreeSet::new();
    for snapshot in [left.snapshot(), right.snapshot()] {
        employee_ids.extend(snapshot.employees.iter().map(|e| e.id.clone()));
        project_ids.extend(snapshot.projects.iter().map(|p| p.id.clone()));
        for a in &snapshot.assignments {
            employee_ids.insert(a.employee_id.clone());
            project_ids.insert(a.project_id.clone());
        }
    }

    for id in &employee_ids {
        assert_eq!(
            left.employee_utilization(id),
            right.employee_utilization(id),
            "utilization of {id}"
        );
        assert_eq!(
            left.employee_overtime_by_period(id),
            right.employee_overtime_by_period(id),
            "overtime of {id}"
        );
    }
    for id in &project_ids {
        assert_eq!(
            left.project_skills_match(id),
            right.project_skills_match(id),
            "skills match of {id}"
        );
    }
}

/// Asserts `cache` agrees with a cache freshly initialized from its own state.
pub fn assert_matches_fresh(cache: &mut MetricsCache) {
    let mut fresh = MetricsCache::from_dataset(&cache.snapshot());
    assert_caches_agree(cache, &mut fresh);
}
