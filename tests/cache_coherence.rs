//! Integration tests: incremental cache against fresh rebuilds, the batch
//! calculator, and optimizer output applied back into the cache.

mod common;

use chrono::NaiveDate;
use common::{assert_caches_agree, assert_matches_fresh, booking, init_logging};
use u_staffing::metrics::{calculate_metrics, MetricsCache};
use u_staffing::models::ProficiencyLevel::{Expert, Intermediate};
use u_staffing::models::{Assignment, AssignmentPatch, Dataset, Employee, PeriodKey, Project};
use u_staffing::optimizer::PlaceholderOptimizer;

fn team() -> Dataset {
    Dataset::new(
        vec![
            Employee::new("E1", 40.0).with_skill("rust", Expert),
            Employee::new("E2", 40.0).with_skill("sql", Intermediate),
            Employee::new("E3", 20.0),
        ],
        vec![
            Project::new("P1").with_required_skill("rust"),
            Project::new("P2").with_required_skill("sql"),
            Project::new("P3"),
        ],
        vec![
            booking("A1", "E1", "P1", 30.0, "W1"),
            booking("A2", "E2", "P2", 20.0, "W1"),
            booking("A3", "E3", "P3", 10.0, "W2"),
        ],
    )
}

/// Repeated assignment IDs in `initialize` resolve like repeated `add` calls.
#[test]
fn initialize_with_repeated_ids_matches_adds() {
    init_logging();
    let ds = team();
    let mut with_repeats = ds.clone();
    with_repeats
        .assignments
        .push(booking("A1", "E2", "P2", 30.0, "W1"));

    let mut initialized = MetricsCache::from_dataset(&with_repeats);
    let mut added = MetricsCache::from_dataset(&ds);
    added.add(booking("A1", "E2", "P2", 30.0, "W1"));

    assert_caches_agree(&mut initialized, &mut added);
    assert_matches_fresh(&mut initialized);
}

/// Any sequence of mutations ends in the state a fresh initialize would build.
#[test]
fn mutation_sequence_matches_fresh_initialize() {
    init_logging();
    let mut cache = MetricsCache::from_dataset(&team());

    cache.add(booking("A4", "E1", "P1", 20.0, "W1"));
    assert_matches_fresh(&mut cache);

    assert!(cache.update("A2", &AssignmentPatch::employee("E1")));
    assert_matches_fresh(&mut cache);

    assert!(cache.update("A3", &AssignmentPatch::project("P2")));
    assert!(cache.update("A4", &AssignmentPatch::hours(5.0)));
    assert_matches_fresh(&mut cache);

    assert!(cache.remove("A1"));
    assert!(!cache.remove("A1"));
    assert_matches_fresh(&mut cache);

    cache.add(Assignment::placeholder("S1", "P1", 8.0).with_week("W3"));
    assert_matches_fresh(&mut cache);
    assert_eq!(cache.assignment_count(), 4);
}

/// Reading twice without mutations returns identical results.
#[test]
fn reads_are_idempotent() {
    init_logging();
    let mut cache = MetricsCache::from_dataset(&team());
    cache.add(booking("A4", "E2", "P1", 25.0, "W1"));

    let first = cache.get_metrics();
    assert!(!cache.is_dirty());
    assert_eq!(first, cache.get_metrics());
    assert_eq!(cache.project_skills_match("P1"), cache.project_skills_match("P1"));
}

/// The cache and the batch calculator use different formulas on purpose.
#[test]
fn cache_and_batch_diverge_on_same_data() {
    init_logging();
    let ds = Dataset::new(
        vec![
            Employee::new("E1", 40.0).with_skill("rust", Expert),
            Employee::new("E2", 40.0),
        ],
        vec![Project::new("P1").with_required_skill("rust")],
        vec![
            booking("A1", "E1", "P1", 20.0, "W1"),
            booking("A2", "E1", "P1", 20.0, "W2"),
            booking("A3", "E2", "P1", 10.0, "W1"),
        ],
    );

    let batch = calculate_metrics(&ds, None);
    // 50 / (80 × 2) = 31.25%; pairs (E1,P1)=3 + (E2,P1)=0.
    assert_eq!(batch.resource_utilization, 31);
    assert_eq!(batch.skills_matching, 3);
    assert_eq!(batch.overtime_hours, 0);

    let cached = MetricsCache::from_dataset(&ds).get_metrics();
    // mean(E1 50%, E2 25%) = 37.5; P1 = mean(100%, 0%).
    assert_eq!(cached.resource_utilization, 38);
    assert_eq!(cached.skills_matching, 50);
    assert_eq!(cached.overtime_hours, 0);
}

/// Dated assignments fall into the ISO week of their date in both paths.
#[test]
fn dated_assignments_share_a_week() {
    init_logging();
    let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    let ds = Dataset::new(
        vec![Employee::new("E1", 40.0)],
        vec![Project::new("P1")],
        vec![
            Assignment::new("A1", "E1", "P1", 30.0).with_date(monday),
            Assignment::new("A2", "E1", "P1", 30.0).with_date(wednesday),
        ],
    );

    assert_eq!(calculate_metrics(&ds, None).overtime_hours, 20);

    let mut cache = MetricsCache::from_dataset(&ds);
    let by_period = cache.employee_overtime_by_period("E1");
    assert_eq!(by_period.len(), 1);
    assert!((by_period[&PeriodKey::week_of(monday)] - 20.0).abs() < 1e-10);
    assert!((cache.employee_overtime("E1") - 20.0).abs() < 1e-10);
}

/// Changing an employee's skills recomputes every project they work on.
#[test]
fn employee_upsert_refreshes_projects() {
    init_logging();
    let mut cache = MetricsCache::from_dataset(&team());
    assert!((cache.project_skills_match("P2").unwrap() - 70.0).abs() < 1e-10);

    cache.upsert_employee(Employee::new("E2", 40.0).with_skill("sql", Expert));
    assert!(cache.is_dirty());
    assert!((cache.project_skills_match("P2").unwrap() - 100.0).abs() < 1e-10);
    assert_matches_fresh(&mut cache);
}

/// Suggestions applied as patches reproduce the optimizer's predicted metrics.
#[test]
fn applied_suggestions_match_prediction() {
    init_logging();
    let mut ds = team();
    ds.assignments
        .push(Assignment::placeholder("S1", "P1", 8.0).with_week("W1"));
    ds.assignments
        .push(Assignment::placeholder("S2", "P2", 8.0).with_week("W1"));

    let result = PlaceholderOptimizer::new().optimize(&ds, None);
    let picks: Vec<&str> = result
        .suggestions
        .iter()
        .map(|s| s.suggested_employee_id.as_str())
        .collect();
    assert_eq!(picks, vec!["E1", "E2"]);

    let mut cache = MetricsCache::from_dataset(&ds);
    for s in &result.suggestions {
        assert!(cache.update(&s.placeholder_id, &s.to_patch()));
    }

    let applied = cache.snapshot();
    assert_eq!(applied.placeholders().count(), 0);
    assert_eq!(calculate_metrics(&applied, None), result.metrics.predicted);
    assert_matches_fresh(&mut cache);
}
