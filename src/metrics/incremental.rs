//! Incrementally maintained metrics.
//!
//! [`MetricsCache`] owns a copy of the dataset, indexes assignments by
//! employee and by project, and caches per-entity results. Mutations only
//! mark the touched employees and projects dirty; the next read recomputes
//! those entities from their own index slice and aggregates.
//!
//! # Per-entity formulas
//!
//! These deliberately differ from [`super::batch`]:
//!
//! | Entity | Cached value |
//! |--------|-------------|
//! | Employee overtime | period → max(0, period hours − max hours), positive periods only |
//! | Employee utilization | min(100, 100 × hours / (max hours × max(1, own periods))) |
//! | Project skills match | 100 if nothing is required, 0 if nobody is assigned, else mean over distinct assigned employees of Σ fraction / required × 100 |
//!
//! Skills here use the fractional proficiency scale (0.4 / 0.7 / 1.0).
//!
//! # Concurrency
//! Single writer. Wrap in a `Mutex` if it must be shared.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::batch::{round_metric, Metrics};
use crate::models::{
    is_placeholder_id, Assignment, AssignmentPatch, Dataset, Employee, PeriodKey, Project,
};
use crate::validation;

/// Stateful, incrementally recomputed metrics over a mutable assignment set.
#[derive(Debug, Clone, Default)]
pub struct MetricsCache {
    employees: HashMap<String, Employee>,
    projects: HashMap<String, Project>,
    assignments: HashMap<String, Assignment>,
    by_employee: HashMap<String, BTreeSet<String>>,
    by_project: HashMap<String, BTreeSet<String>>,
    overtime_by_employee: BTreeMap<String, BTreeMap<PeriodKey, f64>>,
    utilization_by_employee: BTreeMap<String, f64>,
    skills_by_project: BTreeMap<String, f64>,
    dirty_employees: HashSet<String>,
    dirty_projects: HashSet<String>,
}

impl MetricsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache initialized from a snapshot.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut cache = Self::new();
        cache.initialize(&dataset.employees, &dataset.projects, &dataset.assignments);
        cache
    }

    /// Rebuilds every index and cached value from scratch.
    pub fn initialize(
        &mut self,
        employees: &[Employee],
        projects: &[Project],
        assignments: &[Assignment],
    ) {
        if cfg!(debug_assertions) {
            validation::log_findings("cache initialize", employees, projects, assignments);
        }

        *self = Self::default();
        self.employees = employees.iter().map(|e| (e.id.clone(), e.clone())).collect();
        self.projects = projects.iter().map(|p| (p.id.clone(), p.clone())).collect();
        // Repeated IDs resolve like repeated `add` calls: the last record wins.
        for assignment in assignments {
            self.detach(&assignment.id);
            self.attach(assignment.clone());
        }

        // Every entity is recomputed, including those without assignments.
        let employee_ids: Vec<String> = self.employees.keys().cloned().collect();
        for id in &employee_ids {
            self.recompute_employee(id);
        }
        let project_ids: Vec<String> = self.projects.keys().cloned().collect();
        for id in &project_ids {
            self.recompute_project(id);
        }
        self.dirty_employees.clear();
        self.dirty_projects.clear();

        log::debug!(
            "cache initialized: employees={} projects={} assignments={}",
            self.employees.len(),
            self.projects.len(),
            self.assignments.len()
        );
    }

    /// Adds an assignment. An existing assignment with the same ID is replaced.
    pub fn add(&mut self, assignment: Assignment) {
        debug_assert!(assignment.hours >= 0.0, "negative hours on {}", assignment.id);
        self.detach(&assignment.id);
        self.attach(assignment);
    }

    /// Removes an assignment. Returns `false` if the ID is unknown.
    pub fn remove(&mut self, assignment_id: &str) -> bool {
        self.detach(assignment_id).is_some()
    }

    /// Applies partial changes to an assignment. Returns `false` if the ID is unknown.
    ///
    /// The old version is detached (marking its employee and project dirty)
    /// before the new version is attached (marking the new ones dirty).
    pub fn update(&mut self, assignment_id: &str, patch: &AssignmentPatch) -> bool {
        let Some(mut assignment) = self.detach(assignment_id) else {
            return false;
        };
        assignment.apply(patch);
        debug_assert!(assignment.hours >= 0.0, "negative hours on {}", assignment.id);
        self.attach(assignment);
        true
    }

    /// Inserts or replaces an employee record.
    pub fn upsert_employee(&mut self, employee: Employee) {
        let id = employee.id.clone();
        self.employees.insert(id.clone(), employee);
        self.mark_employee_and_projects(&id);
    }

    /// Removes an employee record. Their assignments stay, now dangling.
    pub fn remove_employee(&mut self, employee_id: &str) -> bool {
        let removed = self.employees.remove(employee_id).is_some();
        if removed {
            self.mark_employee_and_projects(employee_id);
        }
        removed
    }

    /// Inserts or replaces a project record.
    pub fn upsert_project(&mut self, project: Project) {
        self.dirty_projects.insert(project.id.clone());
        self.projects.insert(project.id.clone(), project);
    }

    /// Removes a project record. Its assignments stay, now dangling.
    pub fn remove_project(&mut self, project_id: &str) -> bool {
        let removed = self.projects.remove(project_id).is_some();
        if removed {
            self.dirty_projects.insert(project_id.to_string());
        }
        removed
    }

    /// Recomputes dirty entities and returns the aggregate metrics.
    ///
    /// - overtime: sum over every cached employee-period value
    /// - utilization: mean of per-employee percentages
    /// - skills: mean of per-project percentages, unstaffed projects counting as 0
    pub fn get_metrics(&mut self) -> Metrics {
        self.refresh();

        let overtime: f64 = self
            .overtime_by_employee
            .values()
            .flat_map(BTreeMap::values)
            .sum();

        Metrics {
            overtime_hours: round_metric(overtime),
            resource_utilization: round_metric(mean(self.utilization_by_employee.values())),
            skills_matching: round_metric(mean(self.skills_by_project.values())),
        }
    }

    /// Recomputes every dirty entity and clears dirty tracking.
    pub fn refresh(&mut self) {
        if !self.is_dirty() {
            return;
        }

        let employees: Vec<String> = self.dirty_employees.drain().collect();
        let projects: Vec<String> = self.dirty_projects.drain().collect();
        log::debug!(
            "cache refresh: dirty_employees={} dirty_projects={}",
            employees.len(),
            projects.len()
        );

        for id in &employees {
            self.recompute_employee(id);
        }
        for id in &projects {
            self.recompute_project(id);
        }
    }

    /// Whether any cached value is stale.
    pub fn is_dirty(&self) -> bool {
        !self.dirty_employees.is_empty() || !self.dirty_projects.is_empty()
    }

    /// Number of assignments currently held.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Assignment by ID.
    pub fn assignment(&self, assignment_id: &str) -> Option<&Assignment> {
        self.assignments.get(assignment_id)
    }

    /// Snapshot of the current state, in ID order.
    pub fn snapshot(&self) -> Dataset {
        let mut employees: Vec<Employee> = self.employees.values().cloned().collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        let mut projects: Vec<Project> = self.projects.values().cloned().collect();
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        let mut assignments: Vec<Assignment> = self.assignments.values().cloned().collect();
        assignments.sort_by(|a, b| a.id.cmp(&b.id));
        Dataset::new(employees, projects, assignments)
    }

    /// Total overtime of one employee across their periods.
    pub fn employee_overtime(&mut self, employee_id: &str) -> f64 {
        self.refresh();
        self.overtime_by_employee
            .get(employee_id)
            .map(|periods| periods.values().sum())
            .unwrap_or(0.0)
    }

    /// Overtime per period for one employee (positive periods only).
    pub fn employee_overtime_by_period(&mut self, employee_id: &str) -> BTreeMap<PeriodKey, f64> {
        self.refresh();
        self.overtime_by_employee
            .get(employee_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Utilization percentage of one employee, if known.
    pub fn employee_utilization(&mut self, employee_id: &str) -> Option<f64> {
        self.refresh();
        self.utilization_by_employee.get(employee_id).copied()
    }

    /// Skills-match percentage of one project, if known.
    pub fn project_skills_match(&mut self, project_id: &str) -> Option<f64> {
        self.refresh();
        self.skills_by_project.get(project_id).copied()
    }

    fn attach(&mut self, assignment: Assignment) {
        self.by_employee
            .entry(assignment.employee_id.clone())
            .or_default()
            .insert(assignment.id.clone());
        self.by_project
            .entry(assignment.project_id.clone())
            .or_default()
            .insert(assignment.id.clone());
        self.dirty_employees.insert(assignment.employee_id.clone());
        self.dirty_projects.insert(assignment.project_id.clone());
        self.assignments.insert(assignment.id.clone(), assignment);
    }

    fn detach(&mut self, assignment_id: &str) -> Option<Assignment> {
        let assignment = self.assignments.remove(assignment_id)?;
        remove_from_index(&mut self.by_employee, &assignment.employee_id, assignment_id);
        remove_from_index(&mut self.by_project, &assignment.project_id, assignment_id);
        self.dirty_employees.insert(assignment.employee_id.clone());
        self.dirty_projects.insert(assignment.project_id.clone());
        Some(assignment)
    }

    fn mark_employee_and_projects(&mut self, employee_id: &str) {
        self.dirty_employees.insert(employee_id.to_string());
        if let Some(ids) = self.by_employee.get(employee_id) {
            for id in ids {
                if let Some(a) = self.assignments.get(id) {
                    self.dirty_projects.insert(a.project_id.clone());
                }
            }
        }
    }

    fn employee_assignments(&self, employee_id: &str) -> impl Iterator<Item = &Assignment> {
        self.by_employee
            .get(employee_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.assignments.get(id))
    }

    fn project_assignments(&self, project_id: &str) -> impl Iterator<Item = &Assignment> {
        self.by_project
            .get(project_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.assignments.get(id))
    }

    fn recompute_employee(&mut self, employee_id: &str) {
        let max_hours = match self.employees.get(employee_id) {
            Some(e) if !is_placeholder_id(employee_id) => e.max_hours,
            _ => {
                self.overtime_by_employee.remove(employee_id);
                self.utilization_by_employee.remove(employee_id);
                return;
            }
        };

        let mut period_hours: BTreeMap<PeriodKey, f64> = BTreeMap::new();
        for a in self.employee_assignments(employee_id) {
            *period_hours.entry(a.period_key()).or_insert(0.0) += a.hours;
        }

        let overtime: BTreeMap<PeriodKey, f64> = period_hours
            .iter()
            .filter_map(|(period, &hours)| {
                let over = hours - max_hours;
                (over > 0.0).then(|| (period.clone(), over))
            })
            .collect();
        if overtime.is_empty() {
            self.overtime_by_employee.remove(employee_id);
        } else {
            self.overtime_by_employee.insert(employee_id.to_string(), overtime);
        }

        let total: f64 = period_hours.values().sum();
        let capacity = max_hours * period_hours.len().max(1) as f64;
        let utilization = if capacity > 0.0 {
            (100.0 * total / capacity).min(100.0)
        } else {
            0.0
        };
        self.utilization_by_employee
            .insert(employee_id.to_string(), utilization);
    }

    fn recompute_project(&mut self, project_id: &str) {
        let Some(project) = self.projects.get(project_id) else {
            self.skills_by_project.remove(project_id);
            return;
        };

        let value = if project.required_skills.is_empty() {
            100.0
        } else {
            let staffed: BTreeSet<&str> = self
                .project_assignments(project_id)
                .filter(|a| !a.is_placeholder())
                .map(|a| a.employee_id.as_str())
                .filter(|id| self.employees.contains_key(*id))
                .collect();

            if staffed.is_empty() {
                0.0
            } else {
                let required = project.required_skills.len() as f64;
                let sum: f64 = staffed
                    .iter()
                    .filter_map(|id| self.employees.get(*id))
                    .map(|e| {
                        let coverage: f64 = project
                            .required_skills
                            .iter()
                            .filter_map(|s| e.proficiency(s))
                            .map(|level| level.fraction())
                            .sum();
                        coverage / required * 100.0
                    })
                    .sum();
                sum / staffed.len() as f64
            }
        };

        self.skills_by_project.insert(project_id.to_string(), value);
    }
}

fn remove_from_index(
    index: &mut HashMap<String, BTreeSet<String>>,
    key: &str,
    assignment_id: &str,
) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(assignment_id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

fn mean<'a>(values: impl ExactSizeIterator<Item = &'a f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProficiencyLevel::{Beginner, Expert, Intermediate};

    fn booking(id: &str, employee: &str, project: &str, hours: f64, week: &str) -> Assignment {
        Assignment::new(id, employee, project, hours).with_week(week)
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                Employee::new("E1", 40.0)
                    .with_skill("rust", Expert)
                    .with_skill("sql", Beginner),
                Employee::new("E2", 20.0).with_skill("rust", Intermediate),
            ],
            vec![
                Project::new("P1")
                    .with_required_skill("rust")
                    .with_required_skill("sql"),
                Project::new("P2"),
            ],
            vec![
                booking("A1", "E1", "P1", 30.0, "W1"),
                booking("A2", "E1", "P2", 20.0, "W1"),
                booking("A3", "E2", "P1", 10.0, "W2"),
            ],
        )
    }

    #[test]
    fn test_initialize_metrics() {
        let mut cache = MetricsCache::from_dataset(&sample());
        assert!(!cache.is_dirty());

        // E1: W1 = 50h vs 40 → 10h overtime.
        assert!((cache.employee_overtime("E1") - 10.0).abs() < 1e-10);
        // E1: min(100, 50/40) = 100; E2: 10/20 = 50.
        assert_eq!(cache.employee_utilization("E1"), Some(100.0));
        assert_eq!(cache.employee_utilization("E2"), Some(50.0));
        // P1: E1 (1.0 + 0.4)/2 = 70, E2 (0.7 + 0)/2 = 35 → 52.5. P2: 100.
        assert!((cache.project_skills_match("P1").unwrap() - 52.5).abs() < 1e-10);
        assert_eq!(cache.project_skills_match("P2"), Some(100.0));

        let m = cache.get_metrics();
        assert_eq!(m.overtime_hours, 10);
        assert_eq!(m.resource_utilization, 75);
        assert_eq!(m.skills_matching, 76); // (52.5 + 100) / 2 = 76.25
    }

    #[test]
    fn test_mutations_are_deferred() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.add(booking("A4", "E2", "P2", 30.0, "W2"));
        assert!(cache.is_dirty());

        let m = cache.get_metrics();
        assert!(!cache.is_dirty());
        // E2 W2: 40h vs 20 → +20.
        assert_eq!(m.overtime_hours, 30);
    }

    #[test]
    fn test_update_moves_between_employees() {
        let mut cache = MetricsCache::from_dataset(&sample());
        assert!(cache.update("A2", &AssignmentPatch::employee("E2")));

        // E1 no longer over capacity; E2 now has 20h in W1.
        assert!((cache.employee_overtime("E1") - 0.0).abs() < 1e-10);
        assert!(cache.employee_overtime_by_period("E1").is_empty());
        assert_eq!(cache.employee_utilization("E1"), Some(75.0));
        // E2: W1 20 + W2 10 over 2 periods of 20 → 75.
        assert_eq!(cache.employee_utilization("E2"), Some(75.0));
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut cache = MetricsCache::from_dataset(&sample());
        assert!(!cache.update("nope", &AssignmentPatch::hours(1.0)));
        assert!(!cache.remove("nope"));
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_remove_last_staffing_zeroes_project() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.remove("A1");
        cache.remove("A3");
        assert_eq!(cache.project_skills_match("P1"), Some(0.0));
        assert_eq!(cache.assignment_count(), 1);
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.add(booking("A1", "E2", "P2", 5.0, "W1"));
        assert_eq!(cache.assignment_count(), 3);
        assert_eq!(cache.assignment("A1").unwrap().employee_id, "E2");
        assert!((cache.employee_overtime("E1") - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_placeholders_not_scored() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.add(Assignment::placeholder("A9", "P1", 200.0).with_week("W1"));

        let m = cache.get_metrics();
        assert_eq!(m.overtime_hours, 10);
        assert!((cache.project_skills_match("P1").unwrap() - 52.5).abs() < 1e-10);
        assert_eq!(cache.employee_utilization("placeholder"), None);
    }

    #[test]
    fn test_dangling_references() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.add(booking("A9", "ghost", "nowhere", 99.0, "W1"));
        let m = cache.get_metrics();
        assert_eq!(m.overtime_hours, 10);
        assert_eq!(cache.employee_utilization("ghost"), None);
        assert_eq!(cache.project_skills_match("nowhere"), None);
    }

    #[test]
    fn test_upsert_employee_dirties_projects() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.upsert_employee(
            Employee::new("E2", 20.0)
                .with_skill("rust", Expert)
                .with_skill("sql", Expert),
        );

        // E2 now covers P1 fully: (70 + 100) / 2 = 85.
        assert!((cache.project_skills_match("P1").unwrap() - 85.0).abs() < 1e-10);
    }

    #[test]
    fn test_remove_employee_leaves_dangling() {
        let mut cache = MetricsCache::from_dataset(&sample());
        assert!(cache.remove_employee("E1"));
        assert_eq!(cache.employee_utilization("E1"), None);
        assert!((cache.employee_overtime("E1") - 0.0).abs() < 1e-10);
        // Only E2 remains on P1: 35.
        assert!((cache.project_skills_match("P1").unwrap() - 35.0).abs() < 1e-10);
        assert!(!cache.remove_employee("E1"));
    }

    #[test]
    fn test_project_upsert_and_remove() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.upsert_project(Project::new("P2").with_required_skill("rust"));
        // P2 now requires rust; E1 (Expert) is the only one staffed.
        assert_eq!(cache.project_skills_match("P2"), Some(100.0));

        cache.upsert_project(Project::new("P3").with_required_skill("go"));
        assert_eq!(cache.project_skills_match("P3"), Some(0.0));

        assert!(cache.remove_project("P3"));
        assert_eq!(cache.project_skills_match("P3"), None);
    }

    #[test]
    fn test_zero_capacity_employee() {
        let mut cache = MetricsCache::new();
        cache.initialize(
            &[Employee::new("E1", 0.0)],
            &[],
            &[booking("A1", "E1", "P1", 5.0, "W1")],
        );
        assert_eq!(cache.employee_utilization("E1"), Some(0.0));
        assert!((cache.employee_overtime("E1") - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_cache() {
        let mut cache = MetricsCache::new();
        assert_eq!(cache.get_metrics(), Metrics::default());
    }

    #[test]
    fn test_get_metrics_idempotent() {
        let mut cache = MetricsCache::from_dataset(&sample());
        cache.update("A3", &AssignmentPatch::hours(17.3));
        let first = cache.get_metrics();
        let second = cache.get_metrics();
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_order() {
        let cache = MetricsCache::from_dataset(&sample());
        let snap = cache.snapshot();
        let ids: Vec<&str> = snap.assignments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
    }

    #[test]
    fn test_initialize_repeated_id_last_wins() {
        let employees = vec![Employee::new("E1", 20.0), Employee::new("E2", 20.0)];
        let projects = vec![Project::new("P1")];
        let assignments = vec![
            booking("A1", "E1", "P1", 30.0, "W1"),
            booking("A1", "E2", "P1", 30.0, "W1"),
        ];

        let mut initialized = MetricsCache::new();
        initialized.initialize(&employees, &projects, &assignments);

        let mut added = MetricsCache::new();
        added.initialize(&employees, &projects, &[]);
        for a in &assignments {
            added.add(a.clone());
        }

        assert_eq!(initialized.assignment_count(), 1);
        assert_eq!(initialized.assignment("A1").unwrap().employee_id, "E2");
        assert!((initialized.employee_overtime("E1") - 0.0).abs() < 1e-10);
        assert!((initialized.employee_overtime("E2") - 10.0).abs() < 1e-10);
        assert_eq!(initialized.get_metrics(), added.get_metrics());
        assert_eq!(
            initialized.get_metrics(),
            MetricsCache::from_dataset(&initialized.snapshot()).get_metrics()
        );

        // The stale E1 entry must not survive a later removal either.
        assert!(initialized.remove("A1"));
        assert_eq!(initialized.get_metrics().overtime_hours, 0);
    }
}
