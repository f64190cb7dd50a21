// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for evaluation period management, the phase sweep, and the
//! project registry.

use crate::tests::{seed_period, test_persistence};
use crate::{Persistence, PersistenceError};
use evalflow_domain::{PeriodPhase, WorkflowError};
use time::macros::datetime;

#[test]
fn test_new_period_starts_in_criteria_setup() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let phase: PeriodPhase = persistence.get_period_phase(period_id).unwrap();
    assert_eq!(phase, PeriodPhase::CriteriaSetup);

    let row = persistence.get_period(period_id).unwrap();
    assert_eq!(row.name, "2026 First Half");
    assert_eq!(row.criteria_deadline, "2026-02-01T00:00:00Z");
}

#[test]
fn test_get_unknown_period_fails() {
    let mut persistence: Persistence = test_persistence();

    let result = persistence.get_period(404);
    assert_eq!(
        result,
        Err(PersistenceError::Workflow(WorkflowError::PeriodNotFound(404)))
    );
}

#[test]
fn test_sweep_advances_past_due_periods() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    // Mid-February: the criteria deadline has passed
    let advanced = persistence
        .advance_due_periods(datetime!(2026-02-15 12:00 UTC))
        .unwrap();
    assert_eq!(advanced, vec![period_id]);
    assert_eq!(
        persistence.get_period_phase(period_id).unwrap(),
        PeriodPhase::SelfEvaluation
    );

    // Past every deadline: the period closes in one sweep
    let advanced = persistence
        .advance_due_periods(datetime!(2026-05-01 0:00 UTC))
        .unwrap();
    assert_eq!(advanced, vec![period_id]);
    assert_eq!(
        persistence.get_period_phase(period_id).unwrap(),
        PeriodPhase::Closed
    );
}

#[test]
fn test_sweep_is_idempotent() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let now = datetime!(2026-03-15 12:00 UTC);
    let first = persistence.advance_due_periods(now).unwrap();
    assert_eq!(first, vec![period_id]);

    // Re-invocation on an already-advanced period is a no-op
    let second = persistence.advance_due_periods(now).unwrap();
    assert!(second.is_empty());
}

#[test]
fn test_sweep_never_moves_a_period_backward() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    persistence
        .advance_due_periods(datetime!(2026-05-01 0:00 UTC))
        .unwrap();

    // A sweep with an earlier instant leaves the closed period alone
    let advanced = persistence
        .advance_due_periods(datetime!(2026-01-20 0:00 UTC))
        .unwrap();
    assert!(advanced.is_empty());
    assert_eq!(
        persistence.get_period_phase(period_id).unwrap(),
        PeriodPhase::Closed
    );
}

#[test]
fn test_sweep_touches_only_due_periods() {
    let mut persistence: Persistence = test_persistence();
    let due_id: i64 = seed_period(&mut persistence);
    let later_deadlines = evalflow_domain::PeriodDeadlines::new(
        datetime!(2026-08-01 0:00 UTC),
        datetime!(2026-09-01 0:00 UTC),
        datetime!(2026-10-01 0:00 UTC),
    )
    .unwrap();
    let future_id: i64 = persistence
        .create_period("2026 Second Half", &later_deadlines, "2026-01-15T00:00:00Z")
        .unwrap();

    let advanced = persistence
        .advance_due_periods(datetime!(2026-02-15 12:00 UTC))
        .unwrap();
    assert_eq!(advanced, vec![due_id]);
    assert_eq!(
        persistence.get_period_phase(future_id).unwrap(),
        PeriodPhase::CriteriaSetup
    );
}

#[test]
fn test_project_create_list_delete() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let first: i64 = persistence.create_project(period_id, "Data Platform").unwrap();
    let second: i64 = persistence.create_project(period_id, "Mobile App").unwrap();

    let projects = persistence.list_projects(period_id).unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].project_id, first);
    assert_eq!(projects[0].name, "Data Platform");

    persistence.delete_project(first).unwrap();
    let projects = persistence.list_projects(period_id).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project_id, second);
}

#[test]
fn test_delete_unknown_project_fails() {
    let mut persistence: Persistence = test_persistence();
    seed_period(&mut persistence);

    let result = persistence.delete_project(404);
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_project_requires_existing_period() {
    let mut persistence: Persistence = test_persistence();

    // Foreign key enforcement rejects a project on a missing period
    let result = persistence.create_project(404, "Orphan");
    assert!(result.is_err());
}
