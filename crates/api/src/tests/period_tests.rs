// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for period management, the phase sweep, and projects.

use crate::request_response::CreatePeriodRequest;
use crate::tests::helpers::{
    create_period_in_criteria_phase, create_test_admin, create_test_persistence, days_from_now,
};
use crate::{ApiError, handlers};

#[test]
fn test_create_period_and_list() {
    let mut persistence = create_test_persistence();

    let response = handlers::create_period(
        &mut persistence,
        CreatePeriodRequest {
            name: String::from("  2026 First Half  "),
            criteria_deadline: days_from_now(10),
            self_deadline: days_from_now(20),
            evaluation_deadline: days_from_now(30),
        },
        &create_test_admin(),
    )
    .unwrap();

    let periods = handlers::list_periods(&mut persistence, &create_test_admin()).unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].period_id, response.period_id);
    // The boundary trims display names
    assert_eq!(periods[0].name, "2026 First Half");
    assert_eq!(periods[0].phase, "criteria_setup");
}

#[test]
fn test_create_period_rejects_blank_name() {
    let mut persistence = create_test_persistence();

    let result = handlers::create_period(
        &mut persistence,
        CreatePeriodRequest {
            name: String::from("   "),
            criteria_deadline: days_from_now(10),
            self_deadline: days_from_now(20),
            evaluation_deadline: days_from_now(30),
        },
        &create_test_admin(),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_create_period_rejects_unparseable_deadline() {
    let mut persistence = create_test_persistence();

    let result = handlers::create_period(
        &mut persistence,
        CreatePeriodRequest {
            name: String::from("Broken"),
            criteria_deadline: String::from("next Tuesday"),
            self_deadline: days_from_now(20),
            evaluation_deadline: days_from_now(30),
        },
        &create_test_admin(),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_create_period_rejects_misordered_deadlines() {
    let mut persistence = create_test_persistence();

    let result = handlers::create_period(
        &mut persistence,
        CreatePeriodRequest {
            name: String::from("Backwards"),
            criteria_deadline: days_from_now(30),
            self_deadline: days_from_now(20),
            evaluation_deadline: days_from_now(10),
        },
        &create_test_admin(),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_phase_sweep_advances_due_periods_once() {
    let mut persistence = create_test_persistence();

    let due = handlers::create_period(
        &mut persistence,
        CreatePeriodRequest {
            name: String::from("Past Criteria"),
            criteria_deadline: days_from_now(-1),
            self_deadline: days_from_now(30),
            evaluation_deadline: days_from_now(60),
        },
        &create_test_admin(),
    )
    .unwrap();
    let future_id: i64 = create_period_in_criteria_phase(&mut persistence);

    let sweep = handlers::run_phase_sweep(&mut persistence, &create_test_admin()).unwrap();
    assert_eq!(sweep.advanced_period_ids, vec![due.period_id]);

    // Idempotent: nothing left to advance
    let sweep = handlers::run_phase_sweep(&mut persistence, &create_test_admin()).unwrap();
    assert!(sweep.advanced_period_ids.is_empty());

    let periods = handlers::list_periods(&mut persistence, &create_test_admin()).unwrap();
    let phases: Vec<(i64, String)> = periods
        .into_iter()
        .map(|p| (p.period_id, p.phase))
        .collect();
    assert!(phases.contains(&(due.period_id, String::from("self_evaluation"))));
    assert!(phases.contains(&(future_id, String::from("criteria_setup"))));
}

#[test]
fn test_create_project_requires_existing_period() {
    let mut persistence = create_test_persistence();

    let result =
        handlers::create_project(&mut persistence, 404, "Orphan", &create_test_admin());
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_create_and_list_projects() {
    let mut persistence = create_test_persistence();
    let period_id: i64 = create_period_in_criteria_phase(&mut persistence);

    let project = handlers::create_project(
        &mut persistence,
        period_id,
        " Data Platform ",
        &create_test_admin(),
    )
    .unwrap();
    assert_eq!(project.name, "Data Platform");

    let projects =
        handlers::list_projects(&mut persistence, period_id, &create_test_admin()).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project_id, project.project_id);
}
