// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.
//!
//! Periods are created with deadlines relative to the current instant
//! so the phase sweep lands them in the phase each test needs,
//! independent of when the test runs.

use evalflow_persistence::Persistence;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::request_response::{
    CreatePeriodRequest, SaveDownwardEvaluationRequest, SaveSelfEvaluationRequest,
    SubmitEvaluationRequest,
};
use crate::{AuthenticatedActor, Role, handlers};

pub const EMPLOYEE_ID: i64 = 10;
pub const EVALUATOR_ID: i64 = 20;
pub const OTHER_EVALUATOR_ID: i64 = 21;

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(1, Role::Admin)
}

pub fn create_test_employee() -> AuthenticatedActor {
    AuthenticatedActor::new(EMPLOYEE_ID, Role::Employee)
}

pub fn create_test_evaluator() -> AuthenticatedActor {
    AuthenticatedActor::new(EVALUATOR_ID, Role::Evaluator)
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

/// Formats an instant offset from now by whole days.
pub fn days_from_now(days: i64) -> String {
    (OffsetDateTime::now_utc() + Duration::days(days))
        .format(&Rfc3339)
        .expect("Failed to format timestamp")
}

/// Creates a period whose deadlines are all in the future: the period
/// sits in the criteria-setup phase.
pub fn create_period_in_criteria_phase(persistence: &mut Persistence) -> i64 {
    let response = handlers::create_period(
        persistence,
        CreatePeriodRequest {
            name: String::from("Criteria Phase Period"),
            criteria_deadline: days_from_now(10),
            self_deadline: days_from_now(20),
            evaluation_deadline: days_from_now(30),
        },
        &create_test_admin(),
    )
    .expect("Failed to create test period");
    response.period_id
}

/// Creates a period and sweeps it into the self-evaluation phase.
pub fn create_period_in_self_phase(persistence: &mut Persistence) -> i64 {
    let response = handlers::create_period(
        persistence,
        CreatePeriodRequest {
            name: String::from("Self Phase Period"),
            criteria_deadline: days_from_now(-1),
            self_deadline: days_from_now(30),
            evaluation_deadline: days_from_now(60),
        },
        &create_test_admin(),
    )
    .expect("Failed to create test period");
    handlers::run_phase_sweep(persistence, &create_test_admin())
        .expect("Failed to run phase sweep");
    response.period_id
}

/// Creates a period and sweeps it into the evaluation phase.
pub fn create_period_in_evaluation_phase(persistence: &mut Persistence) -> i64 {
    let response = handlers::create_period(
        persistence,
        CreatePeriodRequest {
            name: String::from("Evaluation Phase Period"),
            criteria_deadline: days_from_now(-2),
            self_deadline: days_from_now(-1),
            evaluation_deadline: days_from_now(30),
        },
        &create_test_admin(),
    )
    .expect("Failed to create test period");
    handlers::run_phase_sweep(persistence, &create_test_admin())
        .expect("Failed to run phase sweep");
    response.period_id
}

/// Saves and submits the standard employee's self-evaluation.
///
/// Requires a period in the self-evaluation phase. Returns the content
/// row id.
pub fn save_and_submit_self(persistence: &mut Persistence, period_id: i64) -> i64 {
    let saved = handlers::save_self_evaluation(
        persistence,
        SaveSelfEvaluationRequest {
            period_id,
            employee_id: EMPLOYEE_ID,
            content: String::from("Delivered the platform migration"),
            score: 82.0,
        },
        &create_test_employee(),
    )
    .expect("Failed to save self-evaluation");
    handlers::submit_evaluation(
        persistence,
        SubmitEvaluationRequest {
            evaluation_id: saved.evaluation_id,
        },
        &create_test_employee(),
    )
    .expect("Failed to submit self-evaluation");
    saved.evaluation_id
}

/// Saves and submits a primary downward evaluation by the standard
/// evaluator.
///
/// Requires a period in the evaluation phase. Returns the content row
/// id.
pub fn save_and_submit_primary(persistence: &mut Persistence, period_id: i64) -> i64 {
    let saved = handlers::save_downward_evaluation(
        persistence,
        SaveDownwardEvaluationRequest {
            period_id,
            employee_id: EMPLOYEE_ID,
            evaluator_id: EVALUATOR_ID,
            kind: String::from("primary"),
            content: String::from("Consistently strong delivery"),
            score: 88.0,
        },
        &create_test_evaluator(),
    )
    .expect("Failed to save downward evaluation");
    handlers::submit_evaluation(
        persistence,
        SubmitEvaluationRequest {
            evaluation_id: saved.evaluation_id,
        },
        &create_test_evaluator(),
    )
    .expect("Failed to submit downward evaluation");
    saved.evaluation_id
}
