// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod period_tests;
mod revision_tests;
mod upsert_tests;

use crate::Persistence;
use evalflow_audit::Actor;
use evalflow_domain::{
    EvaluationKey, EvaluationKind, EvaluationStage, PeriodDeadlines, StepKey,
};
use time::macros::datetime;

pub const EMPLOYEE_ID: i64 = 10;
pub const PRIMARY_EVALUATOR_ID: i64 = 20;
pub const SECONDARY_EVALUATOR_ID: i64 = 21;
pub const NOW: &str = "2026-02-10T12:00:00Z";
pub const LATER: &str = "2026-02-11T09:30:00Z";

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn admin_actor() -> Actor {
    Actor::new(99, String::from("admin"))
}

pub fn employee_actor() -> Actor {
    Actor::new(EMPLOYEE_ID, String::from("employee"))
}

pub fn evaluator_actor() -> Actor {
    Actor::new(PRIMARY_EVALUATOR_ID, String::from("evaluator"))
}

pub fn test_deadlines() -> PeriodDeadlines {
    PeriodDeadlines::new(
        datetime!(2026-02-01 0:00 UTC),
        datetime!(2026-03-01 0:00 UTC),
        datetime!(2026-04-01 0:00 UTC),
    )
    .expect("Valid test deadlines")
}

/// Creates a period with the standard test deadlines and returns its id.
pub fn seed_period(persistence: &mut Persistence) -> i64 {
    persistence
        .create_period("2026 First Half", &test_deadlines(), "2026-01-15T00:00:00Z")
        .expect("Failed to create test period")
}

pub fn criteria_key(period_id: i64) -> StepKey {
    StepKey::new(period_id, EMPLOYEE_ID, EvaluationStage::Criteria, None).unwrap()
}

pub fn self_key(period_id: i64) -> StepKey {
    StepKey::new(period_id, EMPLOYEE_ID, EvaluationStage::SelfEvaluation, None).unwrap()
}

pub fn primary_key(period_id: i64) -> StepKey {
    StepKey::new(
        period_id,
        EMPLOYEE_ID,
        EvaluationStage::Primary,
        Some(PRIMARY_EVALUATOR_ID),
    )
    .unwrap()
}

pub fn secondary_key(period_id: i64, evaluator_id: i64) -> StepKey {
    StepKey::new(
        period_id,
        EMPLOYEE_ID,
        EvaluationStage::Secondary,
        Some(evaluator_id),
    )
    .unwrap()
}

pub fn self_content_key(period_id: i64) -> EvaluationKey {
    EvaluationKey::new(
        period_id,
        EMPLOYEE_ID,
        EvaluationKind::SelfEvaluation,
        None,
        None,
    )
    .unwrap()
}

pub fn primary_content_key(period_id: i64) -> EvaluationKey {
    EvaluationKey::new(
        period_id,
        EMPLOYEE_ID,
        EvaluationKind::Primary,
        Some(PRIMARY_EVALUATOR_ID),
        None,
    )
    .unwrap()
}

/// Saves and submits a self-evaluation, returning the content row id.
pub fn seed_submitted_self_evaluation(persistence: &mut Persistence, period_id: i64) -> i64 {
    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &self_content_key(period_id),
            "Delivered the migration project",
            82.0,
            &employee_actor(),
            NOW,
        )
        .expect("Failed to save self-evaluation");
    persistence
        .submit_evaluation(evaluation_id, &employee_actor(), NOW)
        .expect("Failed to submit self-evaluation");
    evaluation_id
}
