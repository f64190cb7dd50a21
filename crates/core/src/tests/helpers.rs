// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{StepApproval, WorkflowState, apply_transition};
use evalflow_audit::Actor;
use evalflow_domain::{EvaluationStage, StepApprovalStatus, StepKey};

pub const PERIOD_ID: i64 = 1;
pub const EMPLOYEE_ID: i64 = 10;
pub const EVALUATOR_ID: i64 = 20;
pub const NOW: &str = "2026-02-10T12:00:00Z";

pub fn create_test_actor() -> Actor {
    Actor::new(99, String::from("admin"))
}

pub fn criteria_key() -> StepKey {
    StepKey::new(PERIOD_ID, EMPLOYEE_ID, EvaluationStage::Criteria, None).unwrap()
}

pub fn self_key() -> StepKey {
    StepKey::new(PERIOD_ID, EMPLOYEE_ID, EvaluationStage::SelfEvaluation, None).unwrap()
}

pub fn primary_key() -> StepKey {
    StepKey::new(
        PERIOD_ID,
        EMPLOYEE_ID,
        EvaluationStage::Primary,
        Some(EVALUATOR_ID),
    )
    .unwrap()
}

pub fn secondary_key(evaluator_id: i64) -> StepKey {
    StepKey::new(
        PERIOD_ID,
        EMPLOYEE_ID,
        EvaluationStage::Secondary,
        Some(evaluator_id),
    )
    .unwrap()
}

pub fn empty_state() -> WorkflowState {
    WorkflowState::new(PERIOD_ID, EMPLOYEE_ID)
}

/// Builds a state holding one record per given `(key, status)` pair,
/// all at version 1.
pub fn state_with(steps: &[(StepKey, StepApprovalStatus)]) -> WorkflowState {
    let mut state = empty_state();
    for (key, status) in steps {
        state.steps.push(StepApproval {
            key: *key,
            status: *status,
            revision_comment: None,
            version: 1,
            updated_by: 99,
            updated_at: String::from(NOW),
        });
    }
    state
}

/// Applies a direct transition on an empty record with default options.
pub fn transition_fresh(
    state: &WorkflowState,
    key: StepKey,
    target: StepApprovalStatus,
    comment: Option<&str>,
) -> Result<crate::TransitionOutcome, evalflow_domain::WorkflowError> {
    apply_transition(
        state,
        key,
        target,
        comment,
        None,
        false,
        &create_test_actor(),
        NOW,
    )
}
