// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the evaluation upsert coordinator and submission handling.

use crate::tests::{
    EMPLOYEE_ID, LATER, NOW, PRIMARY_EVALUATOR_ID, admin_actor, employee_actor, evaluator_actor,
    primary_content_key, primary_key, seed_period, seed_submitted_self_evaluation,
    self_content_key, self_key, test_persistence,
};
use crate::{Persistence, PersistenceError, RevisionRequestFilter};
use evalflow_domain::{EvaluationKey, EvaluationKind, StepApprovalStatus, WorkflowError};

#[test]
fn test_upsert_creates_mapping_and_content() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &self_content_key(period_id),
            "Shipped the reporting pipeline",
            78.5,
            &employee_actor(),
            NOW,
        )
        .unwrap();

    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.content, "Shipped the reporting pipeline");
    assert!((evaluation.score - 78.5).abs() < f64::EPSILON);
    assert_eq!(evaluation.is_completed, 0);

    let mapping = persistence
        .find_mapping(&self_content_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(mapping.evaluation_id, Some(evaluation_id));
    assert_eq!(mapping.is_editable, 1);
}

#[test]
fn test_upsert_twice_updates_in_place() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let first_id: i64 = persistence
        .upsert_evaluation(
            &self_content_key(period_id),
            "First draft",
            60.0,
            &employee_actor(),
            NOW,
        )
        .unwrap();
    let second_id: i64 = persistence
        .upsert_evaluation(
            &self_content_key(period_id),
            "Second draft",
            75.0,
            &employee_actor(),
            LATER,
        )
        .unwrap();

    // The second call never creates a second content row for the key
    assert_eq!(first_id, second_id);
    let mappings = persistence.list_mappings(period_id, EMPLOYEE_ID).unwrap();
    assert_eq!(mappings.len(), 1);

    let evaluation = persistence.get_evaluation(second_id).unwrap();
    assert_eq!(evaluation.content, "Second draft");
    assert_eq!(evaluation.updated_at, LATER);
}

#[test]
fn test_upsert_fills_registered_target() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let mapping_id: i64 = persistence
        .create_evaluation_target(&primary_content_key(period_id))
        .unwrap();
    let before = persistence
        .find_mapping(&primary_content_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(before.mapping_id, mapping_id);
    assert_eq!(before.evaluation_id, None);

    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &primary_content_key(period_id),
            "Strong delivery this half",
            88.0,
            &evaluator_actor(),
            NOW,
        )
        .unwrap();

    let after = persistence
        .find_mapping(&primary_content_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(after.mapping_id, mapping_id);
    assert_eq!(after.evaluation_id, Some(evaluation_id));
}

#[test]
fn test_duplicate_target_registration_fails() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    persistence
        .create_evaluation_target(&self_content_key(period_id))
        .unwrap();
    let result = persistence.create_evaluation_target(&self_content_key(period_id));

    assert_eq!(
        result,
        Err(PersistenceError::Workflow(WorkflowError::DuplicateMapping {
            period_id,
            employee_id: EMPLOYEE_ID,
            kind: String::from("self"),
        }))
    );
}

#[test]
fn test_project_scope_separates_peer_mappings() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let project_id: i64 = persistence.create_project(period_id, "Data Platform").unwrap();

    let scoped = EvaluationKey::new(
        period_id,
        EMPLOYEE_ID,
        EvaluationKind::Peer,
        Some(PRIMARY_EVALUATOR_ID),
        Some(project_id),
    )
    .unwrap();
    let unscoped = EvaluationKey::new(
        period_id,
        EMPLOYEE_ID,
        EvaluationKind::Peer,
        Some(PRIMARY_EVALUATOR_ID),
        None,
    )
    .unwrap();

    let scoped_id: i64 = persistence
        .upsert_evaluation(&scoped, "Great collaboration on the platform", 90.0, &evaluator_actor(), NOW)
        .unwrap();
    let unscoped_id: i64 = persistence
        .upsert_evaluation(&unscoped, "Solid peer overall", 85.0, &evaluator_actor(), NOW)
        .unwrap();

    // Distinct keys, distinct rows
    assert_ne!(scoped_id, unscoped_id);
    assert_eq!(
        persistence.list_mappings(period_id, EMPLOYEE_ID).unwrap().len(),
        2
    );
}

#[test]
fn test_submit_sets_completion() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &self_content_key(period_id),
            "Ready to submit",
            70.0,
            &employee_actor(),
            NOW,
        )
        .unwrap();
    persistence
        .submit_evaluation(evaluation_id, &employee_actor(), LATER)
        .unwrap();

    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.is_completed, 1);
    assert_eq!(evaluation.completed_at.as_deref(), Some(LATER));
}

#[test]
fn test_upsert_does_not_touch_submission_flag() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let evaluation_id: i64 = seed_submitted_self_evaluation(&mut persistence, period_id);

    persistence
        .upsert_evaluation(
            &self_content_key(period_id),
            "Polished wording",
            82.0,
            &employee_actor(),
            LATER,
        )
        .unwrap();

    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.is_completed, 1);
}

#[test]
fn test_submit_locked_while_revision_open() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let evaluation_id: i64 = seed_submitted_self_evaluation(&mut persistence, period_id);

    persistence
        .transition_step(
            self_key(period_id),
            StepApprovalStatus::RevisionRequested,
            Some("rework the summary"),
            None,
            false,
            &admin_actor(),
            NOW,
        )
        .unwrap();

    // Plain resubmission is gated; only submit-and-complete passes
    let result = persistence.submit_evaluation(evaluation_id, &employee_actor(), LATER);
    assert_eq!(
        result,
        Err(PersistenceError::Workflow(WorkflowError::SubmissionLocked {
            period_id,
            employee_id: EMPLOYEE_ID,
            stage: String::from("self"),
        }))
    );

    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.is_completed, 0);
}

#[test]
fn test_submit_and_complete_revision() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let evaluation_id: i64 = seed_submitted_self_evaluation(&mut persistence, period_id);

    persistence
        .transition_step(
            self_key(period_id),
            StepApprovalStatus::RevisionRequested,
            Some("rework the summary"),
            None,
            false,
            &admin_actor(),
            NOW,
        )
        .unwrap();

    persistence
        .submit_and_complete_revision(evaluation_id, EMPLOYEE_ID, "fixed", &employee_actor(), LATER)
        .unwrap();

    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.is_completed, 1);
    assert_eq!(evaluation.completed_at.as_deref(), Some(LATER));

    let request = persistence
        .list_revision_requests(&RevisionRequestFilter::default())
        .unwrap()
        .remove(0);
    assert_eq!(request.1.is_completed, 1);
    assert_eq!(request.1.response_comment.as_deref(), Some("fixed"));

    let row = persistence
        .get_step_approval(&self_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "revision_completed");
}

#[test]
fn test_submit_and_complete_without_open_revision_rolls_back() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &self_content_key(period_id),
            "No revision was requested",
            65.0,
            &employee_actor(),
            NOW,
        )
        .unwrap();

    let result = persistence.submit_and_complete_revision(
        evaluation_id,
        EMPLOYEE_ID,
        "nothing to answer",
        &employee_actor(),
        LATER,
    );
    assert!(matches!(
        result,
        Err(PersistenceError::Workflow(
            WorkflowError::OpenRevisionNotFound { .. }
        ))
    ));

    // The submission half of the combined operation must roll back too
    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.is_completed, 0);
}

#[test]
fn test_submit_unknown_evaluation_fails() {
    let mut persistence: Persistence = test_persistence();
    seed_period(&mut persistence);

    let result = persistence.submit_evaluation(404, &employee_actor(), NOW);
    assert_eq!(
        result,
        Err(PersistenceError::Workflow(WorkflowError::EvaluationNotFound(
            404
        )))
    );
}

#[test]
fn test_final_evaluation_has_no_gate() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let key = EvaluationKey::new(period_id, EMPLOYEE_ID, EvaluationKind::Final, None, None).unwrap();
    let evaluation_id: i64 = persistence
        .upsert_evaluation(&key, "Meets expectations overall", 80.0, &admin_actor(), NOW)
        .unwrap();

    // No approval stage exists for final content; submission is ungated
    persistence
        .submit_evaluation(evaluation_id, &admin_actor(), LATER)
        .unwrap();
    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.is_completed, 1);
}

#[test]
fn test_primary_content_reset_on_revision() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &primary_content_key(period_id),
            "Initial downward evaluation",
            72.0,
            &evaluator_actor(),
            NOW,
        )
        .unwrap();
    persistence
        .submit_evaluation(evaluation_id, &evaluator_actor(), NOW)
        .unwrap();

    persistence
        .transition_step(
            primary_key(period_id),
            StepApprovalStatus::RevisionRequested,
            Some("the score needs justification"),
            None,
            false,
            &admin_actor(),
            LATER,
        )
        .unwrap();

    let evaluation = persistence.get_evaluation(evaluation_id).unwrap();
    assert_eq!(evaluation.is_completed, 0);
}
