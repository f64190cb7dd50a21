// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the revision request registry: read tracking, completion,
//! the composite-key completion variant, and the read model.

use crate::tests::{
    EMPLOYEE_ID, LATER, NOW, PRIMARY_EVALUATOR_ID, admin_actor, employee_actor, evaluator_actor,
    primary_key, seed_period, self_key, test_persistence,
};
use crate::{Persistence, PersistenceError, RevisionRequestFilter};
use evalflow_domain::{EvaluationStage, StepApprovalStatus, WorkflowError};

/// Opens a revision on the self stage and returns the request id.
fn open_self_revision(persistence: &mut Persistence, period_id: i64) -> i64 {
    persistence
        .transition_step(
            self_key(period_id),
            StepApprovalStatus::RevisionRequested,
            Some("please expand on the first goal"),
            None,
            false,
            &admin_actor(),
            NOW,
        )
        .unwrap();
    persistence
        .list_revision_requests(&RevisionRequestFilter::default())
        .unwrap()
        .remove(0)
        .0
        .request_id
}

#[test]
fn test_mark_read_is_idempotent() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let request_id: i64 = open_self_revision(&mut persistence, period_id);

    let first: bool = persistence
        .mark_revision_read(request_id, EMPLOYEE_ID, NOW)
        .unwrap();
    assert!(first);

    // The second call is a no-op and must not move read_at
    let second: bool = persistence
        .mark_revision_read(request_id, EMPLOYEE_ID, LATER)
        .unwrap();
    assert!(!second);

    let recipients = persistence.list_revision_recipients(request_id).unwrap();
    assert_eq!(recipients[0].is_read, 1);
    assert_eq!(recipients[0].read_at.as_deref(), Some(NOW));
}

#[test]
fn test_unread_count_tracks_reads() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let request_id: i64 = open_self_revision(&mut persistence, period_id);

    assert_eq!(persistence.unread_count(EMPLOYEE_ID).unwrap(), 1);

    persistence
        .mark_revision_read(request_id, EMPLOYEE_ID, NOW)
        .unwrap();
    assert_eq!(persistence.unread_count(EMPLOYEE_ID).unwrap(), 0);
}

#[test]
fn test_complete_resolves_step_to_revision_completed() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let request_id: i64 = open_self_revision(&mut persistence, period_id);

    persistence
        .complete_revision(request_id, EMPLOYEE_ID, "expanded it", &employee_actor(), LATER)
        .unwrap();

    let recipients = persistence.list_revision_recipients(request_id).unwrap();
    assert_eq!(recipients[0].is_completed, 1);
    assert_eq!(recipients[0].completed_at.as_deref(), Some(LATER));
    assert_eq!(recipients[0].response_comment.as_deref(), Some("expanded it"));

    let row = persistence
        .get_step_approval(&self_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "revision_completed");
}

#[test]
fn test_complete_unknown_request_fails() {
    let mut persistence: Persistence = test_persistence();
    seed_period(&mut persistence);

    let result =
        persistence.complete_revision(404, EMPLOYEE_ID, "done", &employee_actor(), NOW);
    assert_eq!(
        result,
        Err(PersistenceError::Workflow(
            WorkflowError::RevisionRequestNotFound { request_id: 404 }
        ))
    );
}

#[test]
fn test_complete_unknown_recipient_fails() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let request_id: i64 = open_self_revision(&mut persistence, period_id);

    // The self-stage request addresses the evaluatee only
    let result = persistence.complete_revision(
        request_id,
        PRIMARY_EVALUATOR_ID,
        "done",
        &evaluator_actor(),
        NOW,
    );
    assert_eq!(
        result,
        Err(PersistenceError::Workflow(WorkflowError::RecipientNotFound {
            request_id,
            recipient_id: PRIMARY_EVALUATOR_ID,
        }))
    );
}

#[test]
fn test_complete_twice_fails_on_second_call() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let request_id: i64 = open_self_revision(&mut persistence, period_id);

    persistence
        .complete_revision(request_id, EMPLOYEE_ID, "done", &employee_actor(), NOW)
        .unwrap();

    // The recipient row is now completed; there is nothing left to match
    let result =
        persistence.complete_revision(request_id, EMPLOYEE_ID, "again", &employee_actor(), LATER);
    assert!(matches!(
        result,
        Err(PersistenceError::Workflow(
            WorkflowError::RecipientNotFound { .. }
        ))
    ));
}

#[test]
fn test_blank_response_comment_leaves_recipient_open() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let request_id: i64 = open_self_revision(&mut persistence, period_id);

    let result = persistence.complete_revision(request_id, EMPLOYEE_ID, "  ", &employee_actor(), NOW);
    assert_eq!(
        result,
        Err(PersistenceError::Workflow(
            WorkflowError::BlankResponseComment
        ))
    );

    let recipients = persistence.list_revision_recipients(request_id).unwrap();
    assert_eq!(recipients[0].is_completed, 0);

    let row = persistence
        .get_step_approval(&self_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "revision_requested");
}

#[test]
fn test_each_recipient_completion_is_independent() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    persistence
        .transition_step(
            primary_key(period_id),
            StepApprovalStatus::RevisionRequested,
            Some("rebalance the scores"),
            None,
            false,
            &admin_actor(),
            NOW,
        )
        .unwrap();
    let request_id: i64 = persistence
        .list_revision_requests(&RevisionRequestFilter::default())
        .unwrap()
        .remove(0)
        .0
        .request_id;

    // The evaluatee responds first; the step resolves
    persistence
        .complete_revision(request_id, EMPLOYEE_ID, "noted", &employee_actor(), NOW)
        .unwrap();
    let row = persistence
        .get_step_approval(&primary_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "revision_completed");

    // The evaluator's own completion still succeeds as a no-op resolution
    persistence
        .complete_revision(
            request_id,
            PRIMARY_EVALUATOR_ID,
            "re-affirmed",
            &evaluator_actor(),
            LATER,
        )
        .unwrap();

    // The parent request is fully handled once every recipient completed
    let recipients = persistence.list_revision_recipients(request_id).unwrap();
    assert!(recipients.iter().all(|r| r.is_completed == 1));
}

#[test]
fn test_complete_by_composite_key() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    persistence
        .transition_step(
            primary_key(period_id),
            StepApprovalStatus::RevisionRequested,
            Some("rebalance the scores"),
            None,
            false,
            &admin_actor(),
            NOW,
        )
        .unwrap();

    // The evaluator holds no request id; the composite key locates it
    persistence
        .complete_revision_by_key(
            primary_key(period_id),
            PRIMARY_EVALUATOR_ID,
            "rebalanced",
            &evaluator_actor(),
            LATER,
        )
        .unwrap();

    let row = persistence
        .get_step_approval(&primary_key(period_id))
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "revision_completed");
}

#[test]
fn test_complete_by_key_without_open_revision_fails() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);

    let result = persistence.complete_revision_by_key(
        self_key(period_id),
        EMPLOYEE_ID,
        "nothing open",
        &employee_actor(),
        NOW,
    );
    assert_eq!(
        result,
        Err(PersistenceError::Workflow(
            WorkflowError::OpenRevisionNotFound {
                period_id,
                employee_id: EMPLOYEE_ID,
                stage: String::from("self"),
            }
        ))
    );
}

#[test]
fn test_listings_respect_filters() {
    let mut persistence: Persistence = test_persistence();
    let period_id: i64 = seed_period(&mut persistence);
    let request_id: i64 = open_self_revision(&mut persistence, period_id);

    persistence
        .transition_step(
            primary_key(period_id),
            StepApprovalStatus::RevisionRequested,
            Some("rework"),
            None,
            false,
            &admin_actor(),
            NOW,
        )
        .unwrap();

    // The employee sees both requests; the evaluator only the primary one
    let employee_inbox = persistence
        .list_revision_requests_for_recipient(EMPLOYEE_ID, &RevisionRequestFilter::default())
        .unwrap();
    assert_eq!(employee_inbox.len(), 2);

    let evaluator_inbox = persistence
        .list_revision_requests_for_recipient(
            PRIMARY_EVALUATOR_ID,
            &RevisionRequestFilter::default(),
        )
        .unwrap();
    assert_eq!(evaluator_inbox.len(), 1);
    assert_eq!(evaluator_inbox[0].0.stage, "primary");

    // Stage filter narrows the employee's view
    let filter = RevisionRequestFilter {
        stage: Some(EvaluationStage::SelfEvaluation),
        ..RevisionRequestFilter::default()
    };
    let self_only = persistence
        .list_revision_requests_for_recipient(EMPLOYEE_ID, &filter)
        .unwrap();
    assert_eq!(self_only.len(), 1);
    assert_eq!(self_only[0].0.request_id, request_id);

    // Completing drops the row from the open-only view
    persistence
        .complete_revision(request_id, EMPLOYEE_ID, "done", &employee_actor(), LATER)
        .unwrap();
    let open_filter = RevisionRequestFilter {
        only_open: true,
        ..RevisionRequestFilter::default()
    };
    let open_rows = persistence
        .list_revision_requests_for_recipient(EMPLOYEE_ID, &open_filter)
        .unwrap();
    assert_eq!(open_rows.len(), 1);
    assert_eq!(open_rows[0].0.stage, "primary");
}
