// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The step approval transition engine.
//!
//! Transitions are pure functions over a [`WorkflowState`] scoped to one
//! `(period, employee)` pair. Each successful call produces a
//! [`TransitionOutcome`] holding the new state, one audit event per
//! touched record, and the side-effect instructions the persistence
//! layer must execute in the same unit of work.

use crate::state::{SideEffect, StepApproval, TransitionOutcome, WorkflowState};
use evalflow_audit::{Actor, TransitionEvent};
use evalflow_domain::{
    StepApprovalStatus, StepKey, WorkflowError, validate_revision_comment,
};

/// Applies a directly requested status transition to a step approval key.
///
/// The record for `key` is created lazily if none exists. Transitioning
/// to `RevisionRequested` requires a non-empty comment and emits side
/// effects that open the revision request and reset the bound content's
/// submission flag. Approving with `cascade` additionally approves every
/// downstream record that is currently pending or revision-completed;
/// records with an open revision are left untouched.
///
/// Optimistic concurrency: `expected_version` must match the live
/// record's version. `None` is valid only while no record exists.
///
/// # Arguments
///
/// * `state` - The current workflow state (immutable)
/// * `key` - The step approval key to transition
/// * `target` - The requested status
/// * `comment` - The revision comment (required for `RevisionRequested`)
/// * `expected_version` - The version the caller last read, if any
/// * `cascade` - Whether an approval propagates downstream
/// * `actor` - The actor performing this transition
/// * `occurred_at` - When the transition occurred (RFC 3339)
///
/// # Errors
///
/// Returns an error if:
/// - `target` is `RevisionCompleted` (only revision completion may
///   produce it)
/// - The current status does not permit the transition
/// - The revision comment is missing or blank
/// - `expected_version` does not match the live record
#[allow(clippy::too_many_arguments)]
pub fn apply_transition(
    state: &WorkflowState,
    key: StepKey,
    target: StepApprovalStatus,
    comment: Option<&str>,
    expected_version: Option<i64>,
    cascade: bool,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, WorkflowError> {
    // Validate the comment before touching any state
    let revision_comment: Option<String> = if target == StepApprovalStatus::RevisionRequested {
        let comment = comment.unwrap_or_default();
        validate_revision_comment(comment)?;
        Some(comment.to_string())
    } else {
        None
    };

    let existing = state.step(&key);

    check_version(existing, expected_version)?;

    let from_status: Option<StepApprovalStatus> = existing.map(|s| s.status);
    from_status
        .unwrap_or_default()
        .validate_transition(target)?;

    let mut new_state: WorkflowState = state.clone();
    let version = existing.map_or(1, |s| s.version + 1);
    write_step(
        &mut new_state,
        StepApproval {
            key,
            status: target,
            revision_comment: revision_comment.clone(),
            version,
            updated_by: actor.id,
            updated_at: occurred_at.to_string(),
        },
    );

    let mut events: Vec<TransitionEvent> = vec![TransitionEvent::new(
        key,
        from_status,
        target,
        actor.clone(),
        occurred_at.to_string(),
    )];

    let mut side_effects: Vec<SideEffect> = Vec::new();
    if target == StepApprovalStatus::RevisionRequested {
        side_effects.push(SideEffect::OpenRevision {
            key,
            comment: revision_comment.unwrap_or_default(),
            recipients: key.revision_recipients(),
        });
        if key.stage().content_kind().is_some() {
            side_effects.push(SideEffect::ResetSubmission { key });
        }
    }

    if target == StepApprovalStatus::Approved && cascade {
        cascade_downstream(&mut new_state, &key, actor, occurred_at, &mut events);
    }

    Ok(TransitionOutcome {
        new_state,
        events,
        side_effects,
    })
}

/// Resolves an open revision on a step approval key to
/// `RevisionCompleted`.
///
/// This is the only path that produces `RevisionCompleted`; it is
/// invoked by the revision request registry when a recipient completes
/// their response. When multiple recipients share one step key, the
/// second resolution finds the record already completed and is a no-op.
///
/// # Arguments
///
/// * `state` - The current workflow state (immutable)
/// * `key` - The step approval key whose revision was answered
/// * `actor` - The recipient who completed the revision
/// * `occurred_at` - When the completion occurred (RFC 3339)
///
/// # Errors
///
/// Returns an error if:
/// - No record exists for `key`
/// - The record has no open revision and is not already completed
pub fn apply_revision_resolved(
    state: &WorkflowState,
    key: StepKey,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, WorkflowError> {
    let Some(existing) = state.step(&key) else {
        return Err(WorkflowError::StepApprovalNotFound {
            period_id: key.period_id(),
            employee_id: key.employee_id(),
            stage: key.stage().as_str().to_string(),
        });
    };

    // A second recipient resolving the same step key is a no-op
    if existing.status == StepApprovalStatus::RevisionCompleted {
        return Ok(TransitionOutcome {
            new_state: state.clone(),
            events: Vec::new(),
            side_effects: Vec::new(),
        });
    }

    existing.status.validate_revision_resolution()?;

    let from_status = existing.status;
    let mut new_state: WorkflowState = state.clone();
    write_step(
        &mut new_state,
        StepApproval {
            key,
            status: StepApprovalStatus::RevisionCompleted,
            // The revision comment stays until re-approval clears it
            revision_comment: existing.revision_comment.clone(),
            version: existing.version + 1,
            updated_by: actor.id,
            updated_at: occurred_at.to_string(),
        },
    );

    let events = vec![TransitionEvent::new(
        key,
        Some(from_status),
        StepApprovalStatus::RevisionCompleted,
        actor.clone(),
        occurred_at.to_string(),
    )];

    Ok(TransitionOutcome {
        new_state,
        events,
        side_effects: Vec::new(),
    })
}

/// Validates the caller's expected version against the live record.
fn check_version(
    existing: Option<&StepApproval>,
    expected_version: Option<i64>,
) -> Result<(), WorkflowError> {
    match existing {
        Some(step) => {
            if expected_version != Some(step.version) {
                return Err(WorkflowError::ConcurrentModification {
                    expected: expected_version,
                    actual: step.version,
                });
            }
        }
        None => {
            if let Some(expected) = expected_version {
                return Err(WorkflowError::ConcurrentModification {
                    expected: Some(expected),
                    actual: 0,
                });
            }
        }
    }
    Ok(())
}

/// Approves every downstream record eligible for cascade.
///
/// Cascade only touches records that already exist: lazy creation
/// happens on direct transitions, and the set of downward-stage keys is
/// unknowable without their records. Records with an open revision are
/// never overwritten.
fn cascade_downstream(
    new_state: &mut WorkflowState,
    key: &StepKey,
    actor: &Actor,
    occurred_at: &str,
    events: &mut Vec<TransitionEvent>,
) {
    for stage in key.stage().downstream() {
        let targets: Vec<StepApproval> = new_state
            .steps
            .iter()
            .filter(|s| s.key.stage() == stage && s.status.accepts_cascade())
            .cloned()
            .collect();

        for step in targets {
            let from_status = step.status;
            write_step(
                new_state,
                StepApproval {
                    key: step.key,
                    status: StepApprovalStatus::Approved,
                    revision_comment: None,
                    version: step.version + 1,
                    updated_by: actor.id,
                    updated_at: occurred_at.to_string(),
                },
            );
            events.push(TransitionEvent::new(
                step.key,
                Some(from_status),
                StepApprovalStatus::Approved,
                actor.clone(),
                occurred_at.to_string(),
            ));
        }
    }
}

/// Inserts or overwrites the record for a key in place.
fn write_step(state: &mut WorkflowState, step: StepApproval) {
    match state.steps.iter_mut().find(|s| s.key == step.key) {
        Some(slot) => *slot = step,
        None => state.steps.push(step),
    }
}
