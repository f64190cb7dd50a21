// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow units of work: step transitions and revision completion.
//!
//! Each operation here loads the live workflow state, runs the pure core
//! engine, and executes the resulting writes — status rows, revision
//! fan-out, submission resets, audit events — inside one Diesel
//! transaction, so §4.1's atomicity holds: partial application is never
//! observable.
//!
//! The `_sqlite`/`_mysql` pairs are hand-duplicated because Diesel
//! transactions require a concrete connection type; both sides call the
//! same suffixed leaf helpers.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use evalflow::{SideEffect, TransitionOutcome, WorkflowState};
use evalflow_audit::Actor;
use evalflow_domain::{
    EvaluationStage, StepApprovalStatus, StepKey, WorkflowError, validate_response_comment,
};
use tracing::{debug, info};

use crate::data_models::{
    NewRecipient, NewRevisionRequest, NewTransitionEvent, RecipientRow, RevisionRequestRow,
    StageMappingRow,
};
use crate::error::PersistenceError;
use crate::mutations::audit::{
    event_to_row, insert_transition_events_mysql, insert_transition_events_sqlite,
};
use crate::mutations::evaluation::{
    set_mapping_editable_mysql, set_mapping_editable_sqlite, set_submission_mysql,
    set_submission_sqlite,
};
use crate::mutations::revision::{
    complete_recipient_mysql, complete_recipient_sqlite, insert_recipients_mysql,
    insert_recipients_sqlite, insert_request_mysql, insert_request_sqlite,
};
use crate::mutations::step_approval::{
    insert_step_mysql, insert_step_sqlite, update_step_mysql, update_step_sqlite,
};
use crate::queries::evaluation::{find_mapping_mysql, find_mapping_sqlite};
use crate::queries::revision::{
    find_open_recipient_by_key_mysql, find_open_recipient_by_key_sqlite, find_open_recipient_mysql,
    find_open_recipient_sqlite, get_request_mysql, get_request_sqlite,
};
use crate::queries::step_approval::{load_step_rows_mysql, load_step_rows_sqlite, rows_to_state};

/// Builds the step key of the revision request a recipient row belongs to.
fn request_step_key(request: &RevisionRequestRow) -> Result<StepKey, PersistenceError> {
    let stage: EvaluationStage = request.stage.parse()?;
    Ok(StepKey::new(
        request.period_id,
        request.employee_id,
        stage,
        request.evaluator_id,
    )?)
}

/// Applies a directly requested status transition — `SQLite` version.
///
/// # Errors
///
/// Returns an error if the core engine rejects the transition (invalid
/// target, missing comment, version mismatch) or a write fails; any
/// partial writes are rolled back.
#[allow(clippy::too_many_arguments)]
pub fn transition_step_sqlite(
    conn: &mut SqliteConnection,
    key: StepKey,
    target: StepApprovalStatus,
    comment: Option<&str>,
    expected_version: Option<i64>,
    cascade: bool,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        let state: WorkflowState = rows_to_state(
            key.period_id(),
            key.employee_id(),
            &load_step_rows_sqlite(conn, key.period_id(), key.employee_id())?,
        )?;

        let outcome: TransitionOutcome = evalflow::apply_transition(
            &state,
            key,
            target,
            comment,
            expected_version,
            cascade,
            actor,
            occurred_at,
        )?;

        persist_outcome_sqlite(conn, &state, &outcome, actor, occurred_at)?;

        info!(
            key = %key,
            target = target.as_str(),
            cascade,
            touched = outcome.events.len(),
            "Applied step transition"
        );
        Ok(outcome)
    })
}

/// Applies a directly requested status transition — `MySQL` version.
///
/// # Errors
///
/// Returns an error if the core engine rejects the transition (invalid
/// target, missing comment, version mismatch) or a write fails; any
/// partial writes are rolled back.
#[allow(clippy::too_many_arguments)]
pub fn transition_step_mysql(
    conn: &mut MysqlConnection,
    key: StepKey,
    target: StepApprovalStatus,
    comment: Option<&str>,
    expected_version: Option<i64>,
    cascade: bool,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        let state: WorkflowState = rows_to_state(
            key.period_id(),
            key.employee_id(),
            &load_step_rows_mysql(conn, key.period_id(), key.employee_id())?,
        )?;

        let outcome: TransitionOutcome = evalflow::apply_transition(
            &state,
            key,
            target,
            comment,
            expected_version,
            cascade,
            actor,
            occurred_at,
        )?;

        persist_outcome_mysql(conn, &state, &outcome, actor, occurred_at)?;

        info!(
            key = %key,
            target = target.as_str(),
            cascade,
            touched = outcome.events.len(),
            "Applied step transition"
        );
        Ok(outcome)
    })
}

/// Completes a recipient's revision response by request id — `SQLite`
/// version.
///
/// # Errors
///
/// Returns an error if the response comment is blank, the request does
/// not exist, or no un-completed recipient row matches.
pub fn complete_revision_sqlite(
    conn: &mut SqliteConnection,
    request_id: i64,
    recipient_id: i64,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        let Some(request) = get_request_sqlite(conn, request_id)? else {
            return Err(WorkflowError::RevisionRequestNotFound { request_id }.into());
        };
        let Some(recipient) = find_open_recipient_sqlite(conn, request_id, recipient_id)? else {
            return Err(WorkflowError::RecipientNotFound {
                request_id,
                recipient_id,
            }
            .into());
        };
        resolve_recipient_sqlite(conn, &request, &recipient, response_comment, actor, occurred_at)
    })
}

/// Completes a recipient's revision response by request id — `MySQL`
/// version.
///
/// # Errors
///
/// Returns an error if the response comment is blank, the request does
/// not exist, or no un-completed recipient row matches.
pub fn complete_revision_mysql(
    conn: &mut MysqlConnection,
    request_id: i64,
    recipient_id: i64,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        let Some(request) = get_request_mysql(conn, request_id)? else {
            return Err(WorkflowError::RevisionRequestNotFound { request_id }.into());
        };
        let Some(recipient) = find_open_recipient_mysql(conn, request_id, recipient_id)? else {
            return Err(WorkflowError::RecipientNotFound {
                request_id,
                recipient_id,
            }
            .into());
        };
        resolve_recipient_mysql(conn, &request, &recipient, response_comment, actor, occurred_at)
    })
}

/// Completes a recipient's revision response located by composite key —
/// `SQLite` version.
///
/// The lookup-first variant for callers that do not hold the request id:
/// the newest open request matching the step key is resolved, then the
/// same completion semantics apply.
///
/// # Errors
///
/// Returns an error if the response comment is blank or no open
/// revision addresses `recipient_id` on the given key.
pub fn complete_revision_by_key_sqlite(
    conn: &mut SqliteConnection,
    key: StepKey,
    recipient_id: i64,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        let Some((request, recipient)) = find_open_recipient_by_key_sqlite(
            conn,
            key.period_id(),
            key.employee_id(),
            key.stage().as_str(),
            key.evaluator_id(),
            recipient_id,
        )?
        else {
            return Err(WorkflowError::OpenRevisionNotFound {
                period_id: key.period_id(),
                employee_id: key.employee_id(),
                stage: key.stage().as_str().to_string(),
            }
            .into());
        };
        resolve_recipient_sqlite(conn, &request, &recipient, response_comment, actor, occurred_at)
    })
}

/// Completes a recipient's revision response located by composite key —
/// `MySQL` version.
///
/// # Errors
///
/// Returns an error if the response comment is blank or no open
/// revision addresses `recipient_id` on the given key.
pub fn complete_revision_by_key_mysql(
    conn: &mut MysqlConnection,
    key: StepKey,
    recipient_id: i64,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        let Some((request, recipient)) = find_open_recipient_by_key_mysql(
            conn,
            key.period_id(),
            key.employee_id(),
            key.stage().as_str(),
            key.evaluator_id(),
            recipient_id,
        )?
        else {
            return Err(WorkflowError::OpenRevisionNotFound {
                period_id: key.period_id(),
                employee_id: key.employee_id(),
                stage: key.stage().as_str().to_string(),
            }
            .into());
        };
        resolve_recipient_mysql(conn, &request, &recipient, response_comment, actor, occurred_at)
    })
}

/// Records a recipient's completion and resolves their step approval —
/// `SQLite` version.
///
/// Must be called inside an open transaction. This is the only path
/// that produces `revision_completed`.
pub(crate) fn resolve_recipient_sqlite(
    conn: &mut SqliteConnection,
    request: &RevisionRequestRow,
    recipient: &RecipientRow,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    validate_response_comment(response_comment)?;

    complete_recipient_sqlite(conn, recipient.recipient_row_id, occurred_at, response_comment)?;

    let key: StepKey = request_step_key(request)?;
    let state: WorkflowState = rows_to_state(
        key.period_id(),
        key.employee_id(),
        &load_step_rows_sqlite(conn, key.period_id(), key.employee_id())?,
    )?;
    let outcome: TransitionOutcome =
        evalflow::apply_revision_resolved(&state, key, actor, occurred_at)?;

    persist_outcome_sqlite(conn, &state, &outcome, actor, occurred_at)?;

    info!(
        request_id = request.request_id,
        recipient_id = recipient.recipient_id,
        key = %key,
        "Completed revision response"
    );
    Ok(outcome)
}

/// Records a recipient's completion and resolves their step approval —
/// `MySQL` version.
///
/// Must be called inside an open transaction. This is the only path
/// that produces `revision_completed`.
pub(crate) fn resolve_recipient_mysql(
    conn: &mut MysqlConnection,
    request: &RevisionRequestRow,
    recipient: &RecipientRow,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    validate_response_comment(response_comment)?;

    complete_recipient_mysql(conn, recipient.recipient_row_id, occurred_at, response_comment)?;

    let key: StepKey = request_step_key(request)?;
    let state: WorkflowState = rows_to_state(
        key.period_id(),
        key.employee_id(),
        &load_step_rows_mysql(conn, key.period_id(), key.employee_id())?,
    )?;
    let outcome: TransitionOutcome =
        evalflow::apply_revision_resolved(&state, key, actor, occurred_at)?;

    persist_outcome_mysql(conn, &state, &outcome, actor, occurred_at)?;

    info!(
        request_id = request.request_id,
        recipient_id = recipient.recipient_id,
        key = %key,
        "Completed revision response"
    );
    Ok(outcome)
}

/// Executes the writes a transition outcome prescribes — `SQLite`
/// version.
///
/// Touched step records are inserted (fresh) or overwritten (live), the
/// side effects open revision fan-outs and reset submission flags, and
/// one audit row is recorded per touched record. Must be called inside
/// an open transaction.
fn persist_outcome_sqlite(
    conn: &mut SqliteConnection,
    prior: &WorkflowState,
    outcome: &TransitionOutcome,
    actor: &Actor,
    occurred_at: &str,
) -> Result<(), PersistenceError> {
    for event in &outcome.events {
        let Some(step) = outcome.new_state.step(&event.key) else {
            return Err(PersistenceError::Other(format!(
                "Transition produced no record for touched key {}",
                event.key
            )));
        };
        if prior.step(&event.key).is_some() {
            update_step_sqlite(conn, step)?;
        } else {
            insert_step_sqlite(conn, step)?;
        }

        // Approval locks the bound content against further edits
        if event.to_status == StepApprovalStatus::Approved {
            if let Some(mapping) = mapping_for_key_sqlite(conn, &event.key)? {
                set_mapping_editable_sqlite(conn, mapping.mapping_id, false)?;
            }
        }
    }

    for effect in &outcome.side_effects {
        match effect {
            SideEffect::OpenRevision {
                key,
                comment,
                recipients,
            } => {
                let request_id: i64 = insert_request_sqlite(
                    conn,
                    &NewRevisionRequest {
                        period_id: key.period_id(),
                        employee_id: key.employee_id(),
                        stage: key.stage().as_str().to_string(),
                        evaluator_id: key.evaluator_id(),
                        comment: comment.clone(),
                        requested_by: actor.id,
                        requested_at: occurred_at.to_string(),
                    },
                )?;
                let rows: Vec<NewRecipient> = recipients
                    .iter()
                    .map(|(recipient_id, recipient_type)| NewRecipient {
                        request_id,
                        recipient_id: *recipient_id,
                        recipient_type: recipient_type.as_str().to_string(),
                        is_read: 0,
                        is_completed: 0,
                    })
                    .collect();
                insert_recipients_sqlite(conn, &rows)?;
                debug!(request_id, recipients = rows.len(), "Opened revision request");
            }
            SideEffect::ResetSubmission { key } => {
                if let Some(mapping) = mapping_for_key_sqlite(conn, key)? {
                    set_mapping_editable_sqlite(conn, mapping.mapping_id, true)?;
                    if let Some(evaluation_id) = mapping.evaluation_id {
                        set_submission_sqlite(
                            conn,
                            evaluation_id,
                            false,
                            None,
                            actor.id,
                            occurred_at,
                        )?;
                        debug!(evaluation_id, "Reset submission flag");
                    }
                }
            }
        }
    }

    let event_rows: Vec<NewTransitionEvent> = outcome.events.iter().map(event_to_row).collect();
    insert_transition_events_sqlite(conn, &event_rows)?;
    Ok(())
}

/// Executes the writes a transition outcome prescribes — `MySQL`
/// version.
///
/// Must be called inside an open transaction.
fn persist_outcome_mysql(
    conn: &mut MysqlConnection,
    prior: &WorkflowState,
    outcome: &TransitionOutcome,
    actor: &Actor,
    occurred_at: &str,
) -> Result<(), PersistenceError> {
    for event in &outcome.events {
        let Some(step) = outcome.new_state.step(&event.key) else {
            return Err(PersistenceError::Other(format!(
                "Transition produced no record for touched key {}",
                event.key
            )));
        };
        if prior.step(&event.key).is_some() {
            update_step_mysql(conn, step)?;
        } else {
            insert_step_mysql(conn, step)?;
        }

        // Approval locks the bound content against further edits
        if event.to_status == StepApprovalStatus::Approved {
            if let Some(mapping) = mapping_for_key_mysql(conn, &event.key)? {
                set_mapping_editable_mysql(conn, mapping.mapping_id, false)?;
            }
        }
    }

    for effect in &outcome.side_effects {
        match effect {
            SideEffect::OpenRevision {
                key,
                comment,
                recipients,
            } => {
                let request_id: i64 = insert_request_mysql(
                    conn,
                    &NewRevisionRequest {
                        period_id: key.period_id(),
                        employee_id: key.employee_id(),
                        stage: key.stage().as_str().to_string(),
                        evaluator_id: key.evaluator_id(),
                        comment: comment.clone(),
                        requested_by: actor.id,
                        requested_at: occurred_at.to_string(),
                    },
                )?;
                let rows: Vec<NewRecipient> = recipients
                    .iter()
                    .map(|(recipient_id, recipient_type)| NewRecipient {
                        request_id,
                        recipient_id: *recipient_id,
                        recipient_type: recipient_type.as_str().to_string(),
                        is_read: 0,
                        is_completed: 0,
                    })
                    .collect();
                insert_recipients_mysql(conn, &rows)?;
                debug!(request_id, recipients = rows.len(), "Opened revision request");
            }
            SideEffect::ResetSubmission { key } => {
                if let Some(mapping) = mapping_for_key_mysql(conn, key)? {
                    set_mapping_editable_mysql(conn, mapping.mapping_id, true)?;
                    if let Some(evaluation_id) = mapping.evaluation_id {
                        set_submission_mysql(
                            conn,
                            evaluation_id,
                            false,
                            None,
                            actor.id,
                            occurred_at,
                        )?;
                        debug!(evaluation_id, "Reset submission flag");
                    }
                }
            }
        }
    }

    let event_rows: Vec<NewTransitionEvent> = outcome.events.iter().map(event_to_row).collect();
    insert_transition_events_mysql(conn, &event_rows)?;
    Ok(())
}

/// Resolves the mapping row bound to a step key's content, if the stage
/// has a content kind and a mapping exists — `SQLite` version.
fn mapping_for_key_sqlite(
    conn: &mut SqliteConnection,
    key: &StepKey,
) -> Result<Option<StageMappingRow>, PersistenceError> {
    let Some(kind) = key.stage().content_kind() else {
        return Ok(None);
    };
    find_mapping_sqlite(
        conn,
        key.period_id(),
        key.employee_id(),
        kind.as_str(),
        key.evaluator_id(),
        None,
    )
}

/// Resolves the mapping row bound to a step key's content, if the stage
/// has a content kind and a mapping exists — `MySQL` version.
fn mapping_for_key_mysql(
    conn: &mut MysqlConnection,
    key: &StepKey,
) -> Result<Option<StageMappingRow>, PersistenceError> {
    let Some(kind) = key.stage().content_kind() else {
        return Ok(None);
    };
    find_mapping_mysql(
        conn,
        key.period_id(),
        key.employee_id(),
        kind.as_str(),
        key.evaluator_id(),
        None,
    )
}
