// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation units of work: upsert, target registration, submission,
//! and the combined submit-and-complete operation.
//!
//! The upsert coordinator's guarantee lives here: resolving a composite
//! content key to at most one live content row, inside one transaction,
//! across all three branches (no mapping, unlinked mapping, linked
//! mapping).

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use evalflow::TransitionOutcome;
use evalflow_audit::Actor;
use evalflow_domain::{
    EvaluationKey, EvaluationKind, StepApprovalStatus, StepKey, WorkflowError,
};
use tracing::{debug, info};

use crate::data_models::{NewEvaluation, NewStageMapping, StageMappingRow};
use crate::error::PersistenceError;
use crate::mutations::evaluation::{
    insert_evaluation_mysql, insert_evaluation_sqlite, insert_mapping_mysql,
    insert_mapping_sqlite, link_mapping_mysql, link_mapping_sqlite, set_submission_mysql,
    set_submission_sqlite, update_evaluation_content_mysql, update_evaluation_content_sqlite,
};
use crate::mutations::workflow::{resolve_recipient_mysql, resolve_recipient_sqlite};
use crate::queries::evaluation::{
    find_mapping_by_evaluation_mysql, find_mapping_by_evaluation_sqlite, find_mapping_mysql,
    find_mapping_sqlite, get_evaluation_mysql, get_evaluation_sqlite,
};
use crate::queries::revision::{
    find_open_recipient_by_key_mysql, find_open_recipient_by_key_sqlite,
};
use crate::queries::step_approval::{get_step_row_mysql, get_step_row_sqlite};

/// Builds the insert row for new evaluation content.
fn new_evaluation_row(
    key: &EvaluationKey,
    content: &str,
    score: f64,
    actor: &Actor,
    occurred_at: &str,
) -> NewEvaluation {
    NewEvaluation {
        kind: key.kind().as_str().to_string(),
        content: content.to_string(),
        score,
        is_completed: 0,
        updated_by: actor.id,
        updated_at: occurred_at.to_string(),
    }
}

/// Builds the insert row for a new stage mapping.
fn new_mapping_row(key: &EvaluationKey, evaluation_id: Option<i64>) -> NewStageMapping {
    NewStageMapping {
        period_id: key.period_id(),
        employee_id: key.employee_id(),
        kind: key.kind().as_str().to_string(),
        evaluator_id: key.evaluator_id(),
        project_id: key.project_id(),
        evaluation_id,
        is_editable: 1,
    }
}

/// Creates or updates the content row for a composite key — `SQLite`
/// version.
///
/// Returns the id of the (single) live content row for the key. The
/// submission flag is never touched by upsert.
///
/// # Errors
///
/// Returns an error if a write fails; partial writes are rolled back.
pub fn upsert_evaluation_sqlite(
    conn: &mut SqliteConnection,
    key: &EvaluationKey,
    content: &str,
    score: f64,
    actor: &Actor,
    occurred_at: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        let mapping: Option<StageMappingRow> = find_mapping_sqlite(
            conn,
            key.period_id(),
            key.employee_id(),
            key.kind().as_str(),
            key.evaluator_id(),
            key.project_id(),
        )?;

        let evaluation_id: i64 = match mapping {
            None => {
                let evaluation_id: i64 = insert_evaluation_sqlite(
                    conn,
                    &new_evaluation_row(key, content, score, actor, occurred_at),
                )?;
                insert_mapping_sqlite(conn, &new_mapping_row(key, Some(evaluation_id)))?;
                debug!(key = %key, evaluation_id, "Created mapping and content");
                evaluation_id
            }
            Some(mapping) => match mapping.evaluation_id {
                None => {
                    let evaluation_id: i64 = insert_evaluation_sqlite(
                        conn,
                        &new_evaluation_row(key, content, score, actor, occurred_at),
                    )?;
                    link_mapping_sqlite(conn, mapping.mapping_id, evaluation_id)?;
                    debug!(key = %key, evaluation_id, "Linked content to existing mapping");
                    evaluation_id
                }
                Some(evaluation_id) => {
                    update_evaluation_content_sqlite(
                        conn,
                        evaluation_id,
                        content,
                        score,
                        actor.id,
                        occurred_at,
                    )?;
                    debug!(key = %key, evaluation_id, "Updated content in place");
                    evaluation_id
                }
            },
        };

        Ok(evaluation_id)
    })
}

/// Creates or updates the content row for a composite key — `MySQL`
/// version.
///
/// Returns the id of the (single) live content row for the key. The
/// submission flag is never touched by upsert.
///
/// # Errors
///
/// Returns an error if a write fails; partial writes are rolled back.
pub fn upsert_evaluation_mysql(
    conn: &mut MysqlConnection,
    key: &EvaluationKey,
    content: &str,
    score: f64,
    actor: &Actor,
    occurred_at: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        let mapping: Option<StageMappingRow> = find_mapping_mysql(
            conn,
            key.period_id(),
            key.employee_id(),
            key.kind().as_str(),
            key.evaluator_id(),
            key.project_id(),
        )?;

        let evaluation_id: i64 = match mapping {
            None => {
                let evaluation_id: i64 = insert_evaluation_mysql(
                    conn,
                    &new_evaluation_row(key, content, score, actor, occurred_at),
                )?;
                insert_mapping_mysql(conn, &new_mapping_row(key, Some(evaluation_id)))?;
                debug!(key = %key, evaluation_id, "Created mapping and content");
                evaluation_id
            }
            Some(mapping) => match mapping.evaluation_id {
                None => {
                    let evaluation_id: i64 = insert_evaluation_mysql(
                        conn,
                        &new_evaluation_row(key, content, score, actor, occurred_at),
                    )?;
                    link_mapping_mysql(conn, mapping.mapping_id, evaluation_id)?;
                    debug!(key = %key, evaluation_id, "Linked content to existing mapping");
                    evaluation_id
                }
                Some(evaluation_id) => {
                    update_evaluation_content_mysql(
                        conn,
                        evaluation_id,
                        content,
                        score,
                        actor.id,
                        occurred_at,
                    )?;
                    debug!(key = %key, evaluation_id, "Updated content in place");
                    evaluation_id
                }
            },
        };

        Ok(evaluation_id)
    })
}

/// Registers an evaluation target: a mapping with no content yet —
/// `SQLite` version.
///
/// # Errors
///
/// Returns `DuplicateMapping` if a mapping already exists for the key.
pub fn create_evaluation_target_sqlite(
    conn: &mut SqliteConnection,
    key: &EvaluationKey,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        // Uniqueness is checked before insert; the index is the backstop
        if find_mapping_sqlite(
            conn,
            key.period_id(),
            key.employee_id(),
            key.kind().as_str(),
            key.evaluator_id(),
            key.project_id(),
        )?
        .is_some()
        {
            return Err(WorkflowError::DuplicateMapping {
                period_id: key.period_id(),
                employee_id: key.employee_id(),
                kind: key.kind().as_str().to_string(),
            }
            .into());
        }
        insert_mapping_sqlite(conn, &new_mapping_row(key, None))
    })
}

/// Registers an evaluation target: a mapping with no content yet —
/// `MySQL` version.
///
/// # Errors
///
/// Returns `DuplicateMapping` if a mapping already exists for the key.
pub fn create_evaluation_target_mysql(
    conn: &mut MysqlConnection,
    key: &EvaluationKey,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        // Uniqueness is checked before insert; the index is the backstop
        if find_mapping_mysql(
            conn,
            key.period_id(),
            key.employee_id(),
            key.kind().as_str(),
            key.evaluator_id(),
            key.project_id(),
        )?
        .is_some()
        {
            return Err(WorkflowError::DuplicateMapping {
                period_id: key.period_id(),
                employee_id: key.employee_id(),
                kind: key.kind().as_str().to_string(),
            }
            .into());
        }
        insert_mapping_mysql(conn, &new_mapping_row(key, None))
    })
}

/// Submits evaluation content — `SQLite` version.
///
/// Fails with `SubmissionLocked` while the gating step approval is
/// under revision; the combined submit-and-complete operation is the
/// only path through that gate.
///
/// # Errors
///
/// Returns an error if the evaluation or its mapping does not exist, or
/// the gate is locked.
pub fn submit_evaluation_sqlite(
    conn: &mut SqliteConnection,
    evaluation_id: i64,
    actor: &Actor,
    occurred_at: &str,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        if get_evaluation_sqlite(conn, evaluation_id)?.is_none() {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        }
        let Some(mapping) = find_mapping_by_evaluation_sqlite(conn, evaluation_id)? else {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        };

        let kind: EvaluationKind = mapping.kind.parse()?;
        if let Some(stage) = kind.approval_stage() {
            if let Some(step) = get_step_row_sqlite(
                conn,
                mapping.period_id,
                mapping.employee_id,
                stage.as_str(),
                mapping.evaluator_id,
            )? {
                let status: StepApprovalStatus = step.status.parse()?;
                if status == StepApprovalStatus::RevisionRequested {
                    return Err(WorkflowError::SubmissionLocked {
                        period_id: mapping.period_id,
                        employee_id: mapping.employee_id,
                        stage: stage.as_str().to_string(),
                    }
                    .into());
                }
            }
        }

        set_submission_sqlite(conn, evaluation_id, true, Some(occurred_at), actor.id, occurred_at)?;
        info!(evaluation_id, "Submitted evaluation");
        Ok(())
    })
}

/// Submits evaluation content — `MySQL` version.
///
/// Fails with `SubmissionLocked` while the gating step approval is
/// under revision; the combined submit-and-complete operation is the
/// only path through that gate.
///
/// # Errors
///
/// Returns an error if the evaluation or its mapping does not exist, or
/// the gate is locked.
pub fn submit_evaluation_mysql(
    conn: &mut MysqlConnection,
    evaluation_id: i64,
    actor: &Actor,
    occurred_at: &str,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        if get_evaluation_mysql(conn, evaluation_id)?.is_none() {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        }
        let Some(mapping) = find_mapping_by_evaluation_mysql(conn, evaluation_id)? else {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        };

        let kind: EvaluationKind = mapping.kind.parse()?;
        if let Some(stage) = kind.approval_stage() {
            if let Some(step) = get_step_row_mysql(
                conn,
                mapping.period_id,
                mapping.employee_id,
                stage.as_str(),
                mapping.evaluator_id,
            )? {
                let status: StepApprovalStatus = step.status.parse()?;
                if status == StepApprovalStatus::RevisionRequested {
                    return Err(WorkflowError::SubmissionLocked {
                        period_id: mapping.period_id,
                        employee_id: mapping.employee_id,
                        stage: stage.as_str().to_string(),
                    }
                    .into());
                }
            }
        }

        set_submission_mysql(conn, evaluation_id, true, Some(occurred_at), actor.id, occurred_at)?;
        info!(evaluation_id, "Submitted evaluation");
        Ok(())
    })
}

/// Resubmits content and closes the open revision in one transaction —
/// `SQLite` version.
///
/// The single user action that both sets the submission flag and
/// completes the recipient's revision response, bypassing the
/// `SubmissionLocked` gate.
///
/// # Errors
///
/// Returns an error if the evaluation or its mapping does not exist,
/// the content kind has no approval gate, the response comment is
/// blank, or no open revision addresses the recipient.
pub fn submit_and_complete_revision_sqlite(
    conn: &mut SqliteConnection,
    evaluation_id: i64,
    recipient_id: i64,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        if get_evaluation_sqlite(conn, evaluation_id)?.is_none() {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        }
        let Some(mapping) = find_mapping_by_evaluation_sqlite(conn, evaluation_id)? else {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        };

        let kind: EvaluationKind = mapping.kind.parse()?;
        let Some(stage) = kind.approval_stage() else {
            return Err(WorkflowError::OpenRevisionNotFound {
                period_id: mapping.period_id,
                employee_id: mapping.employee_id,
                stage: mapping.kind.clone(),
            }
            .into());
        };
        let key: StepKey = StepKey::new(
            mapping.period_id,
            mapping.employee_id,
            stage,
            mapping.evaluator_id,
        )?;

        set_submission_sqlite(conn, evaluation_id, true, Some(occurred_at), actor.id, occurred_at)?;

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

        let outcome: TransitionOutcome = resolve_recipient_sqlite(
            conn,
            &request,
            &recipient,
            response_comment,
            actor,
            occurred_at,
        )?;
        info!(evaluation_id, key = %key, "Resubmitted and completed revision");
        Ok(outcome)
    })
}

/// Resubmits content and closes the open revision in one transaction —
/// `MySQL` version.
///
/// # Errors
///
/// Returns an error if the evaluation or its mapping does not exist,
/// the content kind has no approval gate, the response comment is
/// blank, or no open revision addresses the recipient.
pub fn submit_and_complete_revision_mysql(
    conn: &mut MysqlConnection,
    evaluation_id: i64,
    recipient_id: i64,
    response_comment: &str,
    actor: &Actor,
    occurred_at: &str,
) -> Result<TransitionOutcome, PersistenceError> {
    conn.transaction(|conn| {
        if get_evaluation_mysql(conn, evaluation_id)?.is_none() {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        }
        let Some(mapping) = find_mapping_by_evaluation_mysql(conn, evaluation_id)? else {
            return Err(WorkflowError::EvaluationNotFound(evaluation_id).into());
        };

        let kind: EvaluationKind = mapping.kind.parse()?;
        let Some(stage) = kind.approval_stage() else {
            return Err(WorkflowError::OpenRevisionNotFound {
                period_id: mapping.period_id,
                employee_id: mapping.employee_id,
                stage: mapping.kind.clone(),
            }
            .into());
        };
        let key: StepKey = StepKey::new(
            mapping.period_id,
            mapping.employee_id,
            stage,
            mapping.evaluator_id,
        )?;

        set_submission_mysql(conn, evaluation_id, true, Some(occurred_at), actor.id, occurred_at)?;

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

        let outcome: TransitionOutcome = resolve_recipient_mysql(
            conn,
            &request,
            &recipient,
            response_comment,
            actor,
            occurred_at,
        )?;
        info!(evaluation_id, key = %key, "Resubmitted and completed revision");
        Ok(outcome)
    })
}
