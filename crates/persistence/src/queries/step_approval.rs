// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step approval record queries.
//!
//! This module loads the live step approval rows for a `(period, employee)`
//! scope and assembles them into the in-memory [`WorkflowState`] the core
//! transition engine operates on.

use crate::data_models::StepApprovalRow;
use crate::diesel_schema::step_approvals;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use evalflow::{StepApproval, WorkflowState};
use evalflow_domain::{EvaluationStage, StepApprovalStatus, StepKey};

backend_fn! {

/// Load all live step approval rows for a `(period, employee)` scope.
///
/// # Backend-agnostic
///
/// This function uses Diesel DSL exclusively.
pub fn load_step_rows(
    conn: &mut _,
    period_id: i64,
    employee_id: i64,
) -> Result<Vec<StepApprovalRow>, PersistenceError> {
    step_approvals::table
        .filter(step_approvals::period_id.eq(period_id))
        .filter(step_approvals::employee_id.eq(employee_id))
        .order(step_approvals::step_approval_id.asc())
        .load::<StepApprovalRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_step_rows: {e}")))
}

}

backend_fn! {

/// Load the step approval row for one exact key, if it exists.
pub fn get_step_row(
    conn: &mut _,
    period_id: i64,
    employee_id: i64,
    stage: &str,
    evaluator_id: Option<i64>,
) -> Result<Option<StepApprovalRow>, PersistenceError> {
    let query = step_approvals::table
        .filter(step_approvals::period_id.eq(period_id))
        .filter(step_approvals::employee_id.eq(employee_id))
        .filter(step_approvals::stage.eq(stage))
        .into_boxed();

    let query = match evaluator_id {
        Some(evaluator_id) => query.filter(step_approvals::evaluator_id.eq(evaluator_id)),
        None => query.filter(step_approvals::evaluator_id.is_null()),
    };

    query
        .first::<StepApprovalRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_step_row: {e}")))
}

}

/// Converts one step approval row into its domain record.
///
/// # Errors
///
/// Returns an error if the persisted stage or status string does not
/// parse, or the stage/evaluator combination violates key validation.
pub fn row_to_step(row: &StepApprovalRow) -> Result<StepApproval, PersistenceError> {
    let stage: EvaluationStage = row.stage.parse()?;
    let status: StepApprovalStatus = row.status.parse()?;
    let key: StepKey = StepKey::new(row.period_id, row.employee_id, stage, row.evaluator_id)?;

    Ok(StepApproval {
        key,
        status,
        revision_comment: row.revision_comment.clone(),
        version: row.version,
        updated_by: row.updated_by,
        updated_at: row.updated_at.clone(),
    })
}

/// Assembles loaded rows into the workflow state for one scope.
///
/// # Errors
///
/// Returns an error if any row fails domain conversion.
pub fn rows_to_state(
    period_id: i64,
    employee_id: i64,
    rows: &[StepApprovalRow],
) -> Result<WorkflowState, PersistenceError> {
    let mut state: WorkflowState = WorkflowState::new(period_id, employee_id);
    for row in rows {
        state.steps.push(row_to_step(row)?);
    }
    Ok(state)
}
