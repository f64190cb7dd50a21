// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step approval record leaf mutations.
//!
//! Exactly one live row exists per key; re-transitioning overwrites in
//! place. The workflow unit of work decides between insert and update
//! based on the record version produced by the core engine.

use crate::data_models::NewStepApproval;
use crate::diesel_schema::step_approvals;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use evalflow::StepApproval;

backend_fn! {

/// Insert a freshly created step approval record.
///
/// # Backend-agnostic
///
/// This function uses Diesel DSL exclusively.
pub fn insert_step(
    conn: &mut _,
    step: &StepApproval,
) -> Result<(), PersistenceError> {
    let record = NewStepApproval {
        period_id: step.key.period_id(),
        employee_id: step.key.employee_id(),
        stage: step.key.stage().as_str().to_string(),
        evaluator_id: step.key.evaluator_id(),
        status: step.status.as_str().to_string(),
        revision_comment: step.revision_comment.clone(),
        version: step.version,
        updated_by: step.updated_by,
        updated_at: step.updated_at.clone(),
    };

    diesel::insert_into(step_approvals::table)
        .values(&record)
        .execute(conn)?;
    Ok(())
}

}

backend_fn! {

/// Overwrite the live step approval record for a key in place.
pub fn update_step(
    conn: &mut _,
    step: &StepApproval,
) -> Result<(), PersistenceError> {
    let target = step_approvals::table
        .select(step_approvals::step_approval_id)
        .filter(step_approvals::period_id.eq(step.key.period_id()))
        .filter(step_approvals::employee_id.eq(step.key.employee_id()))
        .filter(step_approvals::stage.eq(step.key.stage().as_str()))
        .into_boxed();

    let target = match step.key.evaluator_id() {
        Some(evaluator_id) => target.filter(step_approvals::evaluator_id.eq(evaluator_id)),
        None => target.filter(step_approvals::evaluator_id.is_null()),
    };

    // Diesel cannot update through a boxed query; collect the row id first
    let step_approval_id: i64 = target
        .first::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("update_step lookup: {e}")))?;

    diesel::update(
        step_approvals::table.filter(step_approvals::step_approval_id.eq(step_approval_id)),
    )
    .set((
        step_approvals::status.eq(step.status.as_str()),
        step_approvals::revision_comment.eq(step.revision_comment.clone()),
        step_approvals::version.eq(step.version),
        step_approvals::updated_by.eq(step.updated_by),
        step_approvals::updated_at.eq(step.updated_at.clone()),
    ))
    .execute(conn)?;
    Ok(())
}

}
