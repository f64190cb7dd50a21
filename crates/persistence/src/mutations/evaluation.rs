// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation content and stage mapping leaf mutations.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewEvaluation, NewStageMapping};
use crate::diesel_schema::{evaluations, stage_mappings};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Insert an evaluation content row and return its generated id.
pub fn insert_evaluation(
    conn: &mut _,
    record: &NewEvaluation,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(evaluations::table)
        .values(record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}

backend_fn! {

/// Update an evaluation's content and score in place.
///
/// The submission flag is never touched here; submission moves through
/// its own mutation so the revision gate can be enforced.
pub fn update_evaluation_content(
    conn: &mut _,
    evaluation_id: i64,
    content: &str,
    score: f64,
    updated_by: i64,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(evaluations::table.filter(evaluations::evaluation_id.eq(evaluation_id)))
        .set((
            evaluations::content.eq(content),
            evaluations::score.eq(score),
            evaluations::updated_by.eq(updated_by),
            evaluations::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}

}

backend_fn! {

/// Set or clear an evaluation's submission flag.
pub fn set_submission(
    conn: &mut _,
    evaluation_id: i64,
    is_completed: bool,
    completed_at: Option<&str>,
    updated_by: i64,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(evaluations::table.filter(evaluations::evaluation_id.eq(evaluation_id)))
        .set((
            evaluations::is_completed.eq(i32::from(is_completed)),
            evaluations::completed_at.eq(completed_at),
            evaluations::updated_by.eq(updated_by),
            evaluations::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    Ok(())
}

}

backend_fn! {

/// Insert a stage mapping row and return its generated id.
///
/// The caller checks the uniqueness invariant before inserting; the
/// unique index is the backstop.
pub fn insert_mapping(
    conn: &mut _,
    record: &NewStageMapping,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(stage_mappings::table)
        .values(record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}

backend_fn! {

/// Link a mapping to its content row.
pub fn link_mapping(
    conn: &mut _,
    mapping_id: i64,
    evaluation_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(stage_mappings::table.filter(stage_mappings::mapping_id.eq(mapping_id)))
        .set(stage_mappings::evaluation_id.eq(evaluation_id))
        .execute(conn)?;
    Ok(())
}

}

backend_fn! {

/// Set the editable override flag on a mapping.
///
/// Set when a revision re-opens the content for editing, cleared when
/// the gating step is approved.
pub fn set_mapping_editable(
    conn: &mut _,
    mapping_id: i64,
    is_editable: bool,
) -> Result<(), PersistenceError> {
    diesel::update(stage_mappings::table.filter(stage_mappings::mapping_id.eq(mapping_id)))
        .set(stage_mappings::is_editable.eq(i32::from(is_editable)))
        .execute(conn)?;
    Ok(())
}

}
