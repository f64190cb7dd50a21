// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation content and stage mapping queries.
//!
//! The stage mapping registry binds a composite business key to at most
//! one content row; these queries resolve mappings by key, by linked
//! content id, and load content rows for the upsert coordinator.

use crate::data_models::{EvaluationRow, StageMappingRow};
use crate::diesel_schema::{evaluations, stage_mappings};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Resolve the stage mapping row for a composite content key.
///
/// Nullable discriminators match exactly: a key without an evaluator
/// only matches rows whose `evaluator_id` is NULL, and likewise for the
/// project scope.
pub fn find_mapping(
    conn: &mut _,
    period_id: i64,
    employee_id: i64,
    kind: &str,
    evaluator_id: Option<i64>,
    project_id: Option<i64>,
) -> Result<Option<StageMappingRow>, PersistenceError> {
    let query = stage_mappings::table
        .filter(stage_mappings::period_id.eq(period_id))
        .filter(stage_mappings::employee_id.eq(employee_id))
        .filter(stage_mappings::kind.eq(kind))
        .into_boxed();

    let query = match evaluator_id {
        Some(evaluator_id) => query.filter(stage_mappings::evaluator_id.eq(evaluator_id)),
        None => query.filter(stage_mappings::evaluator_id.is_null()),
    };

    let query = match project_id {
        Some(project_id) => query.filter(stage_mappings::project_id.eq(project_id)),
        None => query.filter(stage_mappings::project_id.is_null()),
    };

    query
        .first::<StageMappingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_mapping: {e}")))
}

}

backend_fn! {

/// Resolve the stage mapping row that links to a content record.
pub fn find_mapping_by_evaluation(
    conn: &mut _,
    evaluation_id: i64,
) -> Result<Option<StageMappingRow>, PersistenceError> {
    stage_mappings::table
        .filter(stage_mappings::evaluation_id.eq(evaluation_id))
        .first::<StageMappingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_mapping_by_evaluation: {e}")))
}

}

backend_fn! {

/// List all stage mapping rows for a `(period, employee)` scope.
pub fn list_mappings(
    conn: &mut _,
    period_id: i64,
    employee_id: i64,
) -> Result<Vec<StageMappingRow>, PersistenceError> {
    stage_mappings::table
        .filter(stage_mappings::period_id.eq(period_id))
        .filter(stage_mappings::employee_id.eq(employee_id))
        .order(stage_mappings::mapping_id.asc())
        .load::<StageMappingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_mappings: {e}")))
}

}

backend_fn! {

/// Load an evaluation content row by id.
pub fn get_evaluation(
    conn: &mut _,
    evaluation_id: i64,
) -> Result<Option<EvaluationRow>, PersistenceError> {
    evaluations::table
        .filter(evaluations::evaluation_id.eq(evaluation_id))
        .first::<EvaluationRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_evaluation: {e}")))
}

}
