// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation period and project queries.

use crate::data_models::{PeriodRow, ProjectRow};
use crate::diesel_schema::{evaluation_periods, projects};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Load an evaluation period by id.
pub fn get_period(
    conn: &mut _,
    period_id: i64,
) -> Result<Option<PeriodRow>, PersistenceError> {
    evaluation_periods::table
        .filter(evaluation_periods::period_id.eq(period_id))
        .first::<PeriodRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_period: {e}")))
}

}

backend_fn! {

/// List all evaluation periods in creation order.
pub fn list_periods(
    conn: &mut _,
) -> Result<Vec<PeriodRow>, PersistenceError> {
    evaluation_periods::table
        .order(evaluation_periods::period_id.asc())
        .load::<PeriodRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_periods: {e}")))
}

}

backend_fn! {

/// Load a project by id.
#[allow(dead_code)]
pub fn get_project(
    conn: &mut _,
    project_id: i64,
) -> Result<Option<ProjectRow>, PersistenceError> {
    projects::table
        .filter(projects::project_id.eq(project_id))
        .first::<ProjectRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_project: {e}")))
}

}

backend_fn! {

/// List all projects registered for a period.
pub fn list_projects(
    conn: &mut _,
    period_id: i64,
) -> Result<Vec<ProjectRow>, PersistenceError> {
    projects::table
        .filter(projects::period_id.eq(period_id))
        .order(projects::project_id.asc())
        .load::<ProjectRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_projects: {e}")))
}

}
