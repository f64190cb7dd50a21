// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Project (WBS) registry mutations.

use crate::backend::PersistenceBackend;
use crate::data_models::NewProject;
use crate::diesel_schema::projects;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Insert a project and return its generated id.
pub fn insert_project(
    conn: &mut _,
    record: &NewProject,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(projects::table)
        .values(record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}

backend_fn! {

/// Delete a project. Returns the number of rows deleted (0 or 1).
///
/// A project referenced by a stage mapping fails the foreign key check
/// and is reported as a database error, never silently unlinked.
pub fn delete_project(
    conn: &mut _,
    project_id: i64,
) -> Result<usize, PersistenceError> {
    diesel::delete(projects::table.filter(projects::project_id.eq(project_id)))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("delete_project: {e}")))
}

}
