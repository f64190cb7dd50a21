// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Revision request read model.
//!
//! Pure queries over revision requests and their recipient rows: inbox
//! listings, unread counts, and the lookups the completion mutations use
//! to locate the recipient row they operate on.

use crate::data_models::{RecipientRow, RevisionRequestRow};
use crate::diesel_schema::{revision_request_recipients, revision_requests};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use evalflow_domain::EvaluationStage;

/// Optional filters for revision request listings.
///
/// Unset fields do not constrain the listing. `only_open` restricts the
/// result to recipient rows that have not been completed yet.
#[derive(Debug, Clone, Default)]
pub struct RevisionRequestFilter {
    /// Restrict to one evaluation period.
    pub period_id: Option<i64>,
    /// Restrict to one evaluatee.
    pub employee_id: Option<i64>,
    /// Restrict to one stage.
    pub stage: Option<EvaluationStage>,
    /// Only include recipient rows that are not completed.
    pub only_open: bool,
}

backend_fn! {

/// Count unread recipient rows addressed to a recipient.
pub fn unread_count(
    conn: &mut _,
    recipient_id: i64,
) -> Result<i64, PersistenceError> {
    revision_request_recipients::table
        .filter(revision_request_recipients::recipient_id.eq(recipient_id))
        .filter(revision_request_recipients::is_read.eq(0))
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("unread_count: {e}")))
}

}

backend_fn! {

/// List revision requests addressed to one recipient, newest first.
///
/// Returns each matching request paired with that recipient's own row.
pub fn list_for_recipient(
    conn: &mut _,
    recipient_id: i64,
    filter: &RevisionRequestFilter,
) -> Result<Vec<(RevisionRequestRow, RecipientRow)>, PersistenceError> {
    let mut query = revision_requests::table
        .inner_join(revision_request_recipients::table)
        .filter(revision_request_recipients::recipient_id.eq(recipient_id))
        .into_boxed();

    if let Some(period_id) = filter.period_id {
        query = query.filter(revision_requests::period_id.eq(period_id));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(revision_requests::employee_id.eq(employee_id));
    }
    if let Some(stage) = filter.stage {
        query = query.filter(revision_requests::stage.eq(stage.as_str()));
    }
    if filter.only_open {
        query = query.filter(revision_request_recipients::is_completed.eq(0));
    }

    query
        .order(revision_requests::request_id.desc())
        .load::<(RevisionRequestRow, RecipientRow)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_for_recipient: {e}")))
}

}

backend_fn! {

/// List all revision requests with their recipient rows, newest first.
pub fn list_all(
    conn: &mut _,
    filter: &RevisionRequestFilter,
) -> Result<Vec<(RevisionRequestRow, RecipientRow)>, PersistenceError> {
    let mut query = revision_requests::table
        .inner_join(revision_request_recipients::table)
        .into_boxed();

    if let Some(period_id) = filter.period_id {
        query = query.filter(revision_requests::period_id.eq(period_id));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(revision_requests::employee_id.eq(employee_id));
    }
    if let Some(stage) = filter.stage {
        query = query.filter(revision_requests::stage.eq(stage.as_str()));
    }
    if filter.only_open {
        query = query.filter(revision_request_recipients::is_completed.eq(0));
    }

    query
        .order(revision_requests::request_id.desc())
        .load::<(RevisionRequestRow, RecipientRow)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_all: {e}")))
}

}

backend_fn! {

/// Load a revision request by id.
pub fn get_request(
    conn: &mut _,
    request_id: i64,
) -> Result<Option<RevisionRequestRow>, PersistenceError> {
    revision_requests::table
        .filter(revision_requests::request_id.eq(request_id))
        .first::<RevisionRequestRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_request: {e}")))
}

}

backend_fn! {

/// Find the un-completed recipient row for `(request, recipient)`.
pub fn find_open_recipient(
    conn: &mut _,
    request_id: i64,
    recipient_id: i64,
) -> Result<Option<RecipientRow>, PersistenceError> {
    revision_request_recipients::table
        .filter(revision_request_recipients::request_id.eq(request_id))
        .filter(revision_request_recipients::recipient_id.eq(recipient_id))
        .filter(revision_request_recipients::is_completed.eq(0))
        .first::<RecipientRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_open_recipient: {e}")))
}

}

backend_fn! {

/// Find the newest un-completed recipient row addressed to `recipient_id`
/// on a revision request matching the step approval composite key.
///
/// Used by callers that do not hold the request id directly.
pub fn find_open_recipient_by_key(
    conn: &mut _,
    period_id: i64,
    employee_id: i64,
    stage: &str,
    evaluator_id: Option<i64>,
    recipient_id: i64,
) -> Result<Option<(RevisionRequestRow, RecipientRow)>, PersistenceError> {
    let query = revision_requests::table
        .inner_join(revision_request_recipients::table)
        .filter(revision_requests::period_id.eq(period_id))
        .filter(revision_requests::employee_id.eq(employee_id))
        .filter(revision_requests::stage.eq(stage))
        .filter(revision_request_recipients::recipient_id.eq(recipient_id))
        .filter(revision_request_recipients::is_completed.eq(0))
        .into_boxed();

    let query = match evaluator_id {
        Some(evaluator_id) => query.filter(revision_requests::evaluator_id.eq(evaluator_id)),
        None => query.filter(revision_requests::evaluator_id.is_null()),
    };

    query
        .order(revision_requests::request_id.desc())
        .first::<(RevisionRequestRow, RecipientRow)>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_open_recipient_by_key: {e}")))
}

}

backend_fn! {

/// List all recipient rows of one revision request.
pub fn list_recipients(
    conn: &mut _,
    request_id: i64,
) -> Result<Vec<RecipientRow>, PersistenceError> {
    revision_request_recipients::table
        .filter(revision_request_recipients::request_id.eq(request_id))
        .order(revision_request_recipients::recipient_row_id.asc())
        .load::<RecipientRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_recipients: {e}")))
}

}
