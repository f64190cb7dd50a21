// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Revision request and recipient leaf mutations.
//!
//! Revision requests are immutable once created; recipient rows are the
//! only part of the registry that changes after creation, and only along
//! the read/complete axes.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewRecipient, NewRevisionRequest};
use crate::diesel_schema::{revision_request_recipients, revision_requests};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Insert a revision request and return its generated id.
pub fn insert_request(
    conn: &mut _,
    record: &NewRevisionRequest,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(revision_requests::table)
        .values(record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}

backend_fn! {

/// Insert the recipient rows a revision request fans out to.
pub fn insert_recipients(
    conn: &mut _,
    records: &[NewRecipient],
) -> Result<(), PersistenceError> {
    diesel::insert_into(revision_request_recipients::table)
        .values(records)
        .execute(conn)?;
    Ok(())
}

}

backend_fn! {

/// Mark a recipient row as read.
///
/// Idempotent: only un-read rows are touched, so a second call leaves
/// `read_at` unchanged. Returns the number of rows updated (0 or 1).
pub fn mark_recipient_read(
    conn: &mut _,
    request_id: i64,
    recipient_id: i64,
    read_at: &str,
) -> Result<usize, PersistenceError> {
    diesel::update(
        revision_request_recipients::table
            .filter(revision_request_recipients::request_id.eq(request_id))
            .filter(revision_request_recipients::recipient_id.eq(recipient_id))
            .filter(revision_request_recipients::is_read.eq(0)),
    )
    .set((
        revision_request_recipients::is_read.eq(1),
        revision_request_recipients::read_at.eq(read_at),
    ))
    .execute(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("mark_recipient_read: {e}")))
}

}

backend_fn! {

/// Record a recipient's completion on their recipient row.
pub fn complete_recipient(
    conn: &mut _,
    recipient_row_id: i64,
    completed_at: &str,
    response_comment: &str,
) -> Result<(), PersistenceError> {
    diesel::update(
        revision_request_recipients::table
            .filter(revision_request_recipients::recipient_row_id.eq(recipient_row_id)),
    )
    .set((
        revision_request_recipients::is_completed.eq(1),
        revision_request_recipients::completed_at.eq(completed_at),
        revision_request_recipients::response_comment.eq(response_comment),
    ))
    .execute(conn)?;
    Ok(())
}

}
