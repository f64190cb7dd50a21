// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transition event queries.
//!
//! Transition events are the stable per-transition records downstream
//! notification and activity-log consumers read. Queries here are pure;
//! event rows are only ever inserted by the workflow mutations.

use crate::data_models::TransitionEventRow;
use crate::diesel_schema::transition_events;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// List transition events for a `(period, employee)` scope in the order
/// they were recorded.
pub fn list_transition_events(
    conn: &mut _,
    period_id: i64,
    employee_id: i64,
) -> Result<Vec<TransitionEventRow>, PersistenceError> {
    transition_events::table
        .filter(transition_events::period_id.eq(period_id))
        .filter(transition_events::employee_id.eq(employee_id))
        .order(transition_events::event_id.asc())
        .load::<TransitionEventRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_transition_events: {e}")))
}

}

backend_fn! {

/// Count all transition events recorded for a period.
#[allow(dead_code)]
pub fn count_transition_events(
    conn: &mut _,
    period_id: i64,
) -> Result<i64, PersistenceError> {
    transition_events::table
        .filter(transition_events::period_id.eq(period_id))
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_transition_events: {e}")))
}

}
