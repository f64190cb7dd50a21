// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transition event persistence.
//!
//! Every successful workflow mutation records one event row per step
//! record it touched, in the same transaction as the status write.

use crate::data_models::NewTransitionEvent;
use crate::diesel_schema::transition_events;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use evalflow_audit::TransitionEvent;

/// Converts a domain transition event into its insert row.
#[must_use]
pub fn event_to_row(event: &TransitionEvent) -> NewTransitionEvent {
    NewTransitionEvent {
        period_id: event.key.period_id(),
        employee_id: event.key.employee_id(),
        stage: event.key.stage().as_str().to_string(),
        evaluator_id: event.key.evaluator_id(),
        from_status: event.from_status.map(|s| s.as_str().to_string()),
        to_status: event.to_status.as_str().to_string(),
        actor_id: event.actor.id,
        actor_type: event.actor.actor_type.clone(),
        occurred_at: event.occurred_at.clone(),
    }
}

backend_fn! {

/// Insert transition event rows.
pub fn insert_transition_events(
    conn: &mut _,
    records: &[NewTransitionEvent],
) -> Result<(), PersistenceError> {
    diesel::insert_into(transition_events::table)
        .values(records)
        .execute(conn)?;
    Ok(())
}

}
