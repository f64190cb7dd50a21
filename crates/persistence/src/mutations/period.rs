// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation period mutations and the phase sweep.
//!
//! The sweep computes the phase each period should be in from its
//! deadlines and the supplied instant, and advances forward-only: a
//! period already at or past its computed phase is left untouched, so
//! re-invocation and concurrent invocation are no-ops.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewPeriod, PeriodRow};
use crate::diesel_schema::evaluation_periods;
use crate::error::PersistenceError;
use crate::queries::period::{list_periods_mysql, list_periods_sqlite};
use crate::{format_timestamp, parse_timestamp};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use evalflow_domain::{PeriodDeadlines, PeriodPhase, phase_for};
use time::OffsetDateTime;
use tracing::{debug, info};

backend_fn! {

/// Insert an evaluation period and return its generated id.
pub fn insert_period(
    conn: &mut _,
    record: &NewPeriod,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(evaluation_periods::table)
        .values(record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}

backend_fn! {

/// Overwrite a period's phase.
pub fn update_period_phase(
    conn: &mut _,
    period_id: i64,
    phase: &str,
) -> Result<(), PersistenceError> {
    diesel::update(
        evaluation_periods::table.filter(evaluation_periods::period_id.eq(period_id)),
    )
    .set(evaluation_periods::phase.eq(phase))
    .execute(conn)?;
    Ok(())
}

}

/// Builds the insert row for a new period, formatting its deadlines.
///
/// New periods always start in the first phase; the sweep advances them.
///
/// # Errors
///
/// Returns an error if a timestamp cannot be formatted.
pub fn period_to_row(
    name: &str,
    deadlines: &PeriodDeadlines,
    created_at: &str,
) -> Result<NewPeriod, PersistenceError> {
    Ok(NewPeriod {
        name: name.to_string(),
        phase: PeriodPhase::default().as_str().to_string(),
        criteria_deadline: format_timestamp(deadlines.criteria_deadline())?,
        self_deadline: format_timestamp(deadlines.self_deadline())?,
        evaluation_deadline: format_timestamp(deadlines.evaluation_deadline())?,
        created_at: created_at.to_string(),
    })
}

/// Parses a period row's deadlines back into domain form.
///
/// # Errors
///
/// Returns an error if a stored timestamp does not parse or the stored
/// deadlines violate ordering (impossible for rows created through
/// `period_to_row`).
pub fn row_to_deadlines(row: &PeriodRow) -> Result<PeriodDeadlines, PersistenceError> {
    let deadlines: PeriodDeadlines = PeriodDeadlines::new(
        parse_timestamp(&row.criteria_deadline)?,
        parse_timestamp(&row.self_deadline)?,
        parse_timestamp(&row.evaluation_deadline)?,
    )?;
    Ok(deadlines)
}

/// Advances every period whose deadline has passed — `SQLite` version.
///
/// Returns the ids of the periods that were advanced.
///
/// # Errors
///
/// Returns an error if a period row fails to load or parse, or an
/// update fails.
pub fn advance_due_periods_sqlite(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<Vec<i64>, PersistenceError> {
    let periods: Vec<PeriodRow> = list_periods_sqlite(conn)?;
    let mut advanced: Vec<i64> = Vec::new();

    for row in periods {
        let stored: PeriodPhase = row.phase.parse()?;
        let due: PeriodPhase = phase_for(&row_to_deadlines(&row)?, now);

        // Forward-only: never move a period back through its phases
        if due > stored {
            update_period_phase_sqlite(conn, row.period_id, due.as_str())?;
            debug!(
                period_id = row.period_id,
                from = stored.as_str(),
                to = due.as_str(),
                "Advanced period phase"
            );
            advanced.push(row.period_id);
        }
    }

    info!(advanced = advanced.len(), "Phase sweep complete");
    Ok(advanced)
}

/// Advances every period whose deadline has passed — `MySQL` version.
///
/// Returns the ids of the periods that were advanced.
///
/// # Errors
///
/// Returns an error if a period row fails to load or parse, or an
/// update fails.
pub fn advance_due_periods_mysql(
    conn: &mut MysqlConnection,
    now: OffsetDateTime,
) -> Result<Vec<i64>, PersistenceError> {
    let periods: Vec<PeriodRow> = list_periods_mysql(conn)?;
    let mut advanced: Vec<i64> = Vec::new();

    for row in periods {
        let stored: PeriodPhase = row.phase.parse()?;
        let due: PeriodPhase = phase_for(&row_to_deadlines(&row)?, now);

        // Forward-only: never move a period back through its phases
        if due > stored {
            update_period_phase_mysql(conn, row.period_id, due.as_str())?;
            debug!(
                period_id = row.period_id,
                from = stored.as_str(),
                to = due.as_str(),
                "Advanced period phase"
            );
            advanced.push(row.period_id);
        }
    }

    info!(advanced = advanced.len(), "Phase sweep complete");
    Ok(advanced)
}
