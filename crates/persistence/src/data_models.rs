// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row and insert structs for the persistence tables.
//!
//! Booleans are stored as `Integer` 0/1 and timestamps as RFC 3339
//! `Text`, matching the schema across both backends.

use crate::diesel_schema::{
    evaluation_periods, evaluations, projects, revision_request_recipients, revision_requests,
    stage_mappings, step_approvals, transition_events,
};
use diesel::prelude::*;

/// An evaluation period row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct PeriodRow {
    pub period_id: i64,
    pub name: String,
    pub phase: String,
    pub criteria_deadline: String,
    pub self_deadline: String,
    pub evaluation_deadline: String,
    pub created_at: String,
}

/// Insert struct for evaluation periods.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = evaluation_periods)]
pub struct NewPeriod {
    pub name: String,
    pub phase: String,
    pub criteria_deadline: String,
    pub self_deadline: String,
    pub evaluation_deadline: String,
    pub created_at: String,
}

/// A project (WBS) row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct ProjectRow {
    pub project_id: i64,
    pub period_id: i64,
    pub name: String,
}

/// Insert struct for projects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProject {
    pub period_id: i64,
    pub name: String,
}

/// A step approval row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct StepApprovalRow {
    pub step_approval_id: i64,
    pub period_id: i64,
    pub employee_id: i64,
    pub stage: String,
    pub evaluator_id: Option<i64>,
    pub status: String,
    pub revision_comment: Option<String>,
    pub version: i64,
    pub updated_by: i64,
    pub updated_at: String,
}

/// Insert struct for step approvals.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = step_approvals)]
pub struct NewStepApproval {
    pub period_id: i64,
    pub employee_id: i64,
    pub stage: String,
    pub evaluator_id: Option<i64>,
    pub status: String,
    pub revision_comment: Option<String>,
    pub version: i64,
    pub updated_by: i64,
    pub updated_at: String,
}

/// A revision request row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct RevisionRequestRow {
    pub request_id: i64,
    pub period_id: i64,
    pub employee_id: i64,
    pub stage: String,
    pub evaluator_id: Option<i64>,
    pub comment: String,
    pub requested_by: i64,
    pub requested_at: String,
}

/// Insert struct for revision requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = revision_requests)]
pub struct NewRevisionRequest {
    pub period_id: i64,
    pub employee_id: i64,
    pub stage: String,
    pub evaluator_id: Option<i64>,
    pub comment: String,
    pub requested_by: i64,
    pub requested_at: String,
}

/// A revision request recipient row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct RecipientRow {
    pub recipient_row_id: i64,
    pub request_id: i64,
    pub recipient_id: i64,
    pub recipient_type: String,
    pub is_read: i32,
    pub read_at: Option<String>,
    pub is_completed: i32,
    pub completed_at: Option<String>,
    pub response_comment: Option<String>,
}

/// Insert struct for revision request recipients.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = revision_request_recipients)]
pub struct NewRecipient {
    pub request_id: i64,
    pub recipient_id: i64,
    pub recipient_type: String,
    pub is_read: i32,
    pub is_completed: i32,
}

/// A stage mapping row binding an employee to a content record.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct StageMappingRow {
    pub mapping_id: i64,
    pub period_id: i64,
    pub employee_id: i64,
    pub kind: String,
    pub evaluator_id: Option<i64>,
    pub project_id: Option<i64>,
    pub evaluation_id: Option<i64>,
    pub is_editable: i32,
}

/// Insert struct for stage mappings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stage_mappings)]
pub struct NewStageMapping {
    pub period_id: i64,
    pub employee_id: i64,
    pub kind: String,
    pub evaluator_id: Option<i64>,
    pub project_id: Option<i64>,
    pub evaluation_id: Option<i64>,
    pub is_editable: i32,
}

/// An evaluation content row.
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct EvaluationRow {
    pub evaluation_id: i64,
    pub kind: String,
    pub content: String,
    pub score: f64,
    pub is_completed: i32,
    pub completed_at: Option<String>,
    pub updated_by: i64,
    pub updated_at: String,
}

/// Insert struct for evaluation content.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = evaluations)]
pub struct NewEvaluation {
    pub kind: String,
    pub content: String,
    pub score: f64,
    pub is_completed: i32,
    pub updated_by: i64,
    pub updated_at: String,
}

/// A transition event row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct TransitionEventRow {
    pub event_id: i64,
    pub period_id: i64,
    pub employee_id: i64,
    pub stage: String,
    pub evaluator_id: Option<i64>,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor_id: i64,
    pub actor_type: String,
    pub occurred_at: String,
}

/// Insert struct for transition events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transition_events)]
pub struct NewTransitionEvent {
    pub period_id: i64,
    pub employee_id: i64,
    pub stage: String,
    pub evaluator_id: Option<i64>,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor_id: i64,
    pub actor_type: String,
    pub occurred_at: String,
}
