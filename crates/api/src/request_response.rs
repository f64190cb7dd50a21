// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These DTOs are distinct from domain types and represent the API
//! contract. Identifiers and enum values cross the boundary as plain
//! integers and strings; handlers parse them into domain types and
//! translate failures into `ApiError::InvalidInput`.

use evalflow_persistence::{
    PeriodRow, ProjectRow, RecipientRow, RevisionRequestRow, StepApprovalRow, TransitionEventRow,
};
use serde::{Deserialize, Serialize};

/// Request to create a new evaluation period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePeriodRequest {
    /// The display name of the period (e.g., "2026 First Half").
    pub name: String,
    /// When criteria setup closes (RFC 3339).
    pub criteria_deadline: String,
    /// When self-evaluation closes (RFC 3339).
    pub self_deadline: String,
    /// When evaluation closes (RFC 3339).
    pub evaluation_deadline: String,
}

/// Response for a successful period creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePeriodResponse {
    /// The generated period id.
    pub period_id: i64,
    /// A success message.
    pub message: String,
}

/// A read view of one evaluation period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodView {
    /// The period id.
    pub period_id: i64,
    /// The display name.
    pub name: String,
    /// The current phase.
    pub phase: String,
    /// When criteria setup closes (RFC 3339).
    pub criteria_deadline: String,
    /// When self-evaluation closes (RFC 3339).
    pub self_deadline: String,
    /// When evaluation closes (RFC 3339).
    pub evaluation_deadline: String,
    /// When the period was created (RFC 3339).
    pub created_at: String,
}

impl From<PeriodRow> for PeriodView {
    fn from(row: PeriodRow) -> Self {
        Self {
            period_id: row.period_id,
            name: row.name,
            phase: row.phase,
            criteria_deadline: row.criteria_deadline,
            self_deadline: row.self_deadline,
            evaluation_deadline: row.evaluation_deadline,
            created_at: row.created_at,
        }
    }
}

/// Response for a phase sweep invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSweepResponse {
    /// The ids of the periods the sweep advanced.
    pub advanced_period_ids: Vec<i64>,
}

/// A read view of one project (WBS entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    /// The project id.
    pub project_id: i64,
    /// The owning period.
    pub period_id: i64,
    /// The project name.
    pub name: String,
}

impl From<ProjectRow> for ProjectView {
    fn from(row: ProjectRow) -> Self {
        Self {
            project_id: row.project_id,
            period_id: row.period_id,
            name: row.name,
        }
    }
}

/// Request to create several projects under one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateProjectsRequest {
    /// The owning period.
    pub period_id: i64,
    /// The project names to create, in order.
    pub names: Vec<String>,
}

/// Request to delete several projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteProjectsRequest {
    /// The project ids to delete.
    pub project_ids: Vec<i64>,
}

/// One evaluator assignment in a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorAssignment {
    /// The employee being evaluated.
    pub employee_id: i64,
    /// The assigned evaluator.
    pub evaluator_id: i64,
    /// The downward evaluation kind: `primary` or `secondary`.
    pub kind: String,
}

/// Request to assign evaluators in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignEvaluatorsRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The assignments to register.
    pub assignments: Vec<EvaluatorAssignment>,
}

/// Request to register employees as evaluation targets in bulk.
///
/// Each registered employee receives a self-evaluation stage mapping
/// with no content yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRegisterTargetsRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employees to register.
    pub employee_ids: Vec<i64>,
}

/// Request to submit several evaluations in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSubmitEvaluationsRequest {
    /// The evaluation content ids to submit.
    pub evaluation_ids: Vec<i64>,
}

/// One failed item in a bulk operation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailedItem {
    /// The rendered item that failed.
    pub item: String,
    /// The failure reason.
    pub reason: String,
}

/// The partial-failure account every bulk endpoint returns.
///
/// `failed_items` preserves input order; `success_ids` preserves the
/// order identifiers were produced in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOperationResponse {
    /// How many items succeeded.
    pub success_count: u64,
    /// How many items failed.
    pub failed_count: u64,
    /// The identifiers produced by successful operations.
    pub success_ids: Vec<i64>,
    /// The failed items paired with their failure reasons.
    pub failed_items: Vec<BulkFailedItem>,
}

/// Request to save a self-evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSelfEvaluationRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee writing about themselves.
    pub employee_id: i64,
    /// The free-text content.
    pub content: String,
    /// The self-assigned score.
    pub score: f64,
}

/// Request to save a peer evaluation, optionally scoped to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePeerEvaluationRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee being evaluated.
    pub employee_id: i64,
    /// The peer writing the evaluation.
    pub evaluator_id: i64,
    /// The project scope, if any.
    pub project_id: Option<i64>,
    /// The free-text content.
    pub content: String,
    /// The peer-assigned score.
    pub score: f64,
}

/// Request to save a primary or secondary downward evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDownwardEvaluationRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee being evaluated.
    pub employee_id: i64,
    /// The evaluator writing the evaluation.
    pub evaluator_id: i64,
    /// The downward evaluation kind: `primary` or `secondary`.
    pub kind: String,
    /// The free-text content.
    pub content: String,
    /// The assigned score.
    pub score: f64,
}

/// Request to save a final evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFinalEvaluationRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee being evaluated.
    pub employee_id: i64,
    /// The free-text content.
    pub content: String,
    /// The final score.
    pub score: f64,
}

/// Response for a successful evaluation save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEvaluationResponse {
    /// The id of the live content row for the key.
    pub evaluation_id: i64,
    /// A success message.
    pub message: String,
}

/// Request to submit an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEvaluationRequest {
    /// The evaluation content id.
    pub evaluation_id: i64,
}

/// Request to approve a step, optionally cascading downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveStepRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee the step belongs to.
    pub employee_id: i64,
    /// The stage: `criteria`, `self`, `primary`, or `secondary`.
    pub stage: String,
    /// The evaluator discriminator for downward stages.
    pub evaluator_id: Option<i64>,
    /// The step record version the caller last read, if one exists.
    pub expected_version: Option<i64>,
    /// Whether the approval propagates to eligible downstream steps.
    pub cascade: bool,
}

/// Request to send a step back for revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRevisionRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee the step belongs to.
    pub employee_id: i64,
    /// The stage: `criteria`, `self`, `primary`, or `secondary`.
    pub stage: String,
    /// The evaluator discriminator for downward stages.
    pub evaluator_id: Option<i64>,
    /// The step record version the caller last read, if one exists.
    pub expected_version: Option<i64>,
    /// The mandatory revision comment.
    pub comment: String,
}

/// Response for a successful step transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResponse {
    /// The status after the transition.
    pub status: String,
    /// The record version after the transition.
    pub version: i64,
    /// A success message.
    pub message: String,
}

/// A read view of one step approval record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepApprovalView {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee.
    pub employee_id: i64,
    /// The stage.
    pub stage: String,
    /// The evaluator discriminator for downward stages.
    pub evaluator_id: Option<i64>,
    /// The gate status.
    pub status: String,
    /// The comment attached to the most recent revision request.
    pub revision_comment: Option<String>,
    /// The optimistic concurrency version.
    pub version: i64,
    /// The actor who last wrote the record.
    pub updated_by: i64,
    /// When the record was last written (RFC 3339).
    pub updated_at: String,
}

impl From<StepApprovalRow> for StepApprovalView {
    fn from(row: StepApprovalRow) -> Self {
        Self {
            period_id: row.period_id,
            employee_id: row.employee_id,
            stage: row.stage,
            evaluator_id: row.evaluator_id,
            status: row.status,
            revision_comment: row.revision_comment,
            version: row.version,
            updated_by: row.updated_by,
            updated_at: row.updated_at,
        }
    }
}

/// Request to mark a revision request recipient row as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkReadRequest {
    /// The revision request id.
    pub request_id: i64,
    /// The recipient marking the row read.
    pub recipient_id: i64,
}

/// Response for a mark-read invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkReadResponse {
    /// The revision request id.
    pub request_id: i64,
    /// The recipient who marked the row read.
    pub recipient_id: i64,
    /// Whether the row was newly marked; `false` on the idempotent
    /// no-op path.
    pub newly_read: bool,
}

/// Request to complete a revision response by request id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteRevisionRequest {
    /// The revision request id.
    pub request_id: i64,
    /// The responding recipient.
    pub recipient_id: i64,
    /// The mandatory response comment.
    pub response_comment: String,
}

/// Request to complete a revision response located by composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteRevisionByKeyRequest {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee the step belongs to.
    pub employee_id: i64,
    /// The stage: `criteria`, `self`, `primary`, or `secondary`.
    pub stage: String,
    /// The evaluator discriminator for downward stages.
    pub evaluator_id: Option<i64>,
    /// The responding recipient.
    pub recipient_id: i64,
    /// The mandatory response comment.
    pub response_comment: String,
}

/// Request to resubmit content and complete the revision in one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAndCompleteRequest {
    /// The evaluation content id to resubmit.
    pub evaluation_id: i64,
    /// The responding recipient.
    pub recipient_id: i64,
    /// The mandatory response comment.
    pub response_comment: String,
}

/// Response for a completed revision response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteRevisionResponse {
    /// The gate status of the affected step after completion.
    pub step_status: String,
    /// A success message.
    pub message: String,
}

/// Optional filters for revision request listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListRevisionRequestsRequest {
    /// Restrict to one evaluation period.
    pub period_id: Option<i64>,
    /// Restrict to one evaluatee.
    pub employee_id: Option<i64>,
    /// Restrict to one stage.
    pub stage: Option<String>,
    /// Only include recipient rows that are not completed.
    pub only_open: bool,
}

/// One recipient's tracking state on a revision request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientView {
    /// The recipient.
    pub recipient_id: i64,
    /// Whether the recipient is the evaluatee or an evaluator.
    pub recipient_type: String,
    /// Whether the recipient has read the request.
    pub is_read: bool,
    /// When the request was read (RFC 3339).
    pub read_at: Option<String>,
    /// Whether the recipient has completed their response.
    pub is_completed: bool,
    /// When the response was completed (RFC 3339).
    pub completed_at: Option<String>,
    /// The recipient's response comment.
    pub response_comment: Option<String>,
}

impl From<RecipientRow> for RecipientView {
    fn from(row: RecipientRow) -> Self {
        Self {
            recipient_id: row.recipient_id,
            recipient_type: row.recipient_type,
            is_read: row.is_read != 0,
            read_at: row.read_at,
            is_completed: row.is_completed != 0,
            completed_at: row.completed_at,
            response_comment: row.response_comment,
        }
    }
}

/// A read view of one revision request paired with one recipient row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRequestView {
    /// The revision request id.
    pub request_id: i64,
    /// The evaluation period.
    pub period_id: i64,
    /// The employee the revision concerns.
    pub employee_id: i64,
    /// The stage the revision concerns.
    pub stage: String,
    /// The evaluator discriminator for downward stages.
    pub evaluator_id: Option<i64>,
    /// The revision comment.
    pub comment: String,
    /// Who requested the revision.
    pub requested_by: i64,
    /// When the revision was requested (RFC 3339).
    pub requested_at: String,
    /// The recipient row this view is addressed to.
    pub recipient: RecipientView,
}

impl From<(RevisionRequestRow, RecipientRow)> for RevisionRequestView {
    fn from((request, recipient): (RevisionRequestRow, RecipientRow)) -> Self {
        Self {
            request_id: request.request_id,
            period_id: request.period_id,
            employee_id: request.employee_id,
            stage: request.stage,
            evaluator_id: request.evaluator_id,
            comment: request.comment,
            requested_by: request.requested_by,
            requested_at: request.requested_at,
            recipient: RecipientView::from(recipient),
        }
    }
}

/// Response for an unread count query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    /// The recipient the count belongs to.
    pub recipient_id: i64,
    /// How many unread revision requests address the recipient.
    pub unread: i64,
}

/// A read view of one recorded transition event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEventView {
    /// The evaluation period.
    pub period_id: i64,
    /// The employee.
    pub employee_id: i64,
    /// The stage.
    pub stage: String,
    /// The evaluator discriminator for downward stages.
    pub evaluator_id: Option<i64>,
    /// The status before the transition, absent on lazy creation.
    pub from_status: Option<String>,
    /// The status after the transition.
    pub to_status: String,
    /// The acting identity.
    pub actor_id: i64,
    /// The actor's role string.
    pub actor_type: String,
    /// When the transition occurred (RFC 3339).
    pub occurred_at: String,
}

impl From<TransitionEventRow> for TransitionEventView {
    fn from(row: TransitionEventRow) -> Self {
        Self {
            period_id: row.period_id,
            employee_id: row.employee_id,
            stage: row.stage,
            evaluator_id: row.evaluator_id,
            from_status: row.from_status,
            to_status: row.to_status,
            actor_id: row.actor_id,
            actor_type: row.actor_type,
            occurred_at: row.occurred_at,
        }
    }
}
