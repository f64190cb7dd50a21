// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler follows the same shape: verify authorization first,
//! validate and parse the request into domain types, invoke the
//! persistence adapter, and translate any lower-layer error into the
//! API contract. Mutating handlers require an explicit
//! [`AuthenticatedActor`]; nothing defaults the acting identity.

use num_traits::cast::ToPrimitive;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use evalflow::{BulkOutcome, TransitionOutcome, bulk_apply};
use evalflow_domain::{
    EvaluationKey, EvaluationKind, EvaluationStage, PeriodDeadlines, StepApprovalStatus, StepKey,
    WorkflowError, validate_score,
};
use evalflow_persistence::{Persistence, RevisionRequestFilter};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::comment_policy::CommentPolicy;
use crate::error::{ApiError, translate_persistence_error, translate_workflow_error};
use crate::request_response::{
    ApproveStepRequest, BulkAssignEvaluatorsRequest, BulkCreateProjectsRequest,
    BulkDeleteProjectsRequest, BulkFailedItem, BulkOperationResponse, BulkRegisterTargetsRequest,
    BulkSubmitEvaluationsRequest, CompleteRevisionByKeyRequest, CompleteRevisionRequest,
    CompleteRevisionResponse, CreatePeriodRequest, CreatePeriodResponse,
    ListRevisionRequestsRequest, MarkReadRequest, MarkReadResponse, PeriodView,
    PhaseSweepResponse, ProjectView, RequestRevisionRequest, RevisionRequestView,
    SaveDownwardEvaluationRequest, SaveEvaluationResponse, SaveFinalEvaluationRequest,
    SavePeerEvaluationRequest, SaveSelfEvaluationRequest, StepApprovalView,
    SubmitAndCompleteRequest, SubmitEvaluationRequest, TransitionEventView, TransitionResponse,
    UnreadCountResponse,
};

/// Formats the current instant for persistence timestamps.
fn now_rfc3339() -> Result<String, ApiError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal {
            message: format!("Cannot format current time: {e}"),
        })
}

/// Parses an RFC 3339 timestamp from request input.
fn parse_rfc3339(field: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Invalid RFC 3339 timestamp '{value}': {e}"),
    })
}

/// Parses a stage string and builds the step approval key.
fn build_step_key(
    period_id: i64,
    employee_id: i64,
    stage: &str,
    evaluator_id: Option<i64>,
) -> Result<StepKey, ApiError> {
    let stage: EvaluationStage = stage
        .parse()
        .map_err(|e: WorkflowError| translate_workflow_error(&e))?;
    StepKey::new(period_id, employee_id, stage, evaluator_id)
        .map_err(|e| translate_workflow_error(&e))
}

/// Parses a downward evaluation kind: `primary` or `secondary`.
fn parse_downward_kind(value: &str) -> Result<EvaluationKind, ApiError> {
    let kind: EvaluationKind = value
        .parse()
        .map_err(|e: WorkflowError| translate_workflow_error(&e))?;
    match kind {
        EvaluationKind::Primary | EvaluationKind::Secondary => Ok(kind),
        EvaluationKind::SelfEvaluation | EvaluationKind::Peer | EvaluationKind::Final => {
            Err(ApiError::InvalidInput {
                field: String::from("kind"),
                message: format!("'{value}' is not a downward evaluation kind"),
            })
        }
    }
}

/// Checks that the period's current phase allows saving the given kind.
fn require_phase_allows(
    persistence: &mut Persistence,
    period_id: i64,
    kind: EvaluationKind,
) -> Result<(), ApiError> {
    let phase = persistence
        .get_period_phase(period_id)
        .map_err(|e| translate_persistence_error(&e))?;
    if phase.allows(kind) {
        Ok(())
    } else {
        Err(ApiError::WorkflowRuleViolation {
            rule: String::from("period_phase"),
            message: format!(
                "Evaluations of kind '{}' cannot be saved while the period is in phase '{}'",
                kind.as_str(),
                phase.as_str()
            ),
        })
    }
}

/// Rejects an empty bulk item list; batches must carry work.
fn require_non_empty<T>(field: &str, items: &[T]) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: String::from("At least one item is required"),
        });
    }
    Ok(())
}

/// Converts a bulk outcome into the response DTO.
fn bulk_response<T>(
    outcome: BulkOutcome<T>,
    render: impl Fn(&T) -> String,
) -> Result<BulkOperationResponse, ApiError> {
    let success_count: u64 = outcome.success_count.to_u64().ok_or_else(|| ApiError::Internal {
        message: String::from("Success count out of range"),
    })?;
    let failed_count: u64 = outcome.failed_count.to_u64().ok_or_else(|| ApiError::Internal {
        message: String::from("Failed count out of range"),
    })?;

    Ok(BulkOperationResponse {
        success_count,
        failed_count,
        success_ids: outcome.success_ids,
        failed_items: outcome
            .failed_items
            .into_iter()
            .map(|failure| BulkFailedItem {
                item: render(&failure.item),
                reason: failure.reason,
            })
            .collect(),
    })
}

/// Builds a transition response from the step the outcome touched.
fn transition_response(
    outcome: &TransitionOutcome,
    key: &StepKey,
    message: String,
) -> Result<TransitionResponse, ApiError> {
    let step = outcome
        .new_state
        .step(key)
        .ok_or_else(|| ApiError::Internal {
            message: format!("Transition produced no record for {key}"),
        })?;
    Ok(TransitionResponse {
        status: step.status.as_str().to_string(),
        version: step.version,
        message,
    })
}

// ============================================================================
// Evaluation Periods & Phase Sweep
// ============================================================================

/// Creates a new evaluation period.
///
/// Requires the Admin role. Deadlines must be strictly ascending; the
/// period starts in the criteria-setup phase and is advanced by the
/// phase sweep.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, a deadline fails to
/// parse, the deadline order is invalid, or persistence fails.
pub fn create_period(
    persistence: &mut Persistence,
    request: CreatePeriodRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CreatePeriodResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_period")?;

    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Period name must not be empty"),
        });
    }

    let deadlines: PeriodDeadlines = PeriodDeadlines::new(
        parse_rfc3339("criteria_deadline", &request.criteria_deadline)?,
        parse_rfc3339("self_deadline", &request.self_deadline)?,
        parse_rfc3339("evaluation_deadline", &request.evaluation_deadline)?,
    )
    .map_err(|e| translate_workflow_error(&e))?;

    let now: String = now_rfc3339()?;
    let period_id: i64 = persistence
        .create_period(request.name.trim(), &deadlines, &now)
        .map_err(|e| translate_persistence_error(&e))?;

    info!(period_id, name = request.name.trim(), "Created evaluation period");
    Ok(CreatePeriodResponse {
        period_id,
        message: format!("Successfully created evaluation period '{}'", request.name.trim()),
    })
}

/// Lists all evaluation periods.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the query fails.
pub fn list_periods(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<PeriodView>, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "list_periods")?;

    let rows = persistence
        .list_periods()
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(rows.into_iter().map(PeriodView::from).collect())
}

/// Runs the phase sweep: advances every period whose deadline passed.
///
/// Requires the Admin role. Idempotent and safe to invoke concurrently;
/// re-invocation on already-advanced periods is a no-op.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the sweep fails.
pub fn run_phase_sweep(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PhaseSweepResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "run_phase_sweep")?;

    let advanced_period_ids: Vec<i64> = persistence
        .advance_due_periods(OffsetDateTime::now_utc())
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(PhaseSweepResponse {
        advanced_period_ids,
    })
}

// ============================================================================
// Projects (WBS)
// ============================================================================

/// Creates a project under a period.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the period does not
/// exist, the name is blank, or persistence fails.
pub fn create_project(
    persistence: &mut Persistence,
    period_id: i64,
    name: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ProjectView, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "create_project")?;

    let name: &str = name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Project name must not be empty"),
        });
    }

    // Resolve the period first so a missing one reports as not-found
    // rather than a foreign key failure
    persistence
        .get_period(period_id)
        .map_err(|e| translate_persistence_error(&e))?;

    let project_id: i64 = persistence
        .create_project(period_id, name)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(ProjectView {
        project_id,
        period_id,
        name: name.to_string(),
    })
}

/// Lists the projects registered for a period.
///
/// Any authenticated role may read the project registry.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_projects(
    persistence: &mut Persistence,
    period_id: i64,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<ProjectView>, ApiError> {
    let rows = persistence
        .list_projects(period_id)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(rows.into_iter().map(ProjectView::from).collect())
}

/// Creates several projects under one period, one item at a time.
///
/// Requires the Admin role. A failure on one name neither aborts nor
/// rolls back the others; the response accounts for both sides.
///
/// # Errors
///
/// Returns an error only for malformed input (empty batch, missing
/// period) — never for a single item's failure.
pub fn bulk_create_projects(
    persistence: &mut Persistence,
    request: BulkCreateProjectsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BulkOperationResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "bulk_create_projects")?;
    require_non_empty("names", &request.names)?;
    persistence
        .get_period(request.period_id)
        .map_err(|e| translate_persistence_error(&e))?;

    let period_id: i64 = request.period_id;
    let outcome: BulkOutcome<String> = bulk_apply(request.names, |name| {
        let name: &str = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("name"),
                message: String::from("Project name must not be empty"),
            });
        }
        persistence
            .create_project(period_id, name)
            .map_err(|e| translate_persistence_error(&e))
    });

    bulk_response(outcome, Clone::clone)
}

/// Deletes several projects, one item at a time.
///
/// Requires the Admin role. `success_ids` carries the ids that were
/// deleted.
///
/// # Errors
///
/// Returns an error only for malformed input — never for a single
/// item's failure.
pub fn bulk_delete_projects(
    persistence: &mut Persistence,
    request: BulkDeleteProjectsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BulkOperationResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "bulk_delete_projects")?;
    require_non_empty("project_ids", &request.project_ids)?;

    let outcome: BulkOutcome<i64> = bulk_apply(request.project_ids, |project_id| {
        persistence
            .delete_project(*project_id)
            .map(|()| *project_id)
            .map_err(|e| translate_persistence_error(&e))
    });

    bulk_response(outcome, ToString::to_string)
}

// ============================================================================
// Evaluator Assignment & Target Registration
// ============================================================================

/// Assigns downward evaluators in bulk.
///
/// Requires the Admin role. Each assignment registers a stage mapping
/// binding the employee to the evaluator for the given downward kind;
/// duplicates are reported per item.
///
/// # Errors
///
/// Returns an error only for malformed input — never for a single
/// item's failure.
pub fn bulk_assign_evaluators(
    persistence: &mut Persistence,
    request: BulkAssignEvaluatorsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BulkOperationResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "bulk_assign_evaluators")?;
    require_non_empty("assignments", &request.assignments)?;

    let period_id: i64 = request.period_id;
    let outcome = bulk_apply(request.assignments, |assignment| {
        let kind: EvaluationKind = parse_downward_kind(&assignment.kind)?;
        let key: EvaluationKey = EvaluationKey::new(
            period_id,
            assignment.employee_id,
            kind,
            Some(assignment.evaluator_id),
            None,
        )
        .map_err(|e| translate_workflow_error(&e))?;
        persistence
            .create_evaluation_target(&key)
            .map_err(|e| translate_persistence_error(&e))
    });

    bulk_response(outcome, |assignment| {
        format!(
            "employee {} / evaluator {} / {}",
            assignment.employee_id, assignment.evaluator_id, assignment.kind
        )
    })
}

/// Registers employees as evaluation targets in bulk.
///
/// Requires the Admin role. Each employee receives a self-evaluation
/// stage mapping with no content yet; the upsert coordinator links
/// content when the employee first saves.
///
/// # Errors
///
/// Returns an error only for malformed input — never for a single
/// item's failure.
pub fn bulk_register_targets(
    persistence: &mut Persistence,
    request: BulkRegisterTargetsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BulkOperationResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "bulk_register_targets")?;
    require_non_empty("employee_ids", &request.employee_ids)?;

    let period_id: i64 = request.period_id;
    let outcome: BulkOutcome<i64> = bulk_apply(request.employee_ids, |employee_id| {
        let key: EvaluationKey = EvaluationKey::new(
            period_id,
            *employee_id,
            EvaluationKind::SelfEvaluation,
            None,
            None,
        )
        .map_err(|e| translate_workflow_error(&e))?;
        persistence
            .create_evaluation_target(&key)
            .map_err(|e| translate_persistence_error(&e))
    });

    bulk_response(outcome, ToString::to_string)
}

// ============================================================================
// Evaluation Saves & Submission
// ============================================================================

/// Saves (creates or updates) a self-evaluation.
///
/// The employee may save their own; Admins may save on behalf of
/// anyone. Gated on the period's self-evaluation phase.
///
/// # Errors
///
/// Returns an error if authorization, score validation, or the phase
/// gate fails, or persistence fails.
pub fn save_self_evaluation(
    persistence: &mut Persistence,
    request: SaveSelfEvaluationRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SaveEvaluationResponse, ApiError> {
    AuthorizationService::authorize_author(
        authenticated_actor,
        request.employee_id,
        "save_self_evaluation",
    )?;
    validate_score(request.score).map_err(|e| translate_workflow_error(&e))?;
    require_phase_allows(persistence, request.period_id, EvaluationKind::SelfEvaluation)?;

    let key: EvaluationKey = EvaluationKey::new(
        request.period_id,
        request.employee_id,
        EvaluationKind::SelfEvaluation,
        None,
        None,
    )
    .map_err(|e| translate_workflow_error(&e))?;

    let now: String = now_rfc3339()?;
    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &key,
            &request.content,
            request.score,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(SaveEvaluationResponse {
        evaluation_id,
        message: String::from("Successfully saved self-evaluation"),
    })
}

/// Saves (creates or updates) a peer evaluation.
///
/// The authoring peer may save their own; Admins may save on behalf of
/// anyone. Gated on the period's self-evaluation phase.
///
/// # Errors
///
/// Returns an error if authorization, score validation, or the phase
/// gate fails, or persistence fails.
pub fn save_peer_evaluation(
    persistence: &mut Persistence,
    request: SavePeerEvaluationRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SaveEvaluationResponse, ApiError> {
    AuthorizationService::authorize_author(
        authenticated_actor,
        request.evaluator_id,
        "save_peer_evaluation",
    )?;
    validate_score(request.score).map_err(|e| translate_workflow_error(&e))?;
    require_phase_allows(persistence, request.period_id, EvaluationKind::Peer)?;

    let key: EvaluationKey = EvaluationKey::new(
        request.period_id,
        request.employee_id,
        EvaluationKind::Peer,
        Some(request.evaluator_id),
        request.project_id,
    )
    .map_err(|e| translate_workflow_error(&e))?;

    let now: String = now_rfc3339()?;
    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &key,
            &request.content,
            request.score,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(SaveEvaluationResponse {
        evaluation_id,
        message: String::from("Successfully saved peer evaluation"),
    })
}

/// Saves (creates or updates) a primary or secondary downward
/// evaluation.
///
/// The assigned evaluator may save their own; Admins may save on
/// behalf of anyone. Gated on the period's evaluation phase.
///
/// # Errors
///
/// Returns an error if authorization, kind parsing, score validation,
/// or the phase gate fails, or persistence fails.
pub fn save_downward_evaluation(
    persistence: &mut Persistence,
    request: SaveDownwardEvaluationRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SaveEvaluationResponse, ApiError> {
    AuthorizationService::authorize_author(
        authenticated_actor,
        request.evaluator_id,
        "save_downward_evaluation",
    )?;
    let kind: EvaluationKind = parse_downward_kind(&request.kind)?;
    validate_score(request.score).map_err(|e| translate_workflow_error(&e))?;
    require_phase_allows(persistence, request.period_id, kind)?;

    let key: EvaluationKey = EvaluationKey::new(
        request.period_id,
        request.employee_id,
        kind,
        Some(request.evaluator_id),
        None,
    )
    .map_err(|e| translate_workflow_error(&e))?;

    let now: String = now_rfc3339()?;
    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &key,
            &request.content,
            request.score,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(SaveEvaluationResponse {
        evaluation_id,
        message: format!("Successfully saved {} downward evaluation", kind.as_str()),
    })
}

/// Saves (creates or updates) a final evaluation.
///
/// Requires the Admin role. Gated on the period's evaluation phase.
/// Final evaluations have no step approval gate and no revision
/// fan-out.
///
/// # Errors
///
/// Returns an error if authorization, score validation, or the phase
/// gate fails, or persistence fails.
pub fn save_final_evaluation(
    persistence: &mut Persistence,
    request: SaveFinalEvaluationRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SaveEvaluationResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "save_final_evaluation")?;
    validate_score(request.score).map_err(|e| translate_workflow_error(&e))?;
    require_phase_allows(persistence, request.period_id, EvaluationKind::Final)?;

    let key: EvaluationKey = EvaluationKey::new(
        request.period_id,
        request.employee_id,
        EvaluationKind::Final,
        None,
        None,
    )
    .map_err(|e| translate_workflow_error(&e))?;

    let now: String = now_rfc3339()?;
    let evaluation_id: i64 = persistence
        .upsert_evaluation(
            &key,
            &request.content,
            request.score,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(SaveEvaluationResponse {
        evaluation_id,
        message: String::from("Successfully saved final evaluation"),
    })
}

/// Submits an evaluation, setting its completion flag.
///
/// The content author may submit their own; Admins may submit on
/// behalf of anyone; final evaluations are Admin-only. Fails while the
/// gating step approval is under revision.
///
/// # Errors
///
/// Returns an error if the evaluation does not exist, authorization
/// fails, or the submission gate is locked.
pub fn submit_evaluation(
    persistence: &mut Persistence,
    request: SubmitEvaluationRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SaveEvaluationResponse, ApiError> {
    let mapping = persistence
        .find_mapping_by_evaluation(request.evaluation_id)
        .map_err(|e| translate_persistence_error(&e))?
        .ok_or_else(|| {
            translate_workflow_error(&WorkflowError::EvaluationNotFound(request.evaluation_id))
        })?;

    let kind: EvaluationKind = mapping
        .kind
        .parse()
        .map_err(|e: WorkflowError| translate_workflow_error(&e))?;
    match kind {
        EvaluationKind::Final => {
            AuthorizationService::authorize_admin(authenticated_actor, "submit_evaluation")?;
        }
        EvaluationKind::SelfEvaluation
        | EvaluationKind::Peer
        | EvaluationKind::Primary
        | EvaluationKind::Secondary => {
            let author_id: i64 = mapping.evaluator_id.unwrap_or(mapping.employee_id);
            AuthorizationService::authorize_author(
                authenticated_actor,
                author_id,
                "submit_evaluation",
            )?;
        }
    }

    let now: String = now_rfc3339()?;
    persistence
        .submit_evaluation(
            request.evaluation_id,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(SaveEvaluationResponse {
        evaluation_id: request.evaluation_id,
        message: String::from("Successfully submitted evaluation"),
    })
}

/// Submits several evaluations, one item at a time.
///
/// Requires the Admin role. A failure on one id neither aborts nor
/// rolls back the others.
///
/// # Errors
///
/// Returns an error only for malformed input — never for a single
/// item's failure.
pub fn bulk_submit_evaluations(
    persistence: &mut Persistence,
    request: BulkSubmitEvaluationsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BulkOperationResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "bulk_submit_evaluations")?;
    require_non_empty("evaluation_ids", &request.evaluation_ids)?;

    let actor = authenticated_actor.to_audit_actor();
    let now: String = now_rfc3339()?;
    let outcome: BulkOutcome<i64> = bulk_apply(request.evaluation_ids, |evaluation_id| {
        persistence
            .submit_evaluation(*evaluation_id, &actor, &now)
            .map(|()| *evaluation_id)
            .map_err(|e| translate_persistence_error(&e))
    });

    bulk_response(outcome, ToString::to_string)
}

// ============================================================================
// Step Approval Workflow
// ============================================================================

/// Approves a step, optionally cascading to downstream stages.
///
/// Admins may approve any key; evaluators only keys carrying their own
/// evaluator id. Approving the self-evaluation stage first auto-submits
/// the employee's content if it was saved but never submitted. A
/// cascade approves downstream steps that are pending or
/// revision-completed and never silently clears an open revision.
///
/// # Errors
///
/// Returns an error if authorization fails, the transition is not
/// permitted from the current status, or the expected version does not
/// match the live record.
pub fn approve_step(
    persistence: &mut Persistence,
    request: ApproveStepRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<TransitionResponse, ApiError> {
    let key: StepKey = build_step_key(
        request.period_id,
        request.employee_id,
        &request.stage,
        request.evaluator_id,
    )?;
    AuthorizationService::authorize_transition(authenticated_actor, &key)?;

    let now: String = now_rfc3339()?;

    // Approving the self stage auto-submits saved-but-unsubmitted
    // content before the generic transition runs
    if key.stage() == EvaluationStage::SelfEvaluation {
        auto_submit_self(persistence, &key, authenticated_actor, &now)?;
    }

    let outcome: TransitionOutcome = persistence
        .transition_step(
            key,
            StepApprovalStatus::Approved,
            None,
            request.expected_version,
            request.cascade,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    transition_response(
        &outcome,
        &key,
        format!("Successfully approved the {} stage", key.stage()),
    )
}

/// Auto-submits the employee's self-evaluation if it was saved but not
/// yet submitted.
fn auto_submit_self(
    persistence: &mut Persistence,
    key: &StepKey,
    authenticated_actor: &AuthenticatedActor,
    now: &str,
) -> Result<(), ApiError> {
    let content_key: EvaluationKey = EvaluationKey::new(
        key.period_id(),
        key.employee_id(),
        EvaluationKind::SelfEvaluation,
        None,
        None,
    )
    .map_err(|e| translate_workflow_error(&e))?;

    let Some(mapping) = persistence
        .find_mapping(&content_key)
        .map_err(|e| translate_persistence_error(&e))?
    else {
        return Ok(());
    };
    let Some(evaluation_id) = mapping.evaluation_id else {
        return Ok(());
    };

    let evaluation = persistence
        .get_evaluation(evaluation_id)
        .map_err(|e| translate_persistence_error(&e))?;
    if evaluation.is_completed == 0 {
        persistence
            .submit_evaluation(evaluation_id, &authenticated_actor.to_audit_actor(), now)
            .map_err(|e| translate_persistence_error(&e))?;
        info!(evaluation_id, "Auto-submitted self-evaluation before approval");
    }
    Ok(())
}

/// Sends a step back for revision.
///
/// Admins may reject any key; evaluators only keys carrying their own
/// evaluator id. The comment is mandatory; the revision request, its
/// recipient fan-out, and the submission reset all commit in one unit
/// of work.
///
/// # Errors
///
/// Returns an error if authorization or the comment policy fails, the
/// transition is not permitted, or the expected version does not match.
pub fn request_revision(
    persistence: &mut Persistence,
    request: RequestRevisionRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<TransitionResponse, ApiError> {
    let key: StepKey = build_step_key(
        request.period_id,
        request.employee_id,
        &request.stage,
        request.evaluator_id,
    )?;
    AuthorizationService::authorize_transition(authenticated_actor, &key)?;

    let policy: CommentPolicy = CommentPolicy::default();
    let comment: &str = policy.validate(&request.comment)?;

    let now: String = now_rfc3339()?;
    let outcome: TransitionOutcome = persistence
        .transition_step(
            key,
            StepApprovalStatus::RevisionRequested,
            Some(comment),
            request.expected_version,
            false,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    transition_response(
        &outcome,
        &key,
        format!("Requested revision of the {} stage", key.stage()),
    )
}

/// Reads the step approval records for a `(period, employee)` scope.
///
/// Admins and evaluators may read any scope; employees only their own.
/// Stages with no record yet are implicitly pending and not listed.
///
/// # Errors
///
/// Returns an error if authorization fails or the query fails.
pub fn get_workflow_status(
    persistence: &mut Persistence,
    period_id: i64,
    employee_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<StepApprovalView>, ApiError> {
    AuthorizationService::authorize_scope_read(authenticated_actor, employee_id)?;

    let rows = persistence
        .list_step_approvals(period_id, employee_id)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(rows.into_iter().map(StepApprovalView::from).collect())
}

/// Reads the recorded transition events for a `(period, employee)`
/// scope, oldest first.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the query fails.
pub fn list_transition_events(
    persistence: &mut Persistence,
    period_id: i64,
    employee_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<TransitionEventView>, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "list_transition_events")?;

    let rows = persistence
        .list_transition_events(period_id, employee_id)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(rows.into_iter().map(TransitionEventView::from).collect())
}

// ============================================================================
// Revision Request Registry
// ============================================================================

/// Marks a revision request as read by one recipient.
///
/// Recipients may mark their own rows; Admins may mark any.
/// Idempotent: a second call is a no-op and leaves the original read
/// timestamp in place.
///
/// # Errors
///
/// Returns an error if authorization fails or the update fails.
pub fn mark_revision_read(
    persistence: &mut Persistence,
    request: MarkReadRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MarkReadResponse, ApiError> {
    AuthorizationService::authorize_recipient(
        authenticated_actor,
        request.recipient_id,
        "mark_revision_read",
    )?;

    let now: String = now_rfc3339()?;
    let newly_read: bool = persistence
        .mark_revision_read(request.request_id, request.recipient_id, &now)
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(MarkReadResponse {
        request_id: request.request_id,
        recipient_id: request.recipient_id,
        newly_read,
    })
}

/// Completes a recipient's revision response by request id.
///
/// Recipients may complete their own rows; Admins may complete any.
/// The response comment is mandatory. Completion resolves the
/// recipient's step approval to revision-completed in the same unit of
/// work.
///
/// # Errors
///
/// Returns an error if authorization or the comment policy fails, the
/// request does not exist, or no un-completed recipient row matches.
pub fn complete_revision(
    persistence: &mut Persistence,
    request: CompleteRevisionRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CompleteRevisionResponse, ApiError> {
    AuthorizationService::authorize_recipient(
        authenticated_actor,
        request.recipient_id,
        "complete_revision",
    )?;

    let policy: CommentPolicy = CommentPolicy::default();
    let response_comment: &str = policy.validate(&request.response_comment)?;

    let now: String = now_rfc3339()?;
    let outcome: TransitionOutcome = persistence
        .complete_revision(
            request.request_id,
            request.recipient_id,
            response_comment,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(complete_revision_response(&outcome))
}

/// Completes a recipient's revision response located by composite key.
///
/// The lookup-first variant for callers that do not hold the request
/// id; semantics otherwise match [`complete_revision`].
///
/// # Errors
///
/// Returns an error if authorization or the comment policy fails, or
/// no open revision addresses the recipient on the given key.
pub fn complete_revision_by_key(
    persistence: &mut Persistence,
    request: CompleteRevisionByKeyRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CompleteRevisionResponse, ApiError> {
    AuthorizationService::authorize_recipient(
        authenticated_actor,
        request.recipient_id,
        "complete_revision_by_key",
    )?;

    let key: StepKey = build_step_key(
        request.period_id,
        request.employee_id,
        &request.stage,
        request.evaluator_id,
    )?;

    let policy: CommentPolicy = CommentPolicy::default();
    let response_comment: &str = policy.validate(&request.response_comment)?;

    let now: String = now_rfc3339()?;
    let outcome: TransitionOutcome = persistence
        .complete_revision_by_key(
            key,
            request.recipient_id,
            response_comment,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(complete_revision_response(&outcome))
}

/// Resubmits evaluation content and completes the matching revision
/// response in a single action.
///
/// Recipients may resubmit their own; Admins may act on any. This is
/// the only path that sets the submission flag while a revision is
/// open.
///
/// # Errors
///
/// Returns an error if authorization or the comment policy fails, the
/// evaluation does not exist, or no open revision addresses the
/// recipient.
pub fn submit_and_complete_revision(
    persistence: &mut Persistence,
    request: SubmitAndCompleteRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<CompleteRevisionResponse, ApiError> {
    AuthorizationService::authorize_recipient(
        authenticated_actor,
        request.recipient_id,
        "submit_and_complete_revision",
    )?;

    let policy: CommentPolicy = CommentPolicy::default();
    let response_comment: &str = policy.validate(&request.response_comment)?;

    let now: String = now_rfc3339()?;
    let outcome: TransitionOutcome = persistence
        .submit_and_complete_revision(
            request.evaluation_id,
            request.recipient_id,
            response_comment,
            &authenticated_actor.to_audit_actor(),
            &now,
        )
        .map_err(|e| translate_persistence_error(&e))?;

    Ok(complete_revision_response(&outcome))
}

/// Builds the completion response from the resolution outcome.
///
/// A second recipient resolving an already-resolved step produces an
/// empty outcome; the step is revision-completed either way.
fn complete_revision_response(outcome: &TransitionOutcome) -> CompleteRevisionResponse {
    let step_status: String = outcome.events.last().map_or_else(
        || StepApprovalStatus::RevisionCompleted.as_str().to_string(),
        |event| event.to_status.as_str().to_string(),
    );
    CompleteRevisionResponse {
        step_status,
        message: String::from("Successfully completed the revision response"),
    }
}

/// Counts unread revision requests addressed to a recipient.
///
/// Recipients may read their own count; Admins may read any.
///
/// # Errors
///
/// Returns an error if authorization fails or the query fails.
pub fn unread_count(
    persistence: &mut Persistence,
    recipient_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UnreadCountResponse, ApiError> {
    AuthorizationService::authorize_recipient(authenticated_actor, recipient_id, "unread_count")?;

    let unread: i64 = persistence
        .unread_count(recipient_id)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(UnreadCountResponse {
        recipient_id,
        unread,
    })
}

/// Lists revision requests addressed to one recipient, newest first.
///
/// Recipients may list their own inbox; Admins may list any.
///
/// # Errors
///
/// Returns an error if authorization fails, a filter stage fails to
/// parse, or the query fails.
pub fn list_revision_requests_for_recipient(
    persistence: &mut Persistence,
    recipient_id: i64,
    request: &ListRevisionRequestsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<RevisionRequestView>, ApiError> {
    AuthorizationService::authorize_recipient(
        authenticated_actor,
        recipient_id,
        "list_revision_requests_for_recipient",
    )?;

    let filter: RevisionRequestFilter = build_filter(request)?;
    let rows = persistence
        .list_revision_requests_for_recipient(recipient_id, &filter)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(rows.into_iter().map(RevisionRequestView::from).collect())
}

/// Lists all revision requests with their recipient rows, newest first.
///
/// Requires the Admin role.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, a filter stage fails
/// to parse, or the query fails.
pub fn list_revision_requests(
    persistence: &mut Persistence,
    request: &ListRevisionRequestsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<RevisionRequestView>, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "list_revision_requests")?;

    let filter: RevisionRequestFilter = build_filter(request)?;
    let rows = persistence
        .list_revision_requests(&filter)
        .map_err(|e| translate_persistence_error(&e))?;
    Ok(rows.into_iter().map(RevisionRequestView::from).collect())
}

/// Parses the listing filter DTO into the persistence filter.
fn build_filter(request: &ListRevisionRequestsRequest) -> Result<RevisionRequestFilter, ApiError> {
    let stage: Option<EvaluationStage> = match &request.stage {
        Some(value) => Some(
            value
                .parse()
                .map_err(|e: WorkflowError| translate_workflow_error(&e))?,
        ),
        None => None,
    };
    Ok(RevisionRequestFilter {
        period_id: request.period_id,
        employee_id: request.employee_id,
        stage,
        only_open: request.only_open,
    })
}
