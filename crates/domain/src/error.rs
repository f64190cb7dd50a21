// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during workflow validation and transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// A revision request was issued without a comment.
    MissingRevisionComment,
    /// A revision completion was issued without a response comment.
    BlankResponseComment,
    /// Evaluation stage string is not recognized.
    InvalidStage(String),
    /// Evaluation kind string is not recognized.
    InvalidKind(String),
    /// Step approval status string is not recognized.
    InvalidStatus(String),
    /// Recipient type string is not recognized.
    InvalidRecipientType(String),
    /// Period phase string is not recognized.
    InvalidPhase(String),
    /// The requested status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is not permitted.
        reason: String,
    },
    /// `revision_completed` was requested as a direct transition target.
    DirectRevisionCompletion,
    /// A downward-stage key was built without an evaluator id.
    MissingEvaluator {
        /// The stage or kind that requires the evaluator discriminator.
        stage: String,
    },
    /// An evaluator id was supplied for a stage that has none.
    UnexpectedEvaluator {
        /// The stage or kind that carries no evaluator discriminator.
        stage: String,
    },
    /// A project id was supplied for a kind that is never project-scoped.
    UnexpectedProject {
        /// The evaluation kind.
        kind: String,
    },
    /// No step approval record exists for the given key.
    StepApprovalNotFound {
        /// The evaluation period.
        period_id: i64,
        /// The employee.
        employee_id: i64,
        /// The stage.
        stage: String,
    },
    /// No revision request exists with the given id.
    RevisionRequestNotFound {
        /// The revision request id.
        request_id: i64,
    },
    /// No un-completed recipient row matches the given request and recipient.
    RecipientNotFound {
        /// The revision request id.
        request_id: i64,
        /// The recipient id.
        recipient_id: i64,
    },
    /// No open revision request exists for the given composite key.
    OpenRevisionNotFound {
        /// The evaluation period.
        period_id: i64,
        /// The employee.
        employee_id: i64,
        /// The stage.
        stage: String,
    },
    /// No evaluation content record exists with the given id.
    EvaluationNotFound(i64),
    /// No evaluation period exists with the given id.
    PeriodNotFound(i64),
    /// A stage mapping already exists for the given key.
    DuplicateMapping {
        /// The evaluation period.
        period_id: i64,
        /// The employee.
        employee_id: i64,
        /// The evaluation kind.
        kind: String,
    },
    /// The caller's expected version does not match the live record.
    ConcurrentModification {
        /// The version the caller last read, if any.
        expected: Option<i64>,
        /// The version currently persisted.
        actual: i64,
    },
    /// Content cannot be resubmitted while its step is under revision.
    SubmissionLocked {
        /// The evaluation period.
        period_id: i64,
        /// The employee.
        employee_id: i64,
        /// The stage.
        stage: String,
    },
    /// Period deadlines are not in ascending order.
    InvalidDeadlineOrder {
        /// Description of the ordering violation.
        reason: String,
    },
    /// Evaluation score is outside the accepted range.
    InvalidScore {
        /// The rejected score value.
        score: f64,
    },
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRevisionComment => {
                write!(f, "A revision request requires a non-empty comment")
            }
            Self::BlankResponseComment => {
                write!(f, "Completing a revision requires a non-empty response comment")
            }
            Self::InvalidStage(s) => write!(f, "Unknown evaluation stage: {s}"),
            Self::InvalidKind(s) => write!(f, "Unknown evaluation kind: {s}"),
            Self::InvalidStatus(s) => write!(f, "Unknown step approval status: {s}"),
            Self::InvalidRecipientType(s) => write!(f, "Unknown recipient type: {s}"),
            Self::InvalidPhase(s) => write!(f, "Unknown period phase: {s}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition step approval from {from} to {to}: {reason}")
            }
            Self::DirectRevisionCompletion => {
                write!(
                    f,
                    "revision_completed can only be reached by completing the revision request"
                )
            }
            Self::MissingEvaluator { stage } => {
                write!(f, "Stage '{stage}' requires an evaluator id")
            }
            Self::UnexpectedEvaluator { stage } => {
                write!(f, "Stage '{stage}' does not take an evaluator id")
            }
            Self::UnexpectedProject { kind } => {
                write!(f, "Evaluation kind '{kind}' is not project-scoped")
            }
            Self::StepApprovalNotFound {
                period_id,
                employee_id,
                stage,
            } => {
                write!(
                    f,
                    "No step approval for period {period_id}, employee {employee_id}, stage {stage}"
                )
            }
            Self::RevisionRequestNotFound { request_id } => {
                write!(f, "Revision request {request_id} not found")
            }
            Self::RecipientNotFound {
                request_id,
                recipient_id,
            } => {
                write!(
                    f,
                    "No un-completed recipient {recipient_id} on revision request {request_id}"
                )
            }
            Self::OpenRevisionNotFound {
                period_id,
                employee_id,
                stage,
            } => {
                write!(
                    f,
                    "No open revision request for period {period_id}, employee {employee_id}, stage {stage}"
                )
            }
            Self::EvaluationNotFound(id) => write!(f, "Evaluation {id} not found"),
            Self::PeriodNotFound(id) => write!(f, "Evaluation period {id} not found"),
            Self::DuplicateMapping {
                period_id,
                employee_id,
                kind,
            } => {
                write!(
                    f,
                    "A stage mapping already exists for period {period_id}, employee {employee_id}, kind {kind}"
                )
            }
            Self::ConcurrentModification { expected, actual } => match expected {
                Some(v) => write!(
                    f,
                    "Step approval was modified concurrently: expected version {v}, found {actual}"
                ),
                None => write!(
                    f,
                    "Step approval was modified concurrently: expected no record, found version {actual}"
                ),
            },
            Self::SubmissionLocked {
                period_id,
                employee_id,
                stage,
            } => {
                write!(
                    f,
                    "Cannot resubmit content for period {period_id}, employee {employee_id}, stage {stage} while a revision is open"
                )
            }
            Self::InvalidDeadlineOrder { reason } => {
                write!(f, "Invalid deadline order: {reason}")
            }
            Self::InvalidScore { score } => {
                write!(f, "Invalid score {score}: must be between 0 and 100")
            }
        }
    }
}

impl std::error::Error for WorkflowError {}
