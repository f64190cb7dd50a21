// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::comment_policy::CommentPolicyError;
use evalflow_domain::WorkflowError;
use evalflow_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the
/// API contract. Nothing from the lower layers is swallowed; every
/// failure is translated into one of these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A workflow rule was violated.
    WorkflowRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The record was modified concurrently by another caller.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Comment policy violation.
    CommentPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
            Self::WorkflowRuleViolation { rule, message } => {
                write!(f, "Workflow rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::CommentPolicyViolation { message } => {
                write!(f, "Comment policy violation: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<CommentPolicyError> for ApiError {
    fn from(err: CommentPolicyError) -> Self {
        Self::CommentPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a workflow rule error into the API error contract.
///
/// Each spec error kind keeps its identity: validation failures become
/// `InvalidInput`, missing records become `ResourceNotFound`, illegal
/// transitions and duplicate mappings become `WorkflowRuleViolation`,
/// and version mismatches become `Conflict`.
#[must_use]
pub fn translate_workflow_error(err: &WorkflowError) -> ApiError {
    match err {
        WorkflowError::MissingRevisionComment => ApiError::InvalidInput {
            field: String::from("comment"),
            message: err.to_string(),
        },
        WorkflowError::BlankResponseComment => ApiError::InvalidInput {
            field: String::from("response_comment"),
            message: err.to_string(),
        },
        WorkflowError::InvalidStage(_) | WorkflowError::MissingEvaluator { .. }
        | WorkflowError::UnexpectedEvaluator { .. } => ApiError::InvalidInput {
            field: String::from("stage"),
            message: err.to_string(),
        },
        WorkflowError::InvalidKind(_) | WorkflowError::UnexpectedProject { .. } => {
            ApiError::InvalidInput {
                field: String::from("kind"),
                message: err.to_string(),
            }
        }
        WorkflowError::InvalidStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        WorkflowError::InvalidRecipientType(_) => ApiError::InvalidInput {
            field: String::from("recipient_type"),
            message: err.to_string(),
        },
        WorkflowError::InvalidPhase(_) => ApiError::InvalidInput {
            field: String::from("phase"),
            message: err.to_string(),
        },
        WorkflowError::InvalidDeadlineOrder { .. } => ApiError::InvalidInput {
            field: String::from("deadlines"),
            message: err.to_string(),
        },
        WorkflowError::InvalidScore { .. } => ApiError::InvalidInput {
            field: String::from("score"),
            message: err.to_string(),
        },
        WorkflowError::InvalidStatusTransition { .. } => ApiError::WorkflowRuleViolation {
            rule: String::from("step_approval_transition"),
            message: err.to_string(),
        },
        WorkflowError::DirectRevisionCompletion => ApiError::WorkflowRuleViolation {
            rule: String::from("revision_completion_path"),
            message: err.to_string(),
        },
        WorkflowError::SubmissionLocked { .. } => ApiError::WorkflowRuleViolation {
            rule: String::from("submission_gate"),
            message: err.to_string(),
        },
        WorkflowError::DuplicateMapping { .. } => ApiError::WorkflowRuleViolation {
            rule: String::from("mapping_uniqueness"),
            message: err.to_string(),
        },
        WorkflowError::StepApprovalNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Step approval"),
            message: err.to_string(),
        },
        WorkflowError::RevisionRequestNotFound { .. }
        | WorkflowError::OpenRevisionNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Revision request"),
            message: err.to_string(),
        },
        WorkflowError::RecipientNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Revision recipient"),
            message: err.to_string(),
        },
        WorkflowError::EvaluationNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Evaluation"),
            message: err.to_string(),
        },
        WorkflowError::PeriodNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Evaluation period"),
            message: err.to_string(),
        },
        WorkflowError::ConcurrentModification { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into the API error contract.
///
/// Workflow rule violations carried through the persistence layer are
/// unwrapped and translated by [`translate_workflow_error`];
/// infrastructure failures surface as `Internal`.
#[must_use]
pub fn translate_persistence_error(err: &PersistenceError) -> ApiError {
    match err {
        PersistenceError::Workflow(workflow_err) => translate_workflow_error(workflow_err),
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: message.clone(),
        },
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
