// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step approval status tracking and transition logic.
//!
//! This module defines the per-stage gate states and valid transitions.
//! `RevisionCompleted` is reachable only through revision request
//! completion; it is never accepted as a direct transition target.

use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Gate states tracking a stage's progress through the approval workflow.
///
/// Status is tracked per employee, per evaluation period, per stage
/// (and per evaluator for the downward stages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepApprovalStatus {
    /// No approval decision has been made yet
    #[default]
    Pending,
    /// The stage content has been approved
    Approved,
    /// A revision has been requested and is awaiting a response
    RevisionRequested,
    /// The requested revision has been answered by its recipient
    RevisionCompleted,
}

impl StepApprovalStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::RevisionRequested => "revision_requested",
            Self::RevisionCompleted => "revision_completed",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "revision_requested" => Ok(Self::RevisionRequested),
            "revision_completed" => Ok(Self::RevisionCompleted),
            _ => Err(WorkflowError::InvalidStatus(s.to_string())),
        }
    }

    /// Returns true if a cascade of an upstream approval may overwrite
    /// this status.
    ///
    /// A cascade never silently clears an open revision, so only
    /// `Pending` and `RevisionCompleted` steps are cascade targets.
    #[must_use]
    pub const fn accepts_cascade(&self) -> bool {
        matches!(self, Self::Pending | Self::RevisionCompleted)
    }

    /// Validates if a directly requested transition from this status to
    /// another is permitted.
    ///
    /// `RevisionCompleted` is rejected as a target here in all cases;
    /// that state is only produced by revision request completion, which
    /// is validated by [`Self::validate_revision_resolution`].
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), WorkflowError> {
        // The completion callback is the only producer of this state
        if new_status == Self::RevisionCompleted {
            return Err(WorkflowError::DirectRevisionCompletion);
        }

        let valid = match self {
            Self::Pending => matches!(new_status, Self::Approved | Self::RevisionRequested),
            Self::Approved => matches!(new_status, Self::RevisionRequested),
            // An open revision must be answered before the gate moves again
            Self::RevisionRequested => false,
            Self::RevisionCompleted => {
                matches!(new_status, Self::Approved | Self::RevisionRequested)
            }
        };

        if valid {
            Ok(())
        } else {
            Err(WorkflowError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by step approval lifecycle rules".to_string(),
            })
        }
    }

    /// Validates that an open revision on this status may be resolved to
    /// `RevisionCompleted` by the revision request registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the status is not `RevisionRequested`.
    pub fn validate_revision_resolution(&self) -> Result<(), WorkflowError> {
        if *self == Self::RevisionRequested {
            Ok(())
        } else {
            Err(WorkflowError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: Self::RevisionCompleted.as_str().to_string(),
                reason: "no open revision exists on this step".to_string(),
            })
        }
    }
}

impl FromStr for StepApprovalStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for StepApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
