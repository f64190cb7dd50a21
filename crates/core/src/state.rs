// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalflow_audit::TransitionEvent;
use evalflow_domain::{RecipientType, StepApprovalStatus, StepKey};

/// One live step approval record.
///
/// Exactly one record exists per key. Re-transitioning overwrites in
/// place; there is no history table. The version column supports
/// optimistic concurrency: it starts at 1 and increments on every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepApproval {
    /// The key identifying this record.
    pub key: StepKey,
    /// The current gate status.
    pub status: StepApprovalStatus,
    /// The comment attached to the most recent revision request.
    /// Cleared on approval.
    pub revision_comment: Option<String>,
    /// Optimistic concurrency version, starting at 1.
    pub version: i64,
    /// The actor who last wrote this record.
    pub updated_by: i64,
    /// When this record was last written (RFC 3339).
    pub updated_at: String,
}

/// The workflow state scoped to a single `(period, employee)` pair.
///
/// Holds every live step approval record for that scope, across all
/// stages and evaluators. Records are created lazily on first
/// transition; a stage with no record is implicitly pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    /// The evaluation period this state is scoped to.
    pub period_id: i64,
    /// The employee this state is scoped to.
    pub employee_id: i64,
    /// All live step approval records for this scope.
    pub steps: Vec<StepApproval>,
}

impl WorkflowState {
    /// Creates a new empty state for a given period and employee.
    ///
    /// # Arguments
    ///
    /// * `period_id` - The evaluation period this state is scoped to
    /// * `employee_id` - The employee this state is scoped to
    #[must_use]
    pub const fn new(period_id: i64, employee_id: i64) -> Self {
        Self {
            period_id,
            employee_id,
            steps: Vec::new(),
        }
    }

    /// Returns the step approval record for a key, if one exists.
    #[must_use]
    pub fn step(&self, key: &StepKey) -> Option<&StepApproval> {
        self.steps.iter().find(|s| &s.key == key)
    }

    /// Returns the effective status for a key.
    ///
    /// A key with no record is implicitly pending.
    #[must_use]
    pub fn status_of(&self, key: &StepKey) -> StepApprovalStatus {
        self.step(key)
            .map_or(StepApprovalStatus::Pending, |s| s.status)
    }
}

/// A persistence instruction produced by a transition.
///
/// The engine is pure; the persistence layer executes these effects
/// inside the same unit of work that stores the new state, so a
/// transition and its side effects commit or roll back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Create a revision request with its recipient rows.
    OpenRevision {
        /// The key the revision applies to.
        key: StepKey,
        /// The mandatory revision comment.
        comment: String,
        /// The recipients the request fans out to.
        recipients: Vec<(i64, RecipientType)>,
    },
    /// Reset the submission flag on the content record bound to a key.
    ///
    /// Emitted only for stages that have a content kind; a criteria
    /// revision has nothing to reset.
    ResetSubmission {
        /// The key whose bound content must be un-submitted.
        key: StepKey,
    },
}

/// The result of a successful transition.
///
/// Transitions are atomic: the new state, its audit events, and its
/// side effects are applied completely or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// The new state after the transition.
    pub new_state: WorkflowState,
    /// One audit event per step record the transition touched.
    pub events: Vec<TransitionEvent>,
    /// Persistence instructions to execute in the same unit of work.
    pub side_effects: Vec<SideEffect>,
}
