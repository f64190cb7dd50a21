// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation period phase calculation.
//!
//! A period moves through its phases based on configured deadlines.
//! Phase advancement is forward-only: the sweep computes the phase a
//! period should be in from its deadlines and the current time, and
//! re-invocation on an already-advanced period is a no-op.

use crate::error::WorkflowError;
use crate::stage::EvaluationKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The lifecycle phase of an evaluation period.
///
/// Phases are ordered; the phase sweep only ever advances a period
/// forward through this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPhase {
    /// Criteria are being set up for each employee
    #[default]
    CriteriaSetup,
    /// Employees are writing self and peer evaluations
    SelfEvaluation,
    /// Evaluators are writing downward and final evaluations
    Evaluation,
    /// All deadlines have passed
    Closed,
}

impl PeriodPhase {
    /// Returns the string representation of the phase.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CriteriaSetup => "criteria_setup",
            Self::SelfEvaluation => "self_evaluation",
            Self::Evaluation => "evaluation",
            Self::Closed => "closed",
        }
    }

    /// Parses a phase from its string representation.
    fn parse_str(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "criteria_setup" => Ok(Self::CriteriaSetup),
            "self_evaluation" => Ok(Self::SelfEvaluation),
            "evaluation" => Ok(Self::Evaluation),
            "closed" => Ok(Self::Closed),
            _ => Err(WorkflowError::InvalidPhase(s.to_string())),
        }
    }

    /// Returns whether content of the given kind may be saved in this phase.
    ///
    /// Self and peer evaluations are written during the self-evaluation
    /// phase; downward and final evaluations during the evaluation phase.
    /// Nothing is saved once the period is closed.
    #[must_use]
    pub const fn allows(&self, kind: EvaluationKind) -> bool {
        match self {
            Self::CriteriaSetup | Self::Closed => false,
            Self::SelfEvaluation => {
                matches!(kind, EvaluationKind::SelfEvaluation | EvaluationKind::Peer)
            }
            Self::Evaluation => matches!(
                kind,
                EvaluationKind::Primary | EvaluationKind::Secondary | EvaluationKind::Final
            ),
        }
    }
}

impl FromStr for PeriodPhase {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for PeriodPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three deadlines configured on an evaluation period.
///
/// Deadlines must be strictly ascending: criteria setup closes before
/// self-evaluation, which closes before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDeadlines {
    criteria_deadline: OffsetDateTime,
    self_deadline: OffsetDateTime,
    evaluation_deadline: OffsetDateTime,
}

impl PeriodDeadlines {
    /// Creates a new `PeriodDeadlines`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidDeadlineOrder` if the deadlines
    /// are not strictly ascending.
    pub fn new(
        criteria_deadline: OffsetDateTime,
        self_deadline: OffsetDateTime,
        evaluation_deadline: OffsetDateTime,
    ) -> Result<Self, WorkflowError> {
        if criteria_deadline >= self_deadline {
            return Err(WorkflowError::InvalidDeadlineOrder {
                reason: String::from(
                    "criteria deadline must come before the self-evaluation deadline",
                ),
            });
        }
        if self_deadline >= evaluation_deadline {
            return Err(WorkflowError::InvalidDeadlineOrder {
                reason: String::from(
                    "self-evaluation deadline must come before the evaluation deadline",
                ),
            });
        }
        Ok(Self {
            criteria_deadline,
            self_deadline,
            evaluation_deadline,
        })
    }

    /// Returns the criteria setup deadline.
    #[must_use]
    pub const fn criteria_deadline(&self) -> OffsetDateTime {
        self.criteria_deadline
    }

    /// Returns the self-evaluation deadline.
    #[must_use]
    pub const fn self_deadline(&self) -> OffsetDateTime {
        self.self_deadline
    }

    /// Returns the evaluation deadline.
    #[must_use]
    pub const fn evaluation_deadline(&self) -> OffsetDateTime {
        self.evaluation_deadline
    }
}

/// Computes the phase a period should be in at the given instant.
///
/// A deadline is inclusive of its phase: the period stays in a phase
/// until the instant its deadline passes.
#[must_use]
pub fn phase_for(deadlines: &PeriodDeadlines, now: OffsetDateTime) -> PeriodPhase {
    if now < deadlines.criteria_deadline {
        PeriodPhase::CriteriaSetup
    } else if now < deadlines.self_deadline {
        PeriodPhase::SelfEvaluation
    } else if now < deadlines.evaluation_deadline {
        PeriodPhase::Evaluation
    } else {
        PeriodPhase::Closed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn test_deadlines() -> PeriodDeadlines {
        PeriodDeadlines::new(
            datetime!(2026-02-01 0:00 UTC),
            datetime!(2026-03-01 0:00 UTC),
            datetime!(2026-04-01 0:00 UTC),
        )
        .unwrap()
    }

    #[test]
    fn test_phase_string_round_trip() {
        for phase in [
            PeriodPhase::CriteriaSetup,
            PeriodPhase::SelfEvaluation,
            PeriodPhase::Evaluation,
            PeriodPhase::Closed,
        ] {
            let s = phase.as_str();
            match PeriodPhase::parse_str(s) {
                Ok(parsed) => assert_eq!(phase, parsed),
                Err(e) => panic!("Failed to parse phase string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_phase_order_is_ascending() {
        assert!(PeriodPhase::CriteriaSetup < PeriodPhase::SelfEvaluation);
        assert!(PeriodPhase::SelfEvaluation < PeriodPhase::Evaluation);
        assert!(PeriodPhase::Evaluation < PeriodPhase::Closed);
    }

    #[test]
    fn test_deadlines_must_be_ascending() {
        let result = PeriodDeadlines::new(
            datetime!(2026-03-01 0:00 UTC),
            datetime!(2026-02-01 0:00 UTC),
            datetime!(2026-04-01 0:00 UTC),
        );
        assert!(result.is_err());

        let result = PeriodDeadlines::new(
            datetime!(2026-02-01 0:00 UTC),
            datetime!(2026-03-01 0:00 UTC),
            datetime!(2026-03-01 0:00 UTC),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_phase_for_each_window() {
        let deadlines = test_deadlines();

        assert_eq!(
            phase_for(&deadlines, datetime!(2026-01-15 12:00 UTC)),
            PeriodPhase::CriteriaSetup
        );
        assert_eq!(
            phase_for(&deadlines, datetime!(2026-02-15 12:00 UTC)),
            PeriodPhase::SelfEvaluation
        );
        assert_eq!(
            phase_for(&deadlines, datetime!(2026-03-15 12:00 UTC)),
            PeriodPhase::Evaluation
        );
        assert_eq!(
            phase_for(&deadlines, datetime!(2026-05-01 0:00 UTC)),
            PeriodPhase::Closed
        );
    }

    #[test]
    fn test_phase_changes_at_the_deadline_instant() {
        let deadlines = test_deadlines();

        assert_eq!(
            phase_for(&deadlines, datetime!(2026-02-01 0:00 UTC)),
            PeriodPhase::SelfEvaluation
        );
        assert_eq!(
            phase_for(&deadlines, datetime!(2026-04-01 0:00 UTC)),
            PeriodPhase::Closed
        );
    }

    #[test]
    fn test_self_phase_allows_self_and_peer_content() {
        let phase = PeriodPhase::SelfEvaluation;

        assert!(phase.allows(EvaluationKind::SelfEvaluation));
        assert!(phase.allows(EvaluationKind::Peer));
        assert!(!phase.allows(EvaluationKind::Primary));
        assert!(!phase.allows(EvaluationKind::Final));
    }

    #[test]
    fn test_evaluation_phase_allows_downward_and_final_content() {
        let phase = PeriodPhase::Evaluation;

        assert!(phase.allows(EvaluationKind::Primary));
        assert!(phase.allows(EvaluationKind::Secondary));
        assert!(phase.allows(EvaluationKind::Final));
        assert!(!phase.allows(EvaluationKind::SelfEvaluation));
    }

    #[test]
    fn test_closed_period_allows_nothing() {
        let phase = PeriodPhase::Closed;

        assert!(!phase.allows(EvaluationKind::SelfEvaluation));
        assert!(!phase.allows(EvaluationKind::Peer));
        assert!(!phase.allows(EvaluationKind::Primary));
        assert!(!phase.allows(EvaluationKind::Secondary));
        assert!(!phase.allows(EvaluationKind::Final));
    }
}
