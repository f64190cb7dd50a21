// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation stage and content kind enums.
//!
//! Approval stages are ordered: criteria, self, primary downward,
//! secondary downward. Content kinds additionally cover peer and final
//! evaluations, which carry content but have no approval gate.

use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The four approval-gated stages of an evaluation period, in order.
///
/// `Primary` and `Secondary` are additionally keyed by an evaluator id:
/// one employee may have several secondary evaluators, each with an
/// independent step approval record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStage {
    /// Criteria setup for the employee.
    Criteria,
    /// The employee's self-evaluation.
    #[serde(rename = "self")]
    SelfEvaluation,
    /// Primary downward evaluation by the direct evaluator.
    Primary,
    /// Secondary downward evaluation by an additional evaluator.
    Secondary,
}

impl EvaluationStage {
    /// All stages in ascending stage order.
    pub const ALL: [Self; 4] = [
        Self::Criteria,
        Self::SelfEvaluation,
        Self::Primary,
        Self::Secondary,
    ];

    /// Returns the string representation of the stage.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Criteria => "criteria",
            Self::SelfEvaluation => "self",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    /// Parses a stage from its string representation.
    fn parse_str(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "criteria" => Ok(Self::Criteria),
            "self" => Ok(Self::SelfEvaluation),
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            _ => Err(WorkflowError::InvalidStage(s.to_string())),
        }
    }

    /// Returns the position of this stage in stage order.
    #[must_use]
    pub const fn order(&self) -> u8 {
        match self {
            Self::Criteria => 0,
            Self::SelfEvaluation => 1,
            Self::Primary => 2,
            Self::Secondary => 3,
        }
    }

    /// Returns the stages strictly downstream of this stage, in order.
    #[must_use]
    pub fn downstream(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|s| s.order() > self.order())
            .collect()
    }

    /// Returns whether step approval keys for this stage carry an
    /// evaluator discriminator.
    #[must_use]
    pub const fn requires_evaluator(&self) -> bool {
        matches!(self, Self::Primary | Self::Secondary)
    }

    /// Returns the content kind bound to this stage, if any.
    ///
    /// Criteria setup has no evaluation content record, so a revision
    /// request on the criteria stage has nothing to reset.
    #[must_use]
    pub const fn content_kind(&self) -> Option<EvaluationKind> {
        match self {
            Self::Criteria => None,
            Self::SelfEvaluation => Some(EvaluationKind::SelfEvaluation),
            Self::Primary => Some(EvaluationKind::Primary),
            Self::Secondary => Some(EvaluationKind::Secondary),
        }
    }
}

impl FromStr for EvaluationStage {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for EvaluationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kinds of evaluation content record the system stores.
///
/// Peer and final evaluations carry content and a submission flag but no
/// step approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    /// Self-evaluation content.
    #[serde(rename = "self")]
    SelfEvaluation,
    /// Peer evaluation content, optionally scoped to a project.
    Peer,
    /// Primary downward evaluation content.
    Primary,
    /// Secondary downward evaluation content.
    Secondary,
    /// Final evaluation content.
    Final,
}

impl EvaluationKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelfEvaluation => "self",
            Self::Peer => "peer",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Final => "final",
        }
    }

    /// Parses a kind from its string representation.
    fn parse_str(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "self" => Ok(Self::SelfEvaluation),
            "peer" => Ok(Self::Peer),
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "final" => Ok(Self::Final),
            _ => Err(WorkflowError::InvalidKind(s.to_string())),
        }
    }

    /// Returns whether content keys of this kind carry an evaluator id.
    #[must_use]
    pub const fn requires_evaluator(&self) -> bool {
        matches!(self, Self::Peer | Self::Primary | Self::Secondary)
    }

    /// Returns whether content keys of this kind may carry a project id.
    #[must_use]
    pub const fn allows_project(&self) -> bool {
        matches!(self, Self::Peer)
    }

    /// Returns the approval stage gating this kind, if any.
    #[must_use]
    pub const fn approval_stage(&self) -> Option<EvaluationStage> {
        match self {
            Self::SelfEvaluation => Some(EvaluationStage::SelfEvaluation),
            Self::Primary => Some(EvaluationStage::Primary),
            Self::Secondary => Some(EvaluationStage::Secondary),
            Self::Peer | Self::Final => None,
        }
    }
}

impl FromStr for EvaluationKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for EvaluationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The party a revision request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    /// The employee being evaluated.
    Evaluatee,
    /// The evaluator who must re-affirm their evaluation.
    Evaluator,
}

impl RecipientType {
    /// Returns the string representation of the recipient type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluatee => "evaluatee",
            Self::Evaluator => "evaluator",
        }
    }

    /// Parses a recipient type from its string representation.
    fn parse_str(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "evaluatee" => Ok(Self::Evaluatee),
            "evaluator" => Ok(Self::Evaluator),
            _ => Err(WorkflowError::InvalidRecipientType(s.to_string())),
        }
    }
}

impl FromStr for RecipientType {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_string_round_trip() {
        for stage in EvaluationStage::ALL {
            let s = stage.as_str();
            match EvaluationStage::parse_str(s) {
                Ok(parsed) => assert_eq!(stage, parsed),
                Err(e) => panic!("Failed to parse stage string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_stage_string() {
        assert!(EvaluationStage::parse_str("upward").is_err());
    }

    #[test]
    fn test_stage_order_is_ascending() {
        assert!(EvaluationStage::Criteria.order() < EvaluationStage::SelfEvaluation.order());
        assert!(EvaluationStage::SelfEvaluation.order() < EvaluationStage::Primary.order());
        assert!(EvaluationStage::Primary.order() < EvaluationStage::Secondary.order());
    }

    #[test]
    fn test_downstream_of_self() {
        assert_eq!(
            EvaluationStage::SelfEvaluation.downstream(),
            vec![EvaluationStage::Primary, EvaluationStage::Secondary]
        );
    }

    #[test]
    fn test_downstream_of_secondary_is_empty() {
        assert!(EvaluationStage::Secondary.downstream().is_empty());
    }

    #[test]
    fn test_evaluator_discriminator_required_for_downward_stages() {
        assert!(!EvaluationStage::Criteria.requires_evaluator());
        assert!(!EvaluationStage::SelfEvaluation.requires_evaluator());
        assert!(EvaluationStage::Primary.requires_evaluator());
        assert!(EvaluationStage::Secondary.requires_evaluator());
    }

    #[test]
    fn test_criteria_has_no_content_kind() {
        assert_eq!(EvaluationStage::Criteria.content_kind(), None);
        assert_eq!(
            EvaluationStage::SelfEvaluation.content_kind(),
            Some(EvaluationKind::SelfEvaluation)
        );
    }

    #[test]
    fn test_kind_string_round_trip() {
        for kind in [
            EvaluationKind::SelfEvaluation,
            EvaluationKind::Peer,
            EvaluationKind::Primary,
            EvaluationKind::Secondary,
            EvaluationKind::Final,
        ] {
            let s = kind.as_str();
            match EvaluationKind::parse_str(s) {
                Ok(parsed) => assert_eq!(kind, parsed),
                Err(e) => panic!("Failed to parse kind string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_only_peer_kind_allows_project() {
        assert!(EvaluationKind::Peer.allows_project());
        assert!(!EvaluationKind::SelfEvaluation.allows_project());
        assert!(!EvaluationKind::Final.allows_project());
    }

    #[test]
    fn test_peer_and_final_have_no_approval_stage() {
        assert_eq!(EvaluationKind::Peer.approval_stage(), None);
        assert_eq!(EvaluationKind::Final.approval_stage(), None);
        assert_eq!(
            EvaluationKind::Secondary.approval_stage(),
            Some(EvaluationStage::Secondary)
        );
    }

    #[test]
    fn test_recipient_type_round_trip() {
        for rt in [RecipientType::Evaluatee, RecipientType::Evaluator] {
            assert_eq!(RecipientType::parse_str(rt.as_str()).unwrap(), rt);
        }
    }
}
