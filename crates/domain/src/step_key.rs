// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Composite keys identifying step approvals and evaluation content.
//!
//! A step approval is keyed by `(period, employee, stage)` plus an
//! evaluator discriminator for the downward stages. Evaluation content
//! is keyed by `(period, employee, kind)` plus an evaluator for
//! evaluator-authored kinds and an optional project for peer reviews.

use crate::error::WorkflowError;
use crate::stage::{EvaluationKind, EvaluationStage, RecipientType};
use serde::{Deserialize, Serialize};

/// Identifies one step approval record.
///
/// Exactly one live record exists per key. The evaluator discriminator
/// is present if and only if the stage requires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepKey {
    period_id: i64,
    employee_id: i64,
    stage: EvaluationStage,
    evaluator_id: Option<i64>,
}

impl StepKey {
    /// Creates a new `StepKey`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::MissingEvaluator` if the stage carries an
    /// evaluator discriminator and none was supplied, and
    /// `WorkflowError::UnexpectedEvaluator` for the inverse mismatch.
    pub fn new(
        period_id: i64,
        employee_id: i64,
        stage: EvaluationStage,
        evaluator_id: Option<i64>,
    ) -> Result<Self, WorkflowError> {
        if stage.requires_evaluator() && evaluator_id.is_none() {
            return Err(WorkflowError::MissingEvaluator {
                stage: stage.as_str().to_string(),
            });
        }
        if !stage.requires_evaluator() && evaluator_id.is_some() {
            return Err(WorkflowError::UnexpectedEvaluator {
                stage: stage.as_str().to_string(),
            });
        }
        Ok(Self {
            period_id,
            employee_id,
            stage,
            evaluator_id,
        })
    }

    /// Returns the evaluation period id.
    #[must_use]
    pub const fn period_id(&self) -> i64 {
        self.period_id
    }

    /// Returns the employee id.
    #[must_use]
    pub const fn employee_id(&self) -> i64 {
        self.employee_id
    }

    /// Returns the stage.
    #[must_use]
    pub const fn stage(&self) -> EvaluationStage {
        self.stage
    }

    /// Returns the evaluator id for downward-stage keys.
    #[must_use]
    pub const fn evaluator_id(&self) -> Option<i64> {
        self.evaluator_id
    }

    /// Returns the recipients a revision request on this key fans out to.
    ///
    /// Criteria and self-evaluation revisions address the evaluatee only.
    /// Downward-stage revisions additionally address the evaluator, who
    /// must re-affirm their own evaluation.
    #[must_use]
    pub fn revision_recipients(&self) -> Vec<(i64, RecipientType)> {
        let mut recipients = vec![(self.employee_id, RecipientType::Evaluatee)];
        if let Some(evaluator_id) = self.evaluator_id {
            recipients.push((evaluator_id, RecipientType::Evaluator));
        }
        recipients
    }
}

impl std::fmt::Display for StepKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.evaluator_id {
            Some(evaluator_id) => write!(
                f,
                "period={}/employee={}/stage={}/evaluator={evaluator_id}",
                self.period_id,
                self.employee_id,
                self.stage.as_str()
            ),
            None => write!(
                f,
                "period={}/employee={}/stage={}",
                self.period_id,
                self.employee_id,
                self.stage.as_str()
            ),
        }
    }
}

/// Identifies one evaluation content record.
///
/// The upsert coordinator guarantees at most one live content row per
/// key. Peer evaluations may additionally be scoped to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationKey {
    period_id: i64,
    employee_id: i64,
    kind: EvaluationKind,
    evaluator_id: Option<i64>,
    project_id: Option<i64>,
}

impl EvaluationKey {
    /// Creates a new `EvaluationKey`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::MissingEvaluator` or
    /// `WorkflowError::UnexpectedEvaluator` if the evaluator
    /// discriminator does not match the kind, and
    /// `WorkflowError::UnexpectedProject` if a project id is supplied
    /// for a kind that is never project-scoped.
    pub fn new(
        period_id: i64,
        employee_id: i64,
        kind: EvaluationKind,
        evaluator_id: Option<i64>,
        project_id: Option<i64>,
    ) -> Result<Self, WorkflowError> {
        if kind.requires_evaluator() && evaluator_id.is_none() {
            return Err(WorkflowError::MissingEvaluator {
                stage: kind.as_str().to_string(),
            });
        }
        if !kind.requires_evaluator() && evaluator_id.is_some() {
            return Err(WorkflowError::UnexpectedEvaluator {
                stage: kind.as_str().to_string(),
            });
        }
        if project_id.is_some() && !kind.allows_project() {
            return Err(WorkflowError::UnexpectedProject {
                kind: kind.as_str().to_string(),
            });
        }
        Ok(Self {
            period_id,
            employee_id,
            kind,
            evaluator_id,
            project_id,
        })
    }

    /// Returns the evaluation period id.
    #[must_use]
    pub const fn period_id(&self) -> i64 {
        self.period_id
    }

    /// Returns the evaluatee's employee id.
    #[must_use]
    pub const fn employee_id(&self) -> i64 {
        self.employee_id
    }

    /// Returns the evaluation kind.
    #[must_use]
    pub const fn kind(&self) -> EvaluationKind {
        self.kind
    }

    /// Returns the authoring evaluator id, if the kind has one.
    #[must_use]
    pub const fn evaluator_id(&self) -> Option<i64> {
        self.evaluator_id
    }

    /// Returns the project scope for peer evaluations.
    #[must_use]
    pub const fn project_id(&self) -> Option<i64> {
        self.project_id
    }

    /// Returns the step approval key gating this content, if any.
    ///
    /// Peer and final evaluations have no approval gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the gating stage requires an evaluator the
    /// key does not carry; `new` makes this unreachable for keys built
    /// through the public constructor.
    pub fn step_key(&self) -> Result<Option<StepKey>, WorkflowError> {
        match self.kind.approval_stage() {
            Some(stage) => Ok(Some(StepKey::new(
                self.period_id,
                self.employee_id,
                stage,
                self.evaluator_id,
            )?)),
            None => Ok(None),
        }
    }
}

impl std::fmt::Display for EvaluationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "period={}/employee={}/kind={}",
            self.period_id,
            self.employee_id,
            self.kind.as_str()
        )?;
        if let Some(evaluator_id) = self.evaluator_id {
            write!(f, "/evaluator={evaluator_id}")?;
        }
        if let Some(project_id) = self.project_id {
            write!(f, "/project={project_id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_downward_step_key_requires_evaluator() {
        let result = StepKey::new(1, 10, EvaluationStage::Primary, None);
        assert_eq!(
            result,
            Err(WorkflowError::MissingEvaluator {
                stage: String::from("primary"),
            })
        );
    }

    #[test]
    fn test_self_step_key_rejects_evaluator() {
        let result = StepKey::new(1, 10, EvaluationStage::SelfEvaluation, Some(20));
        assert_eq!(
            result,
            Err(WorkflowError::UnexpectedEvaluator {
                stage: String::from("self"),
            })
        );
    }

    #[test]
    fn test_self_revision_addresses_evaluatee_only() {
        let key = StepKey::new(1, 10, EvaluationStage::SelfEvaluation, None).unwrap();
        assert_eq!(
            key.revision_recipients(),
            vec![(10, RecipientType::Evaluatee)]
        );
    }

    #[test]
    fn test_downward_revision_addresses_evaluatee_and_evaluator() {
        let key = StepKey::new(1, 10, EvaluationStage::Secondary, Some(20)).unwrap();
        assert_eq!(
            key.revision_recipients(),
            vec![
                (10, RecipientType::Evaluatee),
                (20, RecipientType::Evaluator),
            ]
        );
    }

    #[test]
    fn test_peer_evaluation_key_allows_project_scope() {
        let key = EvaluationKey::new(1, 10, EvaluationKind::Peer, Some(20), Some(30)).unwrap();
        assert_eq!(key.project_id(), Some(30));
        assert_eq!(key.step_key().unwrap(), None);
    }

    #[test]
    fn test_self_evaluation_key_rejects_project_scope() {
        let result = EvaluationKey::new(1, 10, EvaluationKind::SelfEvaluation, None, Some(30));
        assert_eq!(
            result,
            Err(WorkflowError::UnexpectedProject {
                kind: String::from("self"),
            })
        );
    }

    #[test]
    fn test_secondary_content_key_maps_to_secondary_step_key() {
        let key = EvaluationKey::new(1, 10, EvaluationKind::Secondary, Some(20), None).unwrap();
        let step = key.step_key().unwrap().unwrap();
        assert_eq!(step.stage(), EvaluationStage::Secondary);
        assert_eq!(step.evaluator_id(), Some(20));
    }

    #[test]
    fn test_final_evaluation_has_no_step_key() {
        let key = EvaluationKey::new(1, 10, EvaluationKind::Final, None, None).unwrap();
        assert_eq!(key.step_key().unwrap(), None);
    }

    #[test]
    fn test_step_key_display_includes_evaluator_when_present() {
        let key = StepKey::new(7, 11, EvaluationStage::Primary, Some(13)).unwrap();
        assert_eq!(
            key.to_string(),
            "period=7/employee=11/stage=primary/evaluator=13"
        );
    }
}
