// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod phase;
mod stage;
mod status;
mod step_key;
mod validation;

#[cfg(test)]
mod tests;

pub use error::WorkflowError;
pub use phase::{PeriodDeadlines, PeriodPhase, phase_for};
pub use stage::{EvaluationKind, EvaluationStage, RecipientType};
pub use status::StepApprovalStatus;
pub use step_key::{EvaluationKey, StepKey};
pub use validation::{
    MAX_SCORE, MIN_SCORE, validate_response_comment, validate_revision_comment, validate_score,
};
