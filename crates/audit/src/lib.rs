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
    clippy::all
)]

use evalflow_domain::{StepApprovalStatus, StepKey};

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change.
/// Every mutating operation requires an explicit actor; there is no
/// synthetic system-identity fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: i64,
    /// The type of actor (e.g., "admin", "evaluator", "employee").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: i64, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// An immutable record of one step approval transition.
///
/// Every successful workflow mutation produces exactly one transition
/// event capturing:
/// - The step approval key the transition applies to (key)
/// - The status before the transition (`from_status`, absent when the
///   record was created lazily by this transition)
/// - The status after the transition (`to_status`)
/// - Who performed the action (actor)
/// - When it happened (`occurred_at`, RFC 3339)
///
/// Delivery of these records to downstream notification or activity-log
/// consumers is not this crate's responsibility; the obligation ends at
/// producing a stable, complete record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    /// The step approval key this transition applies to.
    pub key: StepKey,
    /// The status before the transition, if a record already existed.
    pub from_status: Option<StepApprovalStatus>,
    /// The status after the transition.
    pub to_status: StepApprovalStatus,
    /// The actor who initiated this transition.
    pub actor: Actor,
    /// When the transition occurred (RFC 3339).
    pub occurred_at: String,
}

impl TransitionEvent {
    /// Creates a new `TransitionEvent`.
    ///
    /// Once created, a transition event is immutable.
    ///
    /// # Arguments
    ///
    /// * `key` - The step approval key
    /// * `from_status` - The status before the transition, if any
    /// * `to_status` - The status after the transition
    /// * `actor` - The actor who initiated the transition
    /// * `occurred_at` - When the transition occurred (RFC 3339)
    #[must_use]
    pub const fn new(
        key: StepKey,
        from_status: Option<StepApprovalStatus>,
        to_status: StepApprovalStatus,
        actor: Actor,
        occurred_at: String,
    ) -> Self {
        Self {
            key,
            from_status,
            to_status,
            actor,
            occurred_at,
        }
    }
}
