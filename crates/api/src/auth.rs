// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use evalflow_audit::Actor;
use evalflow_domain::StepKey;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: HR administrators with structural and corrective
    /// authority.
    ///
    /// Admins may perform:
    /// - creation of evaluation periods and projects
    /// - evaluator assignment and evaluation-target registration
    /// - step approval and revision-request transitions on any key
    /// - final evaluations and the phase sweep
    /// - any read over the full registry
    Admin,
    /// Evaluator role: managers writing downward and peer evaluations.
    ///
    /// Evaluators may:
    /// - save and submit evaluations they author
    /// - transition step approvals keyed to them as the evaluator
    /// - read and respond to revision requests addressed to them
    Evaluator,
    /// Employee role: the evaluatee.
    ///
    /// Employees may:
    /// - save and submit their own self-evaluation
    /// - read and respond to revision requests addressed to them
    Employee,
}

impl Role {
    /// Returns the audit string for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Evaluator => "evaluator",
            Self::Employee => "employee",
        }
    }
}

/// An authenticated actor with an associated role.
///
/// This represents a caller who has been authenticated and has
/// permission to perform certain actions based on their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: i64,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    ///
    /// This is used when recording transition events to attribute
    /// actions to the authenticated caller.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id, self.role.as_str().to_string())
    }
}

/// Stub authentication function.
///
/// This is a minimal placeholder; real authentication lives in the
/// out-of-scope transport layer. In a real system this would validate
/// credentials, check tokens, or integrate with an identity provider.
///
/// # Arguments
///
/// * `actor_id` - The identifier of the actor to authenticate
/// * `role` - The role to assign to the actor
///
/// # Errors
///
/// Returns an error if the actor id is not a positive identifier.
pub fn authenticate_stub(actor_id: i64, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id <= 0 {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID must be a positive identifier"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated actor has permission
/// to perform a specific action based on their role and, for
/// self-service actions, their own identity.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor holds the Admin role.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The action name used in the error message
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Evaluator | Role::Employee => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks that an actor may transition the given step approval key.
    ///
    /// Admins may transition any key; evaluators only keys carrying
    /// their own evaluator id.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither an admin nor the key's
    /// evaluator.
    pub fn authorize_transition(
        actor: &AuthenticatedActor,
        key: &StepKey,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Evaluator if key.evaluator_id() == Some(actor.id) => Ok(()),
            Role::Evaluator | Role::Employee => Err(AuthError::Unauthorized {
                action: String::from("transition_step"),
                required_role: String::from("Admin or the key's evaluator"),
            }),
        }
    }

    /// Checks that an actor may write content authored by `author_id`.
    ///
    /// Admins may write on behalf of anyone; other roles only content
    /// they author themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither an admin nor the author.
    pub fn authorize_author(
        actor: &AuthenticatedActor,
        author_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == Role::Admin || actor.id == author_id {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin or the content author"),
            })
        }
    }

    /// Checks that an actor may act on a recipient's revision rows.
    ///
    /// Admins may act on any recipient's behalf; other roles only on
    /// rows addressed to themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither an admin nor the
    /// recipient.
    pub fn authorize_recipient(
        actor: &AuthenticatedActor,
        recipient_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == Role::Admin || actor.id == recipient_id {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin or the addressed recipient"),
            })
        }
    }

    /// Checks that an actor may read a `(period, employee)` scope.
    ///
    /// Admins and evaluators may read any scope; employees only their
    /// own.
    ///
    /// # Errors
    ///
    /// Returns an error if an employee reads another employee's scope.
    pub fn authorize_scope_read(
        actor: &AuthenticatedActor,
        employee_id: i64,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Evaluator => Ok(()),
            Role::Employee if actor.id == employee_id => Ok(()),
            Role::Employee => Err(AuthError::Unauthorized {
                action: String::from("read_workflow_status"),
                required_role: String::from("Admin, Evaluator, or the employee themselves"),
            }),
        }
    }
}
