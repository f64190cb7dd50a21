// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evalflow_domain::WorkflowError;

/// Errors that can occur during persistence operations.
///
/// Workflow rule violations raised inside a unit of work are carried
/// unchanged in the `Workflow` variant so the API layer can surface
/// them without loss.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// A workflow rule was violated inside a unit of work.
    Workflow(WorkflowError),
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workflow(err) => write!(f, "{err}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<WorkflowError> for PersistenceError {
    fn from(err: WorkflowError) -> Self {
        Self::Workflow(err)
    }
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
