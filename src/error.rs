//! Error types for the DAG monitor.
//!

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    /// Malformed date, unknown state category, missing parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Relational or graph store unreachable or returned an error
    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        collaborator: String,
        reason: String,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Read error: {0}")]
    TransientReadError(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MonitorError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unavailable(collaborator: impl Into<String>, reason: impl ToString) -> Self {
        Self::CollaboratorUnavailable {
            collaborator: collaborator.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for MonitorError {
    fn from(err: sqlx::Error) -> Self {
        MonitorError::unavailable("scheduler database", err)
    }
}

impl From<crate::config::ConfigurationError> for MonitorError {
    fn from(err: crate::config::ConfigurationError) -> Self {
        MonitorError::Configuration(err.to_string())
    }
}

pub type MonitorResult<T> = std::result::Result<T, MonitorError>;
