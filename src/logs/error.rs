use std::path::PathBuf;
use thiserror::Error;

use crate::error::MonitorError;

/// Terminal failure of a log lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("log file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read log file {}: {reason}", path.display())]
    ReadError { path: PathBuf, reason: String },
}

/// Failure of the remote tier; always recoverable by the local tier
#[derive(Debug, Error)]
pub enum RemoteLogError {
    #[error("remote log request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote log endpoint returned status {status}")]
    Status { status: u16 },

    #[error("malformed remote log payload: {0}")]
    MalformedPayload(String),

    #[error("invalid remote log url: {0}")]
    InvalidUrl(String),
}

impl From<LogError> for MonitorError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::NotFound { .. } => MonitorError::NotFound(err.to_string()),
            LogError::ReadError { .. } => MonitorError::TransientReadError(err.to_string()),
        }
    }
}
