use thiserror::Error;

use crate::error::MonitorError;

pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Errors raised by the lineage graph collaborator
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("graph endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Statement-level errors reported inside a 2xx response
    #[error("graph query failed ({code}): {message}")]
    Query { code: String, message: String },

    #[error("unexpected graph response: {0}")]
    MalformedResponse(String),
}

impl From<GraphError> for MonitorError {
    fn from(err: GraphError) -> Self {
        MonitorError::unavailable("graph store", err)
    }
}
