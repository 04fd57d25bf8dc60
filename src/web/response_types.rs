//! # Web API Error Types
//!
//! Error types specific to the web API and their HTTP response conversions.
//! Every error renders as `{"error": {"code": ..., "message": ...}}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::MonitorError;
use crate::logging::log_error;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A store collaborator failed; the reason is logged, not returned
    #[error("{collaborator} unavailable")]
    CollaboratorUnavailable { collaborator: String },

    #[error("Log read failed: {message}")]
    LogReadError { message: String },

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::CollaboratorUnavailable { .. }
            | ApiError::LogReadError { .. }
            | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_code = match &self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::CollaboratorUnavailable { .. } => "COLLABORATOR_UNAVAILABLE",
            ApiError::LogReadError { .. } => "LOG_READ_ERROR",
            ApiError::Internal => "INTERNAL_ERROR",
        };
        let message = match &self {
            ApiError::BadRequest { message }
            | ApiError::NotFound { message }
            | ApiError::LogReadError { message } => message.clone(),
            other => other.to_string(),
        };

        let error_response = json!({
            "error": {
                "code": error_code,
                "message": message
            }
        });

        (self.status_code(), Json(error_response)).into_response()
    }
}

impl From<MonitorError> for ApiError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::InvalidInput(message) => ApiError::BadRequest { message },
            MonitorError::NotFound(message) => ApiError::NotFound { message },
            MonitorError::TransientReadError(message) => ApiError::LogReadError { message },
            MonitorError::CollaboratorUnavailable {
                collaborator,
                reason,
            } => {
                log_error("web", "collaborator_call", &reason, Some(&collaborator));
                ApiError::CollaboratorUnavailable { collaborator }
            }
            MonitorError::Configuration(reason) => {
                log_error("web", "configuration", &reason, None);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Result type alias for web API operations
pub type ApiResult<T> = Result<T, ApiError>;
