//! # Web API Handlers
//!
//! HTTP handlers grouped by resource. Handlers validate parameters, call one
//! service and serialize its result; all logic lives in the services.

pub mod dags;
pub mod health;
pub mod logs;
pub mod scripts;
pub mod tasks;

use crate::web::response_types::{ApiError, ApiResult};

/// Require a query or body parameter to be present and non-blank.
/// The value is returned untouched.
pub(crate) fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("missing required parameter: {name}")))
}
