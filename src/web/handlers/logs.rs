//! # Task Log Handlers
//!
//! Two spellings of the same lookup: a JSON body, and the scheduler-style
//! path `/api/dags/:dag_id/dagRuns/:dag_run_id/taskInstances/:task_id/log`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::required;
use crate::constants::DEFAULT_TRY_NUMBER;
use crate::logs::LogKey;
use crate::services::TaskLog;
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskLogRequest {
    pub dag_id: Option<String>,
    pub run_id: Option<String>,
    pub task_id: Option<String>,
    pub try_number: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TryNumberQuery {
    pub try_number: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TaskInstancePath {
    pub dag_id: String,
    pub dag_run_id: String,
    pub task_id: String,
}

/// POST /api/dags/exec-results/task-logs
pub async fn task_log(
    State(state): State<AppState>,
    body: Result<Json<TaskLogRequest>, JsonRejection>,
) -> ApiResult<Json<TaskLog>> {
    let Json(request) = body?;
    let key = LogKey::new(
        required(request.dag_id, "dag_id")?,
        required(request.run_id, "run_id")?,
        required(request.task_id, "task_id")?,
        request.try_number.unwrap_or(DEFAULT_TRY_NUMBER),
    );

    Ok(Json(state.logs.task_log(key).await?))
}

/// GET /api/dags/:dag_id/dagRuns/:dag_run_id/taskInstances/:task_id/log
pub async fn task_instance_log(
    State(state): State<AppState>,
    Path(path): Path<TaskInstancePath>,
    query: Result<Query<TryNumberQuery>, QueryRejection>,
) -> ApiResult<Json<TaskLog>> {
    let Query(params) = query?;
    let key = LogKey::new(
        path.dag_id,
        path.dag_run_id,
        path.task_id,
        params.try_number.unwrap_or(DEFAULT_TRY_NUMBER),
    );

    Ok(Json(state.logs.task_log(key).await?))
}
