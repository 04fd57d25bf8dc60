//! # Task State Handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::required;
use crate::constants::ALL_STATES;
use crate::services::RunTaskView;
use crate::state::StateFilter;
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskIdsQuery {
    pub dag_id: Option<String>,
    pub exec_date: Option<String>,
    /// Comma-separated category names, or `all`
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskIdsResponse {
    pub dag_id: String,
    pub exec_date: String,
    pub state: String,
    pub task_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RunTasksRequest {
    pub dag_id: Option<String>,
    pub run_id: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunTasksResponse {
    pub dag_id: String,
    pub run_id: String,
    pub tasks: Vec<RunTaskView>,
}

fn echoed_state(state: Option<String>) -> String {
    state
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ALL_STATES.to_string())
}

/// Task ids by state in a date window: GET /api/dags/exec-results/task-ids
pub async fn window_task_ids(
    State(state): State<AppState>,
    query: Result<Query<TaskIdsQuery>, QueryRejection>,
) -> ApiResult<Json<TaskIdsResponse>> {
    let Query(params) = query?;
    let dag_id = required(params.dag_id, "dag_id")?;
    let exec_date = required(params.exec_date, "exec_date")?;
    let filter = StateFilter::parse(params.state.as_deref())?;

    let task_ids = state
        .tasks
        .window_task_ids(&dag_id, &exec_date, &filter)
        .await?;

    Ok(Json(TaskIdsResponse {
        dag_id,
        exec_date,
        state: echoed_state(params.state),
        task_ids,
    }))
}

/// Tasks of one run with their target tables: POST /api/dags/exec-results/tasks
pub async fn run_tasks(
    State(state): State<AppState>,
    body: Result<Json<RunTasksRequest>, JsonRejection>,
) -> ApiResult<Json<RunTasksResponse>> {
    let Json(request) = body?;
    let dag_id = required(request.dag_id, "dag_id")?;
    let run_id = required(request.run_id, "run_id")?;
    let filter = StateFilter::parse(request.state.as_deref())?;

    let tasks = state.tasks.tasks_for_run(&dag_id, &run_id, &filter).await?;

    Ok(Json(RunTasksResponse {
        dag_id,
        run_id,
        tasks,
    }))
}
