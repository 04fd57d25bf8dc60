//! # DAG Execution Result Handlers
//!
//! The three dashboard shapes for one local calendar date:
//! - `GET /api/dags/exec-results`: the configured default DAG, keyed by run start
//! - `GET /api/dags/exec-results/summary`: per-DAG overview with totals
//! - `GET /api/dags/exec-results/runs`: per-DAG flattened run list

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use super::required;
use crate::aggregation::{DagOverview, FlattenedDagRuns, SingleDagResults};
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExecDateQuery {
    pub exec_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MultiDagQuery {
    pub exec_date: Option<String>,
    /// Comma-separated DAG ids; the monitored list when absent
    pub dag_ids: Option<String>,
}

pub async fn single_dag_results(
    State(state): State<AppState>,
    query: Result<Query<ExecDateQuery>, QueryRejection>,
) -> ApiResult<Json<SingleDagResults>> {
    let Query(params) = query?;
    let exec_date = required(params.exec_date, "exec_date")?;

    let results = state
        .execution_results
        .single_dag_results(state.default_dag_id(), &exec_date)
        .await?;

    debug!(runs = results.len(), "Single DAG results assembled");
    Ok(Json(results))
}

pub async fn dag_summaries(
    State(state): State<AppState>,
    query: Result<Query<MultiDagQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<DagOverview>>> {
    let Query(params) = query?;
    let exec_date = required(params.exec_date, "exec_date")?;
    let dag_ids = state.resolve_dag_ids(params.dag_ids.as_deref());

    let overviews = state
        .execution_results
        .dag_overviews(&dag_ids, &exec_date)
        .await?;
    Ok(Json(overviews))
}

pub async fn dag_runs(
    State(state): State<AppState>,
    query: Result<Query<MultiDagQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<FlattenedDagRuns>>> {
    let Query(params) = query?;
    let exec_date = required(params.exec_date, "exec_date")?;
    let dag_ids = state.resolve_dag_ids(params.dag_ids.as_deref());

    let runs = state
        .execution_results
        .flattened_runs(&dag_ids, &exec_date)
        .await?;
    Ok(Json(runs))
}
