//! # Web API Routes
//!
//! Route definitions organized by functionality.

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::basic_health))
}

/// Execution results and task-state queries
pub fn exec_results_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/dags/exec-results",
            get(handlers::dags::single_dag_results),
        )
        .route(
            "/api/dags/exec-results/summary",
            get(handlers::dags::dag_summaries),
        )
        .route("/api/dags/exec-results/runs", get(handlers::dags::dag_runs))
        .route(
            "/api/dags/exec-results/task-ids",
            get(handlers::tasks::window_task_ids),
        )
        .route(
            "/api/dags/exec-results/tasks",
            post(handlers::tasks::run_tasks),
        )
}

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/dags/exec-results/task-logs",
            post(handlers::logs::task_log),
        )
        .route(
            "/api/dags/:dag_id/dagRuns/:dag_run_id/taskInstances/:task_id/log",
            get(handlers::logs::task_instance_log),
        )
}

pub fn script_routes() -> Router<AppState> {
    Router::new().route(
        "/api/dags/unscheduled-scripts",
        get(handlers::scripts::unscheduled_scripts),
    )
}
