//! Builders for scheduler rows and a fully wired [`AppState`].

use axum::Router;
use chrono::{DateTime, FixedOffset, Utc};
use std::path::Path;
use std::sync::Arc;

use dag_monitor::config::MonitorConfig;
use dag_monitor::logs::{LocalLogStore, LogRetriever, RemoteLogFetcher};
use dag_monitor::models::{RunTaskRow, RunsWithTasks};
use dag_monitor::web::{create_app, AppState};

use super::fakes::{FakeGraphStore, FakeRunStore};

pub fn offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

pub fn utc(instant: &str) -> DateTime<Utc> {
    instant.parse().unwrap()
}

/// Joined rows for one run, one row per `(task_id, state)`
pub fn run_rows(run_id: &str, started: &str, tasks: &[(&str, &str)]) -> Vec<RunTaskRow> {
    let base = RunTaskRow {
        run_id: run_id.to_string(),
        logical_date: Some(utc(started)),
        start_date: Some(utc(started)),
        run_state: Some("success".to_string()),
        task_id: None,
        task_state: None,
        operator: None,
        try_number: None,
    };

    if tasks.is_empty() {
        return vec![base];
    }

    tasks
        .iter()
        .map(|(task_id, state)| RunTaskRow {
            task_id: Some((*task_id).to_string()),
            task_state: Some((*state).to_string()),
            operator: Some("PythonOperator".to_string()),
            try_number: Some(1),
            ..base.clone()
        })
        .collect()
}

pub fn runs(rows: Vec<Vec<RunTaskRow>>) -> RunsWithTasks {
    RunsWithTasks::from_rows(rows.into_iter().flatten())
}

/// One run of `etl_daily` starting 2024-03-01 09:00 local time with
/// 2 success, 1 failed and 1 running task
pub fn etl_daily_runs() -> RunsWithTasks {
    runs(vec![run_rows(
        "scheduled__2024-03-01T01:00:00+00:00",
        "2024-03-01T01:00:00Z",
        &[
            ("extract.orders.py-TO-orders", "success"),
            ("extract.customers.py-TO-customers", "success"),
            ("transform.revenue.py-TO-revenue", "failed"),
            ("load.report.py-TO-daily_report", "running"),
        ],
    )])
}

pub fn test_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.monitor.default_dag_id = "etl_daily".to_string();
    config.monitor.dag_ids = vec!["etl_daily".to_string(), "etl_hourly".to_string()];
    config
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub fn build_app(
    runs: Arc<FakeRunStore>,
    graph: FakeGraphStore,
    remote: Option<Arc<dyn RemoteLogFetcher>>,
    log_dir: &Path,
) -> TestApp {
    let config = Arc::new(test_config());
    let retriever = Arc::new(LogRetriever::new(
        remote,
        Arc::new(LocalLogStore::new(log_dir)),
    ));
    let state = AppState::new(
        config.clone(),
        offset(),
        runs,
        Arc::new(graph),
        retriever,
    );
    let router = create_app(state.clone(), &config.web);
    TestApp { state, router }
}
