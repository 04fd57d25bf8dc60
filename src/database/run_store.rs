//! # Run Store
//!
//! The relational collaborator: DAG runs and task instances read from the
//! scheduler's metadata tables. Every query is restricted to one operator
//! kind (`monitor.operator`, `PythonOperator` unless configured otherwise).
//!
//! State filters are passed as an optional `text[]`; `NULL` means unfiltered,
//! so callers never have to expand "all" into concrete states.

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::error::MonitorResult;
use crate::logging::log_query_operation;
use crate::models::{RunTaskRow, RunsWithTasks, TaskRecord};
use crate::time_window::UtcWindow;

/// Read-only access to runs and task instances
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Runs whose start falls inside `window`, with their in-scope tasks.
    ///
    /// Runs are ordered by start time, tasks by task id. Runs without any
    /// in-scope task are still returned.
    async fn query_runs_and_tasks(
        &self,
        dag_id: &str,
        window: &UtcWindow,
    ) -> MonitorResult<RunsWithTasks>;

    /// Distinct task ids (ascending) of tasks in runs started inside `window`.
    /// `states: None` means unfiltered.
    async fn query_tasks_by_state(
        &self,
        dag_id: &str,
        window: &UtcWindow,
        states: Option<&[String]>,
    ) -> MonitorResult<Vec<String>>;

    /// Task instances of one run, ordered by task id.
    async fn query_tasks_by_run(
        &self,
        dag_id: &str,
        run_id: &str,
        states: Option<&[String]>,
    ) -> MonitorResult<Vec<TaskRecord>>;
}

const RUNS_AND_TASKS_SQL: &str = r#"
    SELECT
      dr.run_id,
      dr.logical_date,
      dr.start_date,
      dr.state AS run_state,
      ti.task_id,
      ti.state AS task_state,
      ti.operator,
      ti.try_number
    FROM dag_run dr
    LEFT JOIN task_instance ti
      ON ti.dag_id = dr.dag_id
     AND ti.run_id = dr.run_id
     AND ti.operator = $4
    WHERE dr.dag_id = $1
      AND dr.start_date BETWEEN $2 AND $3
    ORDER BY dr.start_date ASC, ti.task_id ASC
"#;

const TASKS_BY_STATE_SQL: &str = r#"
    SELECT DISTINCT ti.task_id
    FROM dag_run dr
    JOIN task_instance ti
      ON ti.dag_id = dr.dag_id
     AND ti.run_id = dr.run_id
    WHERE dr.dag_id = $1
      AND dr.start_date BETWEEN $2 AND $3
      AND ti.operator = $4
      AND ($5::text[] IS NULL OR ti.state = ANY($5))
    ORDER BY ti.task_id ASC
"#;

const TASKS_BY_RUN_SQL: &str = r#"
    SELECT
      ti.task_id,
      ti.state,
      ti.operator,
      ti.try_number
    FROM task_instance ti
    WHERE ti.dag_id = $1
      AND ti.run_id = $2
      AND ti.operator = $3
      AND ($4::text[] IS NULL OR ti.state = ANY($4))
    ORDER BY ti.task_id ASC
"#;

/// [`RunStore`] backed by the scheduler's PostgreSQL database
#[derive(Debug, Clone)]
pub struct PgRunStore {
    pool: PgPool,
    operator: String,
}

impl PgRunStore {
    pub fn new(pool: PgPool, operator: impl Into<String>) -> Self {
        Self {
            pool,
            operator: operator.into(),
        }
    }
}

fn elapsed_ms(started: Instant) -> Option<u64> {
    u64::try_from(started.elapsed().as_millis()).ok()
}

#[async_trait]
impl RunStore for PgRunStore {
    #[instrument(skip(self), fields(operator = %self.operator))]
    async fn query_runs_and_tasks(
        &self,
        dag_id: &str,
        window: &UtcWindow,
    ) -> MonitorResult<RunsWithTasks> {
        let started = Instant::now();

        let rows = sqlx::query_as::<_, RunTaskRow>(RUNS_AND_TASKS_SQL)
            .bind(dag_id)
            .bind(window.start)
            .bind(window.end)
            .bind(&self.operator)
            .fetch_all(&self.pool)
            .await?;

        log_query_operation(
            "query_runs_and_tasks",
            dag_id,
            Some(rows.len()),
            elapsed_ms(started),
            None,
        );

        let grouped = RunsWithTasks::from_rows(rows);
        debug!(
            runs = grouped.runs.len(),
            tasks = grouped.task_count(),
            "Grouped run/task rows"
        );
        Ok(grouped)
    }

    #[instrument(skip(self), fields(operator = %self.operator))]
    async fn query_tasks_by_state(
        &self,
        dag_id: &str,
        window: &UtcWindow,
        states: Option<&[String]>,
    ) -> MonitorResult<Vec<String>> {
        let started = Instant::now();

        let task_ids = sqlx::query_scalar::<_, String>(TASKS_BY_STATE_SQL)
            .bind(dag_id)
            .bind(window.start)
            .bind(window.end)
            .bind(&self.operator)
            .bind(states.map(<[String]>::to_vec))
            .fetch_all(&self.pool)
            .await?;

        log_query_operation(
            "query_tasks_by_state",
            dag_id,
            Some(task_ids.len()),
            elapsed_ms(started),
            None,
        );
        Ok(task_ids)
    }

    #[instrument(skip(self), fields(operator = %self.operator))]
    async fn query_tasks_by_run(
        &self,
        dag_id: &str,
        run_id: &str,
        states: Option<&[String]>,
    ) -> MonitorResult<Vec<TaskRecord>> {
        let started = Instant::now();

        let tasks = sqlx::query_as::<_, TaskRecord>(TASKS_BY_RUN_SQL)
            .bind(dag_id)
            .bind(run_id)
            .bind(&self.operator)
            .bind(states.map(<[String]>::to_vec))
            .fetch_all(&self.pool)
            .await?;

        log_query_operation(
            "query_tasks_by_run",
            dag_id,
            Some(tasks.len()),
            elapsed_ms(started),
            Some(run_id),
        );
        Ok(tasks)
    }
}
