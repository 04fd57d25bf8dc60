//! # DAG Run and Task Instance Rows
//!
//! Read-only views over the scheduler's `dag_run` and `task_instance`
//! tables. Nothing here is ever written back.
//!
//! ## Database Schema
//!
//! Only the columns the monitor reads:
//! ```sql
//! dag_run(dag_id, run_id, logical_date timestamptz, start_date timestamptz, state)
//! task_instance(dag_id, run_id, task_id, state, operator, try_number)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// One DAG run inside a query window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub logical_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub state: Option<String>,
}

/// One task instance belonging to a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TaskRecord {
    pub task_id: String,
    pub state: Option<String>,
    pub operator: Option<String>,
    pub try_number: i32,
}

/// Flat row produced by the run/task join.
///
/// Task columns are `NULL` for runs without in-scope task instances
/// (the join is a `LEFT JOIN`).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RunTaskRow {
    pub run_id: String,
    pub logical_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub run_state: Option<String>,
    pub task_id: Option<String>,
    pub task_state: Option<String>,
    pub operator: Option<String>,
    pub try_number: Option<i32>,
}

/// Runs in query order plus their tasks keyed by run id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunsWithTasks {
    pub runs: Vec<RunRecord>,
    pub tasks_by_run: HashMap<String, Vec<TaskRecord>>,
}

impl RunsWithTasks {
    /// Group joined rows by run, keeping the row order for both runs and tasks.
    pub fn from_rows(rows: impl IntoIterator<Item = RunTaskRow>) -> Self {
        let mut grouped = Self::default();

        for row in rows {
            if !grouped.tasks_by_run.contains_key(&row.run_id) {
                grouped.runs.push(RunRecord {
                    run_id: row.run_id.clone(),
                    logical_date: row.logical_date,
                    start_date: row.start_date,
                    state: row.run_state.clone(),
                });
                grouped.tasks_by_run.insert(row.run_id.clone(), Vec::new());
            }

            if let Some(task_id) = row.task_id {
                grouped
                    .tasks_by_run
                    .entry(row.run_id)
                    .or_default()
                    .push(TaskRecord {
                        task_id,
                        state: row.task_state,
                        operator: row.operator,
                        try_number: row.try_number.unwrap_or(1),
                    });
            }
        }

        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.tasks_by_run.values().map(Vec::len).sum()
    }
}
