//! # Response Shapes
//!
//! One builder per accepted response shape, each a pure view over the same
//! [`RunSummary`] list:
//!
//! - [`build_single_dag_map`]: start time → run, counts keyed `total`
//! - [`build_dag_overview`]: per-DAG map with `unscheduled_total` and `total`
//! - [`build_flattened_runs`]: per-DAG run list with per-run totals
//!
//! Map keys are the local start time; a run whose start time is already
//! taken by an earlier run is keyed `"{start} {run_id}"`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::aggregator::RunSummary;
use super::reconciler::{reconcile_dag, reconcile_runs};
use crate::state::CategoryCounts;

/// Category counts plus the run's task count under the key `total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    #[serde(flatten)]
    pub counts: CategoryCounts,
    pub total: i64,
}

/// Category counts plus the run's task count under the key `scheduled_total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSummary {
    #[serde(flatten)]
    pub counts: CategoryCounts,
    pub scheduled_total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSummary<S> {
    pub summary: S,
}

/// A run rendered inside the map-shaped responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunView<S> {
    pub dag_run_id: String,
    pub logical_date_local: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "PythonOperator")]
    pub python_operator: OperatorSummary<S>,
}

/// Shape A
pub type SingleDagResults = BTreeMap<String, RunView<TaskSummary>>;

/// Shape B
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagOverview {
    pub dag_id: String,
    pub scheduled_runs: BTreeMap<String, RunView<ScheduledSummary>>,
    pub unscheduled_total: i64,
    pub total: i64,
}

/// One run in Shape C
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedRun {
    pub dag_run_id: String,
    pub local_exec_time: Option<String>,
    pub logical_date_local: Option<String>,
    pub state: Option<String>,
    pub summary: ScheduledSummary,
    pub total: i64,
    pub unscheduled_total: i64,
}

/// Shape C
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedDagRuns {
    pub dag_id: String,
    pub runs: Vec<FlattenedRun>,
}

fn run_view<S>(summary: &RunSummary, counts: S) -> RunView<S> {
    RunView {
        dag_run_id: summary.run_id.clone(),
        logical_date_local: summary.logical_date_local.clone(),
        state: summary.state.clone(),
        python_operator: OperatorSummary { summary: counts },
    }
}

fn scheduled_summary(summary: &RunSummary) -> ScheduledSummary {
    ScheduledSummary {
        counts: summary.counts,
        scheduled_total: summary.scheduled_total,
    }
}

/// Map key for every run, in order.
///
/// Runs sharing a start time would collide in the map; a key already taken
/// by an earlier run gets the run id appended.
fn run_keys(summaries: &[RunSummary]) -> Vec<String> {
    let mut taken = HashSet::with_capacity(summaries.len());
    summaries
        .iter()
        .map(|summary| {
            let mut key = summary.display_key();
            while !taken.insert(key.clone()) {
                debug!(run_id = %summary.run_id, key = %key, "Run key already taken");
                key = format!("{key} {}", summary.run_id);
            }
            key
        })
        .collect()
}

pub fn build_single_dag_map(summaries: &[RunSummary]) -> SingleDagResults {
    summaries
        .iter()
        .zip(run_keys(summaries))
        .map(|(summary, key)| {
            let counts = TaskSummary {
                counts: summary.counts,
                total: summary.scheduled_total,
            };
            (key, run_view(summary, counts))
        })
        .collect()
}

pub fn build_dag_overview(
    dag_id: &str,
    summaries: &[RunSummary],
    unscheduled_total: i64,
) -> DagOverview {
    let totals = reconcile_dag(summaries, unscheduled_total);

    DagOverview {
        dag_id: dag_id.to_string(),
        scheduled_runs: summaries
            .iter()
            .zip(run_keys(summaries))
            .map(|(summary, key)| (key, run_view(summary, scheduled_summary(summary))))
            .collect(),
        unscheduled_total: totals.unscheduled_total,
        total: totals.total,
    }
}

pub fn build_flattened_runs(
    dag_id: &str,
    summaries: &[RunSummary],
    unscheduled_total: i64,
) -> FlattenedDagRuns {
    let runs = summaries
        .iter()
        .zip(reconcile_runs(summaries, unscheduled_total))
        .map(|(summary, totals)| FlattenedRun {
            dag_run_id: summary.run_id.clone(),
            local_exec_time: summary.start_date_local.clone(),
            logical_date_local: summary.logical_date_local.clone(),
            state: summary.state.clone(),
            summary: scheduled_summary(summary),
            total: totals.total,
            unscheduled_total: totals.unscheduled_total,
        })
        .collect();

    FlattenedDagRuns {
        dag_id: dag_id.to_string(),
        runs,
    }
}
