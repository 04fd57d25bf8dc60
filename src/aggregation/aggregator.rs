//! # Run Aggregator
//!
//! Folds the task instances of each run into per-category counts.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{RunRecord, TaskRecord};
use crate::state::{CategoryCounts, StateTaxonomy};
use crate::time_window::to_local_string;

/// Normalized view of one DAG run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub logical_date_local: Option<String>,
    pub start_date_local: Option<String>,
    pub state: Option<String>,
    pub counts: CategoryCounts,
    /// Number of task instances aggregated into this run
    pub scheduled_total: i64,
}

impl RunSummary {
    /// Preferred key in the map-shaped responses: local start time, or the
    /// run id when the run has not started. Ties are resolved at assembly.
    pub fn display_key(&self) -> String {
        self.start_date_local
            .clone()
            .unwrap_or_else(|| self.run_id.clone())
    }
}

/// Build one summary per run, ordered by start time.
///
/// The sort is stable so runs sharing a start time keep query order; runs
/// without a start time come first.
pub fn aggregate(
    runs: &[RunRecord],
    tasks_by_run: &HashMap<String, Vec<TaskRecord>>,
    taxonomy: &StateTaxonomy,
    offset: FixedOffset,
) -> Vec<RunSummary> {
    let mut ordered: Vec<&RunRecord> = runs.iter().collect();
    ordered.sort_by_key(|run| run.start_date);

    ordered
        .into_iter()
        .map(|run| {
            let tasks = tasks_by_run
                .get(&run.run_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            summarize_run(run, tasks, taxonomy, offset)
        })
        .collect()
}

fn summarize_run(
    run: &RunRecord,
    tasks: &[TaskRecord],
    taxonomy: &StateTaxonomy,
    offset: FixedOffset,
) -> RunSummary {
    let counts = tasks.iter().fold(CategoryCounts::default(), |mut counts, task| {
        counts.increment(taxonomy.classify(task.state.as_deref()));
        counts
    });

    RunSummary {
        run_id: run.run_id.clone(),
        logical_date_local: to_local_string(run.logical_date, offset),
        start_date_local: to_local_string(run.start_date, offset),
        state: run.state.clone(),
        counts,
        scheduled_total: tasks.len() as i64,
    }
}

/// Running maximum of `scheduled_total` in iteration order.
///
/// Element `i` is the largest task count among runs `0..=i`. The per-DAG
/// `total` fields are derived from this accumulator rather than from each
/// run's own count.
pub fn running_max_totals(summaries: &[RunSummary]) -> Vec<i64> {
    summaries
        .iter()
        .scan(0_i64, |max_so_far, summary| {
            *max_so_far = (*max_so_far).max(summary.scheduled_total);
            Some(*max_so_far)
        })
        .collect()
}

/// Accumulator value after the last run, 0 for an empty window
pub fn final_running_max(summaries: &[RunSummary]) -> i64 {
    running_max_totals(summaries).last().copied().unwrap_or(0)
}
