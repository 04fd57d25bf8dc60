//! # Unscheduled Reconciler
//!
//! Combines scheduler task counts with the lineage graph's count of
//! not-yet-scheduled scripts. `total` is always scheduled + unscheduled, but
//! the scheduled part depends on the response shape:
//!
//! - per-DAG overview: the running maximum after the last run
//! - flattened run list: the running maximum as of each run's position

use serde::{Deserialize, Serialize};

use super::aggregator::{final_running_max, running_max_totals, RunSummary};

/// Totals attached to one DAG in the overview shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagTotals {
    pub scheduled_total: i64,
    pub unscheduled_total: i64,
    pub total: i64,
}

/// Totals attached to one run in the flattened shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// This run's own task count
    pub scheduled_total: i64,
    /// Accumulator value at this run's position
    pub running_max: i64,
    pub unscheduled_total: i64,
    pub total: i64,
}

pub fn reconcile_dag(summaries: &[RunSummary], unscheduled_total: i64) -> DagTotals {
    let scheduled_total = final_running_max(summaries);
    DagTotals {
        scheduled_total,
        unscheduled_total,
        total: scheduled_total + unscheduled_total,
    }
}

pub fn reconcile_runs(summaries: &[RunSummary], unscheduled_total: i64) -> Vec<RunTotals> {
    summaries
        .iter()
        .zip(running_max_totals(summaries))
        .map(|(summary, running_max)| RunTotals {
            scheduled_total: summary.scheduled_total,
            running_max,
            unscheduled_total,
            total: running_max + unscheduled_total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CategoryCounts;

    fn summaries(sizes: &[i64]) -> Vec<RunSummary> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, size)| RunSummary {
                run_id: format!("run_{i}"),
                logical_date_local: None,
                start_date_local: None,
                state: None,
                counts: CategoryCounts {
                    success: *size,
                    ..CategoryCounts::default()
                },
                scheduled_total: *size,
            })
            .collect()
    }

    #[test]
    fn test_dag_total_uses_maximum_not_sum() {
        let totals = reconcile_dag(&summaries(&[3, 5, 2]), 4);
        assert_eq!(
            totals,
            DagTotals {
                scheduled_total: 5,
                unscheduled_total: 4,
                total: 9
            }
        );
    }

    #[test]
    fn test_dag_total_without_runs_is_unscheduled_only() {
        let totals = reconcile_dag(&[], 3);
        assert_eq!(totals.scheduled_total, 0);
        assert_eq!(totals.total, 3);
    }

    #[test]
    fn test_run_totals_are_cumulative() {
        let totals = reconcile_runs(&summaries(&[3, 5, 2]), 1);

        let per_run: Vec<i64> = totals.iter().map(|t| t.scheduled_total).collect();
        let running: Vec<i64> = totals.iter().map(|t| t.total).collect();
        assert_eq!(per_run, vec![3, 5, 2]);
        assert_eq!(running, vec![4, 6, 6]);
        assert!(totals.iter().all(|t| t.unscheduled_total == 1));
    }
}
