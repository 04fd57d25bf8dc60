//! # Execution Results Service
//!
//! Orchestrates one dashboard request: window conversion, the relational
//! query per DAG, the graph count, aggregation and shape assembly.

use chrono::FixedOffset;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::aggregation::{
    aggregate, build_dag_overview, build_flattened_runs, build_single_dag_map, DagOverview,
    FlattenedDagRuns, RunSummary, SingleDagResults,
};
use crate::database::RunStore;
use crate::error::{MonitorError, MonitorResult};
use crate::graph::{unscheduled_count_or_zero, GraphStore};
use crate::state::StateTaxonomy;
use crate::time_window::{to_utc_window, UtcWindow};

#[derive(Clone)]
pub struct ExecutionResultsService {
    runs: Arc<dyn RunStore>,
    graph: Arc<dyn GraphStore>,
    taxonomy: Arc<StateTaxonomy>,
    offset: FixedOffset,
}

impl std::fmt::Debug for ExecutionResultsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionResultsService")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl ExecutionResultsService {
    pub fn new(
        runs: Arc<dyn RunStore>,
        graph: Arc<dyn GraphStore>,
        taxonomy: Arc<StateTaxonomy>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            runs,
            graph,
            taxonomy,
            offset,
        }
    }

    /// Shape A for one DAG. No graph access.
    #[instrument(skip(self))]
    pub async fn single_dag_results(
        &self,
        dag_id: &str,
        exec_date: &str,
    ) -> MonitorResult<SingleDagResults> {
        let window = to_utc_window(exec_date, self.offset)?;
        let summaries = self.summarize(dag_id, &window).await?;
        Ok(build_single_dag_map(&summaries))
    }

    /// Shape B, one entry per requested DAG in request order.
    #[instrument(skip(self))]
    pub async fn dag_overviews(
        &self,
        dag_ids: &[String],
        exec_date: &str,
    ) -> MonitorResult<Vec<DagOverview>> {
        let (per_dag, unscheduled) = self.summarize_many(dag_ids, exec_date).await?;

        Ok(per_dag
            .iter()
            .map(|(dag_id, summaries)| build_dag_overview(dag_id, summaries, unscheduled))
            .collect())
    }

    /// Shape C, one entry per requested DAG in request order.
    #[instrument(skip(self))]
    pub async fn flattened_runs(
        &self,
        dag_ids: &[String],
        exec_date: &str,
    ) -> MonitorResult<Vec<FlattenedDagRuns>> {
        let (per_dag, unscheduled) = self.summarize_many(dag_ids, exec_date).await?;

        Ok(per_dag
            .iter()
            .map(|(dag_id, summaries)| build_flattened_runs(dag_id, summaries, unscheduled))
            .collect())
    }

    /// Relational queries for every DAG and the graph count, concurrently.
    ///
    /// The graph count is shared by every DAG in the response. A failed
    /// relational query fails the whole request; a failed graph count is 0.
    async fn summarize_many<'a>(
        &self,
        dag_ids: &'a [String],
        exec_date: &str,
    ) -> MonitorResult<(Vec<(&'a str, Vec<RunSummary>)>, i64)> {
        if dag_ids.is_empty() {
            return Err(MonitorError::invalid_input("at least one dag_id is required"));
        }
        let window = to_utc_window(exec_date, self.offset)?;

        let summaries = try_join_all(dag_ids.iter().map(|dag_id| {
            let window = &window;
            async move {
                self.summarize(dag_id, window)
                    .await
                    .map(|summaries| (dag_id.as_str(), summaries))
            }
        }));
        let (summaries, unscheduled) =
            tokio::join!(summaries, unscheduled_count_or_zero(self.graph.as_ref()));

        let summaries = summaries?;
        debug!(dags = summaries.len(), unscheduled, "Collected DAG summaries");
        Ok((summaries, unscheduled))
    }

    async fn summarize(&self, dag_id: &str, window: &UtcWindow) -> MonitorResult<Vec<RunSummary>> {
        let fetched = self.runs.query_runs_and_tasks(dag_id, window).await?;
        Ok(aggregate(
            &fetched.runs,
            &fetched.tasks_by_run,
            &self.taxonomy,
            self.offset,
        ))
    }
}
