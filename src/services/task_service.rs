//! # Task Service
//!
//! Ad-hoc task-state queries: task ids in a date window, and the tasks of
//! one run cross-referenced against the lineage graph.

use chrono::FixedOffset;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::database::RunStore;
use crate::error::MonitorResult;
use crate::graph::GraphStore;
use crate::models::TaskRecord;
use crate::state::{StateFilter, StateTaxonomy};
use crate::table_name::extract_target_name;
use crate::time_window::to_utc_window;

/// A task of one run whose target table is known to the lineage graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTaskView {
    pub task_id: String,
    pub state: Option<String>,
    pub operator: Option<String>,
    pub try_number: i32,
    /// Display name of the target table, or its canonical name when the
    /// graph has no display name
    pub target_table: String,
}

#[derive(Clone)]
pub struct TaskService {
    runs: Arc<dyn RunStore>,
    graph: Arc<dyn GraphStore>,
    taxonomy: Arc<StateTaxonomy>,
    offset: FixedOffset,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl TaskService {
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

    /// Distinct task ids of runs started on `exec_date` matching `filter`
    #[instrument(skip(self))]
    pub async fn window_task_ids(
        &self,
        dag_id: &str,
        exec_date: &str,
        filter: &StateFilter,
    ) -> MonitorResult<Vec<String>> {
        let window = to_utc_window(exec_date, self.offset)?;
        let states = filter.raw_states(&self.taxonomy);

        self.runs
            .query_tasks_by_state(dag_id, &window, states.as_deref())
            .await
    }

    /// Tasks of one run matching `filter`, keeping only those whose target
    /// table exists in the lineage graph.
    #[instrument(skip(self))]
    pub async fn tasks_for_run(
        &self,
        dag_id: &str,
        run_id: &str,
        filter: &StateFilter,
    ) -> MonitorResult<Vec<RunTaskView>> {
        let states = filter.raw_states(&self.taxonomy);
        let tasks = self
            .runs
            .query_tasks_by_run(dag_id, run_id, states.as_deref())
            .await?;
        let fetched = tasks.len();

        let views: Vec<RunTaskView> = join_all(tasks.into_iter().map(|task| self.cross_reference(task)))
            .await
            .into_iter()
            .flatten()
            .collect();

        debug!(fetched, kept = views.len(), "Cross-referenced run tasks");
        Ok(views)
    }

    async fn cross_reference(&self, task: TaskRecord) -> Option<RunTaskView> {
        let canonical = extract_target_name(Some(task.task_id.as_str()))?.to_string();

        let lookup = match self.graph.check_node_by_canonical_name(&canonical).await {
            Ok(lookup) => lookup,
            Err(err) => {
                warn!(task_id = %task.task_id, error = %err, "Graph lookup failed, dropping task");
                return None;
            }
        };
        if !lookup.exists {
            return None;
        }

        Some(RunTaskView {
            target_table: lookup.display_name.unwrap_or(canonical),
            task_id: task.task_id,
            state: task.state,
            operator: task.operator,
            try_number: task.try_number,
        })
    }
}
