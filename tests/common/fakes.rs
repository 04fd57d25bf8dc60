//! In-memory implementations of the store and log collaborator traits.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use dag_monitor::database::RunStore;
use dag_monitor::error::{MonitorError, MonitorResult};
use dag_monitor::graph::{GraphError, GraphResult, GraphStore};
use dag_monitor::logs::{LocalLogReader, LogError, LogKey, RemoteLogError, RemoteLogFetcher};
use dag_monitor::models::{NodeLookup, RunsWithTasks, TaskRecord, UnscheduledCount, UnscheduledEntry};
use dag_monitor::time_window::UtcWindow;

/// Runs per DAG; DAGs listed in `failing` behave like an unreachable database
#[derive(Default)]
pub struct FakeRunStore {
    pub dags: HashMap<String, RunsWithTasks>,
    pub failing: HashSet<String>,
    pub seen_windows: Mutex<Vec<(String, UtcWindow)>>,
    pub seen_state_filters: Mutex<Vec<Option<Vec<String>>>>,
}

impl FakeRunStore {
    pub fn with_dag(mut self, dag_id: &str, runs: RunsWithTasks) -> Self {
        self.dags.insert(dag_id.to_string(), runs);
        self
    }

    pub fn failing_for(mut self, dag_id: &str) -> Self {
        self.failing.insert(dag_id.to_string());
        self
    }

    fn check(&self, dag_id: &str) -> MonitorResult<()> {
        if self.failing.contains(dag_id) {
            return Err(MonitorError::unavailable(
                "scheduler database",
                "connection refused",
            ));
        }
        Ok(())
    }

    fn record_filter(&self, states: Option<&[String]>) {
        self.seen_state_filters
            .lock()
            .unwrap()
            .push(states.map(<[String]>::to_vec));
    }
}

fn state_matches(task: &TaskRecord, states: Option<&[String]>) -> bool {
    match states {
        None => true,
        Some(states) => task
            .state
            .as_ref()
            .is_some_and(|state| states.contains(state)),
    }
}

#[async_trait]
impl RunStore for FakeRunStore {
    async fn query_runs_and_tasks(
        &self,
        dag_id: &str,
        window: &UtcWindow,
    ) -> MonitorResult<RunsWithTasks> {
        self.check(dag_id)?;
        self.seen_windows
            .lock()
            .unwrap()
            .push((dag_id.to_string(), *window));
        Ok(self.dags.get(dag_id).cloned().unwrap_or_default())
    }

    async fn query_tasks_by_state(
        &self,
        dag_id: &str,
        _window: &UtcWindow,
        states: Option<&[String]>,
    ) -> MonitorResult<Vec<String>> {
        self.check(dag_id)?;
        self.record_filter(states);

        let ids: BTreeSet<String> = self
            .dags
            .get(dag_id)
            .map(|runs| {
                runs.tasks_by_run
                    .values()
                    .flatten()
                    .filter(|task| state_matches(task, states))
                    .map(|task| task.task_id.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids.into_iter().collect())
    }

    async fn query_tasks_by_run(
        &self,
        dag_id: &str,
        run_id: &str,
        states: Option<&[String]>,
    ) -> MonitorResult<Vec<TaskRecord>> {
        self.check(dag_id)?;
        self.record_filter(states);

        Ok(self
            .dags
            .get(dag_id)
            .and_then(|runs| runs.tasks_by_run.get(run_id))
            .map(|tasks| {
                let mut matching: Vec<TaskRecord> = tasks
                    .iter()
                    .filter(|task| state_matches(task, states))
                    .cloned()
                    .collect();
                matching.sort_by(|a, b| a.task_id.cmp(&b.task_id));
                matching
            })
            .unwrap_or_default())
    }
}

/// Lineage graph fixture; `count: None` makes every count query fail
#[derive(Default)]
pub struct FakeGraphStore {
    pub count: Option<UnscheduledCount>,
    pub entries: Vec<UnscheduledEntry>,
    /// canonical name → display name
    pub nodes: HashMap<String, Option<String>>,
    pub failing_nodes: HashSet<String>,
    pub list_fails: bool,
}

impl FakeGraphStore {
    pub fn with_count(relationships: i64, structural_nodes: i64) -> Self {
        Self {
            count: Some(UnscheduledCount::new(relationships, structural_nodes)),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            list_fails: true,
            ..Self::default()
        }
    }

    pub fn with_node(mut self, canonical: &str, display: Option<&str>) -> Self {
        self.nodes
            .insert(canonical.to_string(), display.map(str::to_string));
        self
    }

    pub fn with_failing_node(mut self, canonical: &str) -> Self {
        self.failing_nodes.insert(canonical.to_string());
        self
    }
}

fn unreachable_graph() -> GraphError {
    GraphError::Status {
        status: 503,
        body: "graph unavailable".to_string(),
    }
}

#[async_trait]
impl GraphStore for FakeGraphStore {
    async fn unscheduled_count(&self) -> GraphResult<UnscheduledCount> {
        self.count.ok_or_else(unreachable_graph)
    }

    async fn unscheduled_list(&self) -> GraphResult<Vec<UnscheduledEntry>> {
        if self.list_fails {
            return Err(unreachable_graph());
        }
        Ok(self.entries.clone())
    }

    async fn check_node_by_canonical_name(&self, canonical_name: &str) -> GraphResult<NodeLookup> {
        if self.failing_nodes.contains(canonical_name) {
            return Err(unreachable_graph());
        }
        Ok(match self.nodes.get(canonical_name) {
            Some(display) => NodeLookup::found(display.clone()),
            None => NodeLookup::missing(),
        })
    }
}

/// Remote log tier serving a fixed map of logs
#[derive(Default)]
pub struct FakeRemoteLogs {
    pub logs: HashMap<LogKey, String>,
}

#[async_trait]
impl RemoteLogFetcher for FakeRemoteLogs {
    async fn fetch_remote_log(&self, key: &LogKey) -> Result<String, RemoteLogError> {
        self.logs
            .get(key)
            .cloned()
            .ok_or(RemoteLogError::Status { status: 404 })
    }
}

/// Local log tier whose every read fails with a non-"not found" error
pub struct UnreadableLocalLogs;

#[async_trait]
impl LocalLogReader for UnreadableLocalLogs {
    async fn fetch_local_log(&self, key: &LogKey) -> Result<String, LogError> {
        Err(LogError::ReadError {
            path: key.local_path(&PathBuf::from("/unreadable")),
            reason: "Permission denied (os error 13)".to_string(),
        })
    }
}
