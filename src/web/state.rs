//! # Web API Application State
//!
//! Shared state handed to every handler: the services plus the monitor scope
//! from configuration.

use chrono::FixedOffset;
use std::sync::Arc;
use tracing::info;

use crate::config::MonitorConfig;
use crate::database::RunStore;
use crate::graph::GraphStore;
use crate::logs::LogRetriever;
use crate::services::{ExecutionResultsService, LogService, ScriptsService, TaskService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<MonitorConfig>,
    pub execution_results: ExecutionResultsService,
    pub tasks: TaskService,
    pub logs: LogService,
    pub scripts: ScriptsService,
}

impl AppState {
    pub fn new(
        config: Arc<MonitorConfig>,
        offset: FixedOffset,
        runs: Arc<dyn RunStore>,
        graph: Arc<dyn GraphStore>,
        retriever: Arc<LogRetriever>,
    ) -> Self {
        let taxonomy = Arc::new(config.task_states.clone());

        info!(
            default_dag_id = %config.monitor.default_dag_id,
            monitored_dags = config.monitor.dag_ids.len(),
            remote_logs = retriever.remote_enabled(),
            "Web application state initialized"
        );

        Self {
            execution_results: ExecutionResultsService::new(
                runs.clone(),
                graph.clone(),
                taxonomy.clone(),
                offset,
            ),
            tasks: TaskService::new(runs, graph.clone(), taxonomy, offset),
            logs: LogService::new(retriever),
            scripts: ScriptsService::new(graph),
            config,
        }
    }

    pub fn default_dag_id(&self) -> &str {
        &self.config.monitor.default_dag_id
    }

    /// DAGs named in a comma-separated parameter, or the monitored list
    pub fn resolve_dag_ids(&self, param: Option<&str>) -> Vec<String> {
        let requested: Vec<String> = param
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|dag_id| !dag_id.is_empty())
            .map(str::to_string)
            .collect();

        if requested.is_empty() {
            self.config.monitor.dag_ids.clone()
        } else {
            requested
        }
    }
}
