//! # Task Log Retrieval
//!
//! Two tiers: the scheduler's REST API first, then the log directory on
//! disk. See [`LogRetriever`] for how the tiers combine.

pub mod error;
pub mod local;
pub mod remote;
pub mod retriever;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{LogError, RemoteLogError};
pub use local::{LocalLogReader, LocalLogStore};
pub use remote::{AirflowLogClient, RemoteLogFetcher};
pub use retriever::{LogRetriever, LogSource, RetrievedLog};

use crate::error::{MonitorError, MonitorResult};

/// Identifies one attempt of one task instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogKey {
    pub dag_id: String,
    pub run_id: String,
    pub task_id: String,
    pub try_number: i32,
}

impl LogKey {
    pub fn new(
        dag_id: impl Into<String>,
        run_id: impl Into<String>,
        task_id: impl Into<String>,
        try_number: i32,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            run_id: run_id.into(),
            task_id: task_id.into(),
            try_number,
        }
    }

    /// Reject keys that cannot name a log file under the log directory
    pub fn validate(&self) -> MonitorResult<()> {
        for (field, value) in [
            ("dag_id", &self.dag_id),
            ("dag_run_id", &self.run_id),
            ("task_id", &self.task_id),
        ] {
            if value.trim().is_empty() {
                return Err(MonitorError::invalid_input(format!("{field} is required")));
            }
            if value.contains('/') || value.contains('\\') || value.contains("..") {
                return Err(MonitorError::invalid_input(format!(
                    "{field} contains path separators: '{value}'"
                )));
            }
        }

        if self.try_number < 1 {
            return Err(MonitorError::invalid_input(format!(
                "try_number must be at least 1, got {}",
                self.try_number
            )));
        }
        Ok(())
    }

    /// `{root}/{dag_id}/{task_id with '.' as '/'}/{run_id}/{try_number}.log`
    ///
    /// Task-group members (`group.task`) live in nested directories.
    pub fn local_path(&self, root: &Path) -> PathBuf {
        let mut path = root.join(&self.dag_id);
        path.extend(self.task_id.split('.'));
        path.push(&self.run_id);
        path.push(format!("{}.log", self.try_number));
        path
    }
}
