use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::error::MonitorResult;
use crate::logs::{LogKey, LogRetriever};

/// Log content of one task attempt plus the key it was looked up by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLog {
    pub dag_id: String,
    pub dag_run_id: String,
    pub task_id: String,
    pub try_number: i32,
    pub log: String,
}

#[derive(Debug, Clone)]
pub struct LogService {
    retriever: Arc<LogRetriever>,
}

impl LogService {
    pub fn new(retriever: Arc<LogRetriever>) -> Self {
        Self { retriever }
    }

    #[instrument(skip(self))]
    pub async fn task_log(&self, key: LogKey) -> MonitorResult<TaskLog> {
        key.validate()?;
        let retrieved = self.retriever.retrieve(&key).await?;

        Ok(TaskLog {
            dag_id: key.dag_id,
            dag_run_id: key.run_id,
            task_id: key.task_id,
            try_number: key.try_number,
            log: retrieved.content,
        })
    }
}
