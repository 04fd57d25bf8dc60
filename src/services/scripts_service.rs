use std::sync::Arc;
use tracing::instrument;

use crate::error::MonitorResult;
use crate::graph::GraphStore;
use crate::models::UnscheduledEntry;

/// Lists scripts that produce tables but are not yet scheduled
#[derive(Clone)]
pub struct ScriptsService {
    graph: Arc<dyn GraphStore>,
}

impl std::fmt::Debug for ScriptsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptsService").finish_non_exhaustive()
    }
}

impl ScriptsService {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    #[instrument(skip(self))]
    pub async fn unscheduled_scripts(&self) -> MonitorResult<Vec<UnscheduledEntry>> {
        Ok(self.graph.unscheduled_list().await?)
    }
}
