//! # Lineage Graph
//!
//! The graph collaborator knows which table-producing scripts are not yet
//! under scheduler control, and maps canonical table names to display names.
//!
//! Nodes carry `name` (display) and `en_name` (canonical). A producing
//! relationship is `(target)-[:DERIVED_FROM|ORIGINATES_FROM]->(source)`; it
//! is unscheduled when it has `schedule_status = false`.

pub mod error;
pub mod neo4j;

use async_trait::async_trait;
use tracing::warn;

pub use error::{GraphError, GraphResult};
pub use neo4j::Neo4jHttpClient;

use crate::models::{NodeLookup, UnscheduledCount, UnscheduledEntry};

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Distinct unscheduled producing relationships and structural nodes
    async fn unscheduled_count(&self) -> GraphResult<UnscheduledCount>;

    /// Detailed listing behind [`GraphStore::unscheduled_count`]
    async fn unscheduled_list(&self) -> GraphResult<Vec<UnscheduledEntry>>;

    async fn check_node_by_canonical_name(&self, canonical_name: &str) -> GraphResult<NodeLookup>;
}

/// Unscheduled total for the aggregation path. Graph failures degrade to 0.
pub async fn unscheduled_count_or_zero(graph: &dyn GraphStore) -> i64 {
    match graph.unscheduled_count().await {
        Ok(count) => count.total(),
        Err(err) => {
            warn!(error = %err, "Unscheduled count unavailable, reporting 0");
            0
        }
    }
}
