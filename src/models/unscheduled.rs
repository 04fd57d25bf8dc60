//! # Unscheduled Lineage Entries
//!
//! Snapshot of the lineage graph's view of scripts that produce tables but
//! are not yet under scheduler control. Nodes carry a display name (`name`)
//! and a canonical name (`en_name`); the canonical name is what task ids embed.

use serde::{Deserialize, Serialize};

/// A table node in the lineage graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub display_name: Option<String>,
    pub canonical_name: Option<String>,
}

/// A not-yet-scheduled production relationship or structural resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledEntry {
    pub target_table: TableRef,
    /// Present for relationship-derived entries only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_table: Option<TableRef>,
    pub script_name: Option<String>,
    pub schedule_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_kind: Option<String>,
}

/// Both halves of the unscheduled count, each counted distinctly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledCount {
    pub relationships: i64,
    pub structural_nodes: i64,
}

impl UnscheduledCount {
    pub fn new(relationships: i64, structural_nodes: i64) -> Self {
        Self {
            relationships,
            structural_nodes,
        }
    }

    pub fn total(&self) -> i64 {
        self.relationships + self.structural_nodes
    }
}

/// Result of looking a node up by canonical name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLookup {
    pub exists: bool,
    pub display_name: Option<String>,
}

impl NodeLookup {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn found(display_name: Option<String>) -> Self {
        Self {
            exists: true,
            display_name,
        }
    }
}
