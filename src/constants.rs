//! # System Constants
//!
//! Identifiers shared between the relational queries, the graph queries and
//! the response shapes. Values that operators may want to change live in
//! [`crate::config`] instead.

/// Operator kind whose task instances are counted by default
pub const DEFAULT_OPERATOR: &str = "PythonOperator";

/// Default DAG monitored by the single-DAG endpoint
pub const DEFAULT_DAG_ID: &str = "dataops_productline_execute_dag.py";

/// Token separating the script descriptor from the target table in a task id
pub const TARGET_SEPARATOR: &str = "-TO-";

/// Lineage graph vocabulary
pub mod graph {
    /// Relationship kinds that represent a script producing a table
    pub const PRODUCING_RELATIONSHIPS: [&str; 2] = ["DERIVED_FROM", "ORIGINATES_FROM"];

    /// Node label for data resources
    pub const DATA_RESOURCE_LABEL: &str = "DataResource";

    /// Value of the `type` property marking a structural data resource
    pub const STRUCTURAL_RESOURCE_TYPE: &str = "structure";
}

/// Filter token meaning "do not filter by state"
pub const ALL_STATES: &str = "all";

/// Default attempt number when a caller omits `try_number`
pub const DEFAULT_TRY_NUMBER: i32 = 1;
