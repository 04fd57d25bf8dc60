//! # Result Aggregation
//!
//! Pure transformations from fetched scheduler rows and graph counts into the
//! dashboard's response shapes. Nothing in this module performs I/O.

pub mod aggregator;
pub mod assembler;
pub mod reconciler;

pub use aggregator::{aggregate, final_running_max, running_max_totals, RunSummary};
pub use assembler::{
    build_dag_overview, build_flattened_runs, build_single_dag_map, DagOverview,
    FlattenedDagRuns, FlattenedRun, OperatorSummary, RunView, ScheduledSummary,
    SingleDagResults, TaskSummary,
};
pub use reconciler::{reconcile_dag, reconcile_runs, DagTotals, RunTotals};
