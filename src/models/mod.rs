pub mod run;
pub mod unscheduled;

// Re-export models for easy access
pub use run::{RunRecord, RunTaskRow, RunsWithTasks, TaskRecord};
pub use unscheduled::{NodeLookup, TableRef, UnscheduledCount, UnscheduledEntry};
