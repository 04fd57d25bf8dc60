//! # Services
//!
//! Request-level orchestration over the store collaborators. Services hold
//! `Arc`s to the collaborators and are cheap to clone into handler state.

pub mod execution_results;
pub mod log_service;
pub mod scripts_service;
pub mod task_service;

pub use execution_results::ExecutionResultsService;
pub use log_service::{LogService, TaskLog};
pub use scripts_service::ScriptsService;
pub use task_service::{RunTaskView, TaskService};
