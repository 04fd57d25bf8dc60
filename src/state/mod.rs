//! Task state classification
//!
//! Maps the scheduler's raw task-instance states onto the closed set of
//! categories the dashboard reports on, using a taxonomy loaded from configuration.

pub mod category;
pub mod taxonomy;

pub use category::{CategoryCounts, StateCategory};
pub use taxonomy::{StateFilter, StateTaxonomy};
