//! Shared fixtures for the integration tests: in-memory collaborators,
//! builders for rows and application state, and proptest strategies.
#![allow(dead_code)]

pub mod builders;
pub mod fakes;
pub mod strategies;

pub use builders::*;
pub use fakes::*;
