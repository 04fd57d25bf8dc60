#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, Neo4j in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # DAG Monitor
//!
//! Read-only monitoring API for a workflow scheduler's DAG runs.
//!
//! ## Overview
//!
//! For a local calendar date the monitor reports, per DAG run, how many task
//! instances ended in each state category, and reconciles those counts with
//! the lineage graph's view of scripts that are not scheduled yet. It also
//! answers ad-hoc task-state queries and serves task logs.
//!
//! ## Module Organization
//!
//! - [`time_window`] - Local date ↔ UTC window conversion
//! - [`state`] - Raw state → category taxonomy and caller filters
//! - [`table_name`] - Target table extraction from task ids
//! - [`aggregation`] - Run aggregation, reconciliation and response shapes
//! - [`database`] - Scheduler metadata queries ([`database::RunStore`])
//! - [`graph`] - Lineage graph queries ([`graph::GraphStore`])
//! - [`logs`] - Two-tier task log lookup
//! - [`services`] - Request-level orchestration
//! - [`web`] - axum HTTP surface
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - Structured logging setup
//! - [`error`] - Crate error type
//!
//! ## Data Flow
//!
//! ```text
//! exec_date ─▶ to_utc_window ─▶ RunStore ─▶ aggregate ─┐
//!                               GraphStore ─▶ count ───┴▶ build_* ─▶ JSON
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{DateTime, FixedOffset, Utc};
//! use dag_monitor::aggregation::{aggregate, build_dag_overview};
//! use dag_monitor::models::{RunRecord, TaskRecord};
//! use dag_monitor::state::StateTaxonomy;
//! use std::collections::HashMap;
//!
//! let offset = FixedOffset::east_opt(8 * 3600).unwrap();
//! let started: DateTime<Utc> = "2024-03-01T01:00:00Z".parse().unwrap();
//! let runs = vec![RunRecord {
//!     run_id: "scheduled__2024-03-01".to_string(),
//!     logical_date: Some(started),
//!     start_date: Some(started),
//!     state: Some("running".to_string()),
//! }];
//! let tasks = HashMap::from([(
//!     "scheduled__2024-03-01".to_string(),
//!     vec![TaskRecord {
//!         task_id: "load.orders-TO-orders".to_string(),
//!         state: Some("success".to_string()),
//!         operator: Some("PythonOperator".to_string()),
//!         try_number: 1,
//!     }],
//! )]);
//!
//! let summaries = aggregate(&runs, &tasks, &StateTaxonomy::default(), offset);
//! let overview = build_dag_overview("etl_daily", &summaries, 2);
//! assert_eq!(overview.total, 3);
//! ```

pub mod aggregation;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod graph;
pub mod logging;
pub mod logs;
pub mod models;
pub mod services;
pub mod state;
pub mod table_name;
pub mod time_window;
pub mod web;

pub use config::{ConfigManager, MonitorConfig};
pub use error::{MonitorError, MonitorResult};
pub use state::{StateCategory, StateFilter, StateTaxonomy};
pub use time_window::{to_local_string, to_utc_window, UtcWindow};
