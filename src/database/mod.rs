//! # Scheduler Database Access
//!
//! Read-only access to the scheduler's metadata database.
//!
//! ## Key Components
//!
//! - [`connection`] - Pool construction from [`DatabaseConfig`](crate::config::DatabaseConfig)
//! - [`run_store`] - The [`RunStore`] collaborator trait and its PostgreSQL implementation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dag_monitor::config::DatabaseConfig;
//! use dag_monitor::database::{DatabaseConnection, PgRunStore, RunStore};
//! use dag_monitor::time_window::to_utc_window;
//! use chrono::FixedOffset;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::new(&DatabaseConfig::default())?;
//! let store = PgRunStore::new(db.pool().clone(), "PythonOperator");
//!
//! let offset = FixedOffset::east_opt(8 * 3600).unwrap();
//! let window = to_utc_window("2024-03-01", offset)?;
//! let runs = store.query_runs_and_tasks("etl_daily", &window).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod run_store;

pub use connection::DatabaseConnection;
pub use run_store::{PgRunStore, RunStore};
