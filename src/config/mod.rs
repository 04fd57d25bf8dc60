//! # DAG Monitor Configuration
//!
//! YAML-based configuration with environment-specific overrides, mirroring
//! the layout of `config/dag-monitor.yaml`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dag_monitor::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//!
//! let connect_options = manager.config().database.connect_options()?;
//! let offset = manager.utc_offset();
//! let monitored = &manager.config().monitor.dag_ids;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

use crate::constants::{DEFAULT_DAG_ID, DEFAULT_OPERATOR};
use crate::state::StateTaxonomy;
use crate::time_window::parse_utc_offset;

/// Root configuration structure mirroring dag-monitor.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Scheduler metadata database
    pub database: DatabaseConfig,

    /// Lineage graph (Neo4j HTTP endpoint)
    pub graph: GraphConfig,

    /// Scheduler REST API used as the primary log source
    pub airflow_api: AirflowApiConfig,

    /// Local log directory used as the fallback log source
    pub logs: LogStoreConfig,

    pub timezone: TimezoneConfig,

    /// Raw task state → category taxonomy
    pub task_states: StateTaxonomy,

    /// Which DAGs and operators are reported on
    pub monitor: MonitorScopeConfig,

    pub web: WebConfig,

    pub logging: LoggingConfig,
}

/// Scheduler metadata database connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the component fields
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            database: "airflow".to_string(),
            username: "airflow".to_string(),
            password: String::new(),
            max_connections: 5,
            acquire_timeout_seconds: 10,
        }
    }
}

impl DatabaseConfig {
    /// Connection options for the pool.
    ///
    /// Component fields are passed through as-is, so credentials never need
    /// URL escaping. An explicit `url` replaces them entirely. An empty
    /// password is left unset so `PGPASSWORD` and `.pgpass` still apply.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return url.parse();
        }

        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.database);

        Ok(if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        })
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

/// Lineage graph connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    /// HTTP base URI, e.g. `http://localhost:7474`
    pub uri: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub request_timeout_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:7474".to_string(),
            database: "neo4j".to_string(),
            username: "neo4j".to_string(),
            password: String::new(),
            request_timeout_ms: 5_000,
        }
    }
}

impl GraphConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Scheduler REST API settings for remote log retrieval
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AirflowApiConfig {
    /// When false the log lookup goes straight to the local directory
    pub enabled: bool,
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub request_timeout_ms: u64,
}

impl Default for AirflowApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:8080".to_string(),
            username: "airflow".to_string(),
            password: String::new(),
            request_timeout_ms: 10_000,
        }
    }
}

impl AirflowApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogStoreConfig {
    pub directory: PathBuf,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/opt/airflow/logs"),
        }
    }
}

/// Zone the dashboard's calendar dates are expressed in
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimezoneConfig {
    /// Informational zone name
    pub name: String,
    /// Fixed offset used for all conversions, e.g. `+08:00`
    pub utc_offset: String,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            name: "Asia/Shanghai".to_string(),
            utc_offset: "+08:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorScopeConfig {
    /// DAG reported by the single-DAG endpoint
    pub default_dag_id: String,
    /// DAGs reported by the multi-DAG endpoints when the caller names none
    pub dag_ids: Vec<String>,
    /// Operator kind whose task instances are counted
    pub operator: String,
}

impl Default for MonitorScopeConfig {
    fn default() -> Self {
        Self {
            default_dag_id: DEFAULT_DAG_ID.to_string(),
            dag_ids: vec![DEFAULT_DAG_ID.to_string()],
            operator: DEFAULT_OPERATOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind_address: String,
    pub request_timeout_ms: u64,
    pub cors_enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_ms: 30_000,
            cors_enabled: true,
        }
    }
}

impl WebConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit filter directive; the environment default applies when unset
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl MonitorConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.task_states
            .validate()
            .map_err(ConfigurationError::validation_error)?;

        parse_utc_offset(&self.timezone.utc_offset)
            .map_err(ConfigurationError::validation_error)?;

        if self.monitor.default_dag_id.trim().is_empty() {
            return Err(ConfigurationError::validation_error(
                "monitor.default_dag_id must not be empty",
            ));
        }

        if self.monitor.operator.trim().is_empty() {
            return Err(ConfigurationError::validation_error(
                "monitor.operator must not be empty",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigurationError::validation_error(
                "database.max_connections must be greater than 0",
            ));
        }

        Ok(())
    }
}
