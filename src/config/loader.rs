//! Configuration Loader
//!
//! Environment-aware configuration loading. Reads `dag-monitor.yaml`, merges
//! the section named after the active environment over the base values,
//! applies environment-variable overrides, then validates.

use super::error::{ConfigResult, ConfigurationError};
use super::MonitorConfig;
use crate::time_window::parse_utc_offset;
use chrono::FixedOffset;
use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "dag-monitor.yaml";
const ENVIRONMENT_SECTIONS: [&str; 3] = ["development", "test", "production"];

/// Loaded, validated configuration plus the context it was loaded in
#[derive(Debug)]
pub struct ConfigManager {
    config: MonitorConfig,
    environment: String,
    config_directory: PathBuf,
    utc_offset: FixedOffset,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    ///
    /// A missing configuration file is not an error: built-in defaults are
    /// used and environment-variable overrides still apply.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            environment = environment,
            directory = %config_directory.display(),
            "Loading configuration"
        );

        let mut config = match Self::find_config_file(&config_directory) {
            Ok(config_file) => Self::load_and_merge_config(&config_file, environment)?,
            Err(ConfigurationError::ConfigFileNotFound { searched_paths }) => {
                warn!(
                    searched_paths = ?searched_paths,
                    "No configuration file found, using built-in defaults"
                );
                MonitorConfig::default()
            }
            Err(e) => return Err(e),
        };

        Self::apply_env_overrides(&mut config, |name| env::var(name).ok())?;

        let manager = Self::from_config(config, environment, config_directory)?;

        info!(
            environment = environment,
            database_host = %manager.config.database.host,
            graph_uri = %manager.config.graph.uri,
            default_dag_id = %manager.config.monitor.default_dag_id,
            "Configuration loaded successfully"
        );
        debug!(config = %manager.debug_config(), "Effective configuration");

        Ok(Arc::new(manager))
    }

    /// Validate an in-memory configuration and wrap it
    pub fn from_config(
        config: MonitorConfig,
        environment: &str,
        config_directory: PathBuf,
    ) -> ConfigResult<ConfigManager> {
        config.validate()?;
        let utc_offset = parse_utc_offset(&config.timezone.utc_offset)
            .map_err(ConfigurationError::validation_error)?;

        Ok(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
            utc_offset,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Offset all local dates are interpreted in
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Configuration as JSON with credentials masked
    pub fn debug_config(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(&self.config).unwrap_or_default();
        Self::sanitize_json_recursive(&mut value);
        value
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value) {
        const SENSITIVE_PATTERNS: [&str; 4] = ["password", "secret", "token", "url"];

        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let sensitive = SENSITIVE_PATTERNS.iter().any(|p| key_lower == *p)
                        || key_lower.ends_with("password");

                    if sensitive && !val.is_null() {
                        *val = serde_json::Value::String("[MASKED]".to_string());
                    } else {
                        Self::sanitize_json_recursive(val);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                items.iter_mut().for_each(Self::sanitize_json_recursive);
            }
            _ => {}
        }
    }

    /// DAG_MONITOR_ENV || APP_ENV || 'development'
    fn detect_environment() -> String {
        env::var("DAG_MONITOR_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    fn default_config_directory() -> PathBuf {
        env::var("DAG_MONITOR_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    fn find_config_file(config_directory: &Path) -> ConfigResult<PathBuf> {
        let candidates = [
            config_directory.join(CONFIG_FILE_NAME),
            config_directory.join("dag-monitor.yml"),
        ];

        for candidate in &candidates {
            if candidate.is_file() {
                debug!("Found configuration file: {}", candidate.display());
                return Ok(candidate.clone());
            }
        }

        Err(ConfigurationError::config_file_not_found(candidates.to_vec()))
    }

    /// Load the YAML file and merge the active environment's section over it
    fn load_and_merge_config(config_file: &Path, environment: &str) -> ConfigResult<MonitorConfig> {
        let yaml_content = std::fs::read_to_string(config_file).map_err(|e| {
            ConfigurationError::file_read_error(config_file.display().to_string(), e)
        })?;

        Self::parse_and_merge(&yaml_content, environment)
            .map_err(|e| ConfigurationError::invalid_yaml(config_file.display().to_string(), e))
    }

    fn parse_and_merge(yaml_content: &str, environment: &str) -> Result<MonitorConfig, String> {
        let mut yaml_data: YamlValue = serde_yaml::from_str(yaml_content).map_err(|e| e.to_string())?;

        if yaml_data.is_null() {
            return Ok(MonitorConfig::default());
        }

        if let Some(env_overrides) = yaml_data.get(environment).cloned() {
            debug!("Applying environment-specific overrides for: {}", environment);
            Self::merge_yaml_values(&mut yaml_data, env_overrides);
        }

        if let YamlValue::Mapping(ref mut map) = yaml_data {
            for section in ENVIRONMENT_SECTIONS {
                map.remove(section);
            }
        }

        serde_yaml::from_value(yaml_data)
            .map_err(|e| format!("Failed to deserialize configuration: {e}"))
    }

    /// Recursively merge YAML values (environment overrides into base config)
    fn merge_yaml_values(base: &mut YamlValue, override_value: YamlValue) {
        match (&mut *base, override_value) {
            (YamlValue::Mapping(base_map), YamlValue::Mapping(override_map)) => {
                for (key, value) in override_map {
                    if let Some(existing_value) = base_map.get_mut(&key) {
                        Self::merge_yaml_values(existing_value, value);
                    } else {
                        base_map.insert(key, value);
                    }
                }
            }
            (base_ref, override_val) => {
                *base_ref = override_val;
            }
        }
    }

    /// Apply deployment overrides for hosts and credentials.
    ///
    /// `lookup` abstracts the process environment so tests need not mutate it.
    fn apply_env_overrides<F>(config: &mut MonitorConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set_string = |target: &mut String, name: &str| {
            if let Some(value) = lookup(name) {
                *target = value;
            }
        };

        set_string(&mut config.database.host, "AIRFLOW_DB_HOST");
        set_string(&mut config.database.database, "AIRFLOW_DB_NAME");
        set_string(&mut config.database.username, "AIRFLOW_DB_USER");
        set_string(&mut config.database.password, "AIRFLOW_DB_PASSWORD");
        set_string(&mut config.graph.uri, "NEO4J_URI");
        set_string(&mut config.graph.username, "NEO4J_USER");
        set_string(&mut config.graph.password, "NEO4J_PASSWORD");
        set_string(&mut config.airflow_api.username, "AIRFLOW_API_USER");
        set_string(&mut config.airflow_api.password, "AIRFLOW_API_PASSWORD");

        if let Some(url) = lookup("DATABASE_URL") {
            config.database.url = Some(url);
        }

        if let Some(port) = lookup("AIRFLOW_DB_PORT") {
            config.database.port =
                port.parse()
                    .map_err(|e| ConfigurationError::EnvironmentOverrideError {
                        variable: "AIRFLOW_DB_PORT".to_string(),
                        value: port.clone(),
                        reason: format!("{e}"),
                    })?;
        }

        if let Some(base_url) = lookup("AIRFLOW_API_URL") {
            config.airflow_api.base_url = base_url;
            config.airflow_api.enabled = true;
        }

        if let Some(directory) = lookup("AIRFLOW_LOG_DIRECTORY") {
            config.logs.directory = PathBuf::from(directory);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn test_config_yaml() -> &'static str {
        r#"
database:
  host: localhost
  username: monitor
  password: base_password
  max_connections: 4
graph:
  uri: http://graph.internal:7474
timezone:
  utc_offset: "+08:00"
monitor:
  default_dag_id: etl_daily
  dag_ids: [etl_daily, etl_hourly]
task_states:
  running_states: [queued, running]

test:
  database:
    database: airflow_test
  logging:
    level: debug

production:
  database:
    host: db.prod.internal
    max_connections: 20
  logging:
    json: true
"#
    }

    fn setup_test_config_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();
        fs::write(config_dir.join(CONFIG_FILE_NAME), test_config_yaml()).unwrap();
        (temp_dir, config_dir)
    }

    #[test]
    fn test_base_values_and_partial_sections() {
        let config = ConfigManager::parse_and_merge(test_config_yaml(), "development").unwrap();

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.graph.uri, "http://graph.internal:7474");
        assert_eq!(config.graph.database, "neo4j");
        assert_eq!(config.monitor.dag_ids, vec!["etl_daily", "etl_hourly"]);
        assert_eq!(config.monitor.operator, "PythonOperator");
        assert_eq!(config.task_states.running_states, vec!["queued", "running"]);
        assert_eq!(config.task_states.success_states, vec!["success"]);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_environment_specific_overrides() {
        let config = ConfigManager::parse_and_merge(test_config_yaml(), "production").unwrap();
        assert_eq!(config.database.host, "db.prod.internal");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.username, "monitor");
        assert!(config.logging.json);

        let config = ConfigManager::parse_and_merge(test_config_yaml(), "test").unwrap();
        assert_eq!(config.database.database, "airflow_test");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_from_directory() {
        let (_temp_dir, config_dir) = setup_test_config_dir();

        let manager =
            ConfigManager::load_from_directory_with_env(Some(config_dir.clone()), "test").unwrap();

        assert_eq!(manager.environment(), "test");
        assert_eq!(manager.config_directory(), config_dir.as_path());
        assert_eq!(manager.utc_offset().local_minus_utc(), 8 * 3600);
        assert_eq!(manager.config().monitor.default_dag_id, "etl_daily");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::load_from_directory_with_env(
            Some(temp_dir.path().to_path_buf()),
            "development",
        )
        .unwrap();

        assert_eq!(manager.config().timezone.utc_offset, "+08:00");
    }

    #[test]
    fn test_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigManager::find_config_file(temp_dir.path());

        match result {
            Err(ConfigurationError::ConfigFileNotFound { searched_paths }) => {
                assert_eq!(searched_paths.len(), 2);
            }
            other => panic!("Expected ConfigFileNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "database: [unclosed",
        )
        .unwrap();

        let err = ConfigManager::load_from_directory_with_env(
            Some(temp_dir.path().to_path_buf()),
            "development",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidYaml { .. }));
    }

    #[test]
    fn test_invalid_taxonomy_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "task_states:\n  failed_states: [failed, success]\n",
        )
        .unwrap();

        let err = ConfigManager::load_from_directory_with_env(
            Some(temp_dir.path().to_path_buf()),
            "development",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::ValidationError { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AIRFLOW_DB_HOST", "192.168.1.10"),
            ("AIRFLOW_DB_PORT", "6543"),
            ("AIRFLOW_DB_PASSWORD", "from_env"),
            ("NEO4J_URI", "http://neo4j:7474"),
            ("AIRFLOW_API_URL", "http://airflow:8080"),
            ("AIRFLOW_LOG_DIRECTORY", "/data/logs"),
        ]);
        let mut config = MonitorConfig::default();

        ConfigManager::apply_env_overrides(&mut config, |name| {
            vars.get(name).map(|v| (*v).to_string())
        })
        .unwrap();

        assert_eq!(config.database.host, "192.168.1.10");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.password, "from_env");
        assert_eq!(config.graph.uri, "http://neo4j:7474");
        assert!(config.airflow_api.enabled);
        assert_eq!(config.airflow_api.base_url, "http://airflow:8080");
        assert_eq!(config.logs.directory, PathBuf::from("/data/logs"));
    }

    #[test]
    fn test_env_override_rejects_bad_port() {
        let mut config = MonitorConfig::default();
        let err = ConfigManager::apply_env_overrides(&mut config, |name| {
            (name == "AIRFLOW_DB_PORT").then(|| "not-a-port".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::EnvironmentOverrideError { .. }));
    }

    #[test]
    fn test_debug_config_masks_credentials() {
        let mut config = MonitorConfig::default();
        config.database.password = "hunter2".to_string();
        config.graph.password = "graph_secret".to_string();
        let manager = ConfigManager::from_config(config, "test", PathBuf::from("config")).unwrap();

        let debug = manager.debug_config();
        assert_eq!(debug["database"]["password"], "[MASKED]");
        assert_eq!(debug["graph"]["password"], "[MASKED]");
        assert_eq!(debug["database"]["host"], "localhost");
        assert!(!debug.to_string().contains("hunter2"));
    }
}
