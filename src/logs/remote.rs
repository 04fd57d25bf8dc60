//! Remote tier: the scheduler's REST API.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use super::error::RemoteLogError;
use super::LogKey;
use crate::config::AirflowApiConfig;

#[async_trait]
pub trait RemoteLogFetcher: Send + Sync {
    async fn fetch_remote_log(&self, key: &LogKey) -> Result<String, RemoteLogError>;
}

#[derive(Debug, Deserialize)]
struct LogPayload {
    content: String,
}

/// Fetches
/// `GET {base}/api/v1/dags/{dag}/dagRuns/{run}/taskInstances/{task}/logs/{try}`
/// with basic auth.
#[derive(Debug, Clone)]
pub struct AirflowLogClient {
    base_url: Url,
    username: String,
    password: String,
    http: Client,
}

impl AirflowLogClient {
    pub fn new(config: &AirflowApiConfig) -> Result<Self, RemoteLogError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RemoteLogError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteLogError::InvalidUrl(config.base_url.clone()));
        }
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            http,
        })
    }

    /// Endpoint for one attempt; every path segment is percent-encoded.
    pub fn log_url(&self, key: &LogKey) -> Result<Url, RemoteLogError> {
        let mut url = self.base_url.clone();
        let try_number = key.try_number.to_string();
        url.path_segments_mut()
            .map_err(|()| RemoteLogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "api",
                "v1",
                "dags",
                key.dag_id.as_str(),
                "dagRuns",
                key.run_id.as_str(),
                "taskInstances",
                key.task_id.as_str(),
                "logs",
                try_number.as_str(),
            ]);
        url.query_pairs_mut().append_pair("full_content", "true");
        Ok(url)
    }
}

#[async_trait]
impl RemoteLogFetcher for AirflowLogClient {
    async fn fetch_remote_log(&self, key: &LogKey) -> Result<String, RemoteLogError> {
        let url = self.log_url(key)?;
        debug!(url = %url, "Fetching remote log");

        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteLogError::Status {
                status: status.as_u16(),
            });
        }

        let payload: LogPayload = response
            .json()
            .await
            .map_err(|e| RemoteLogError::MalformedPayload(e.to_string()))?;
        Ok(payload.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> AirflowLogClient {
        AirflowLogClient::new(&AirflowApiConfig {
            enabled: true,
            base_url: base_url.to_string(),
            ..AirflowApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_log_url_encodes_run_id() {
        let key = LogKey::new(
            "etl_daily",
            "scheduled__2024-03-01T00:00:00+00:00",
            "load.orders-TO-orders",
            1,
        );
        let url = client("http://airflow:8080/").log_url(&key).unwrap();

        assert_eq!(
            url.as_str(),
            "http://airflow:8080/api/v1/dags/etl_daily/dagRuns/scheduled__2024-03-01T00:00:00+00:00/taskInstances/load.orders-TO-orders/logs/1?full_content=true"
        );
    }

    #[test]
    fn test_log_url_keeps_base_path_prefix() {
        let key = LogKey::new("d", "r", "t", 3);
        let url = client("http://gateway/airflow").log_url(&key).unwrap();
        assert_eq!(
            url.path(),
            "/airflow/api/v1/dags/d/dagRuns/r/taskInstances/t/logs/3"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = AirflowLogClient::new(&AirflowApiConfig {
            base_url: "not a url".to_string(),
            ..AirflowApiConfig::default()
        });
        assert!(matches!(result, Err(RemoteLogError::InvalidUrl(_))));
    }
}
