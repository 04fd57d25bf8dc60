//! Local tier: the scheduler's log directory on disk.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::LogError;
use super::LogKey;

#[async_trait]
pub trait LocalLogReader: Send + Sync {
    async fn fetch_local_log(&self, key: &LogKey) -> Result<String, LogError>;
}

/// Reads `{directory}/{dag_id}/{task path}/{run_id}/{try_number}.log`
#[derive(Debug, Clone)]
pub struct LocalLogStore {
    directory: PathBuf,
}

impl LocalLogStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl LocalLogReader for LocalLogStore {
    async fn fetch_local_log(&self, key: &LogKey) -> Result<String, LogError> {
        let path = key.local_path(&self.directory);
        debug!(path = %path.display(), "Reading local log file");

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LogError::NotFound { path }),
            Err(e) => Err(LogError::ReadError {
                path,
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key() -> LogKey {
        LogKey::new("etl_daily", "scheduled__2024-03-01", "load.orders-TO-orders", 2)
    }

    #[tokio::test]
    async fn test_reads_existing_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = key().local_path(temp_dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "task started\ntask finished\n").unwrap();

        let store = LocalLogStore::new(temp_dir.path());
        let content = store.fetch_local_log(&key()).await.unwrap();
        assert_eq!(content, "task started\ntask finished\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalLogStore::new(temp_dir.path());

        match store.fetch_local_log(&key()).await {
            Err(LogError::NotFound { path }) => {
                assert!(path.ends_with("load/orders-TO-orders/scheduled__2024-03-01/2.log"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(key().local_path(temp_dir.path())).unwrap();

        let store = LocalLogStore::new(temp_dir.path());
        assert!(matches!(
            store.fetch_local_log(&key()).await,
            Err(LogError::ReadError { .. })
        ));
    }
}
