//! Two-tier log lookup.
//!
//! ```text
//! TryRemote ──ok──────────────▶ Found
//!     │ any failure
//!     ▼
//! TryLocal ──ok───────────────▶ Found
//!     ├── file absent ────────▶ NotFound
//!     └── other read failure ─▶ ReadError
//! ```
//!
//! `TryRemote` is skipped when no remote fetcher is configured.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::LogError;
use super::local::LocalLogReader;
use super::remote::RemoteLogFetcher;
use super::LogKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSource {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedLog {
    pub content: String,
    pub source: LogSource,
}

#[derive(Debug)]
enum LookupState {
    TryRemote,
    TryLocal,
    Found(RetrievedLog),
    NotFound { path: PathBuf },
    ReadError { path: PathBuf, reason: String },
}

pub struct LogRetriever {
    remote: Option<Arc<dyn RemoteLogFetcher>>,
    local: Arc<dyn LocalLogReader>,
}

impl std::fmt::Debug for LogRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRetriever")
            .field("remote_enabled", &self.remote.is_some())
            .finish_non_exhaustive()
    }
}

impl LogRetriever {
    pub fn new(remote: Option<Arc<dyn RemoteLogFetcher>>, local: Arc<dyn LocalLogReader>) -> Self {
        Self { remote, local }
    }

    pub fn local_only(local: Arc<dyn LocalLogReader>) -> Self {
        Self::new(None, local)
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    #[instrument(skip(self), fields(dag_id = %key.dag_id, run_id = %key.run_id, task_id = %key.task_id, try_number = key.try_number))]
    pub async fn retrieve(&self, key: &LogKey) -> Result<RetrievedLog, LogError> {
        let mut state = if self.remote.is_some() {
            LookupState::TryRemote
        } else {
            LookupState::TryLocal
        };

        loop {
            state = match state {
                LookupState::TryRemote => self.try_remote(key).await,
                LookupState::TryLocal => self.try_local(key).await,
                LookupState::Found(log) => {
                    info!(source = ?log.source, bytes = log.content.len(), "Task log retrieved");
                    return Ok(log);
                }
                LookupState::NotFound { path } => {
                    debug!(path = %path.display(), "Task log not found in any tier");
                    return Err(LogError::NotFound { path });
                }
                LookupState::ReadError { path, reason } => {
                    warn!(path = %path.display(), reason = %reason, "Task log unreadable");
                    return Err(LogError::ReadError { path, reason });
                }
            };
        }
    }

    async fn try_remote(&self, key: &LogKey) -> LookupState {
        let Some(remote) = &self.remote else {
            return LookupState::TryLocal;
        };

        match remote.fetch_remote_log(key).await {
            Ok(content) => LookupState::Found(RetrievedLog {
                content,
                source: LogSource::Remote,
            }),
            Err(err) => {
                warn!(error = %err, "Remote log lookup failed, falling back to local directory");
                LookupState::TryLocal
            }
        }
    }

    async fn try_local(&self, key: &LogKey) -> LookupState {
        match self.local.fetch_local_log(key).await {
            Ok(content) => LookupState::Found(RetrievedLog {
                content,
                source: LogSource::Local,
            }),
            Err(LogError::NotFound { path }) => LookupState::NotFound { path },
            Err(LogError::ReadError { path, reason }) => LookupState::ReadError { path, reason },
        }
    }
}
