use async_trait::async_trait;
use reelsift_model::{
    BatchOutcome, DuplicateTask, LibrarySummary, RawPolicy, ScanAck, TaskId,
};
use thiserror::Error;

/// Failures talking to the backend. None of them mutate local state.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {reason}")]
    Status {
        endpoint: &'static str,
        status: u16,
        reason: String,
    },

    #[error("{endpoint} rejected the request: {reason}")]
    Rejected {
        endpoint: &'static str,
        reason: String,
    },

    #[error("{endpoint} returned no data")]
    EmptyPayload { endpoint: &'static str },

    #[error("failed to decode response from {endpoint}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    /// Transient failures worth offering a retry for: unreachable backend,
    /// throttling and server-side errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Transport { .. } => true,
            BackendError::Status { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

/// Request/response contract of the backend that owns scanning, best-version
/// evaluation and deletion.
#[async_trait]
pub trait DedupeBackend: Send + Sync {
    async fn fetch_policy(&self) -> Result<RawPolicy, BackendError>;

    async fn save_policy(&self, policy: &RawPolicy) -> Result<(), BackendError>;

    async fn fetch_tasks(&self) -> Result<Vec<DuplicateTask>, BackendError>;

    /// Start an asynchronous full-library scan. Does not wait for it.
    async fn trigger_scan(&self) -> Result<ScanAck, BackendError>;

    /// Keep each task's best version and delete the rest. Irreversible.
    async fn execute(
        &self,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError>;

    /// Exclude tasks from future listings without touching files.
    async fn ignore(
        &self,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError>;

    /// Drop tasks from the current listing only.
    async fn remove(
        &self,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError>;

    async fn fetch_libraries(&self)
    -> Result<Vec<LibrarySummary>, BackendError>;
}
