use std::time::Duration;

use async_trait::async_trait;
use reelsift_model::{
    BatchOutcome, DuplicateTask, LibrarySummary, RawPolicy, ScanAck, TaskId,
    TaskIdsRequest,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};
use url::Url;

use super::backend::{BackendError, DedupeBackend};
use super::routes::{self, dedupe, libraries};
use super::types::ApiResponse;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Connection settings for [`HttpBackend`].
#[derive(Clone)]
pub struct HttpBackendSettings {
    pub base_url: String,
    pub api_version: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl Default for HttpBackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8096".to_string(),
            api_version: routes::DEFAULT_VERSION.to_string(),
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for HttpBackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackendSettings")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

/// [`DedupeBackend`] speaking JSON over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    api_version: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

/// Add `http://` when no scheme is given and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
    {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if with_scheme != raw {
        warn!(from = raw, to = %with_scheme, "normalized backend base URL");
    }
    with_scheme
}

impl HttpBackend {
    pub fn new(settings: HttpBackendSettings) -> Result<Self, BackendError> {
        let base_url = normalize_base_url(&settings.base_url);
        Url::parse(&base_url).map_err(|source| BackendError::InvalidUrl {
            url: base_url.clone(),
            source,
        })?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(BackendError::Client)?;

        info!(base_url = %base_url, version = %settings.api_version, "created backend client");

        Ok(Self {
            client,
            base_url,
            api_version: settings.api_version,
            api_key: settings.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Versioned URL for a route path.
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.base_url,
            self.api_version,
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.build_url(path));
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    /// Send and unwrap the envelope. Non-success statuses carry the
    /// envelope's reason when the body has one.
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;

        debug!(endpoint, status = status.as_u16(), bytes = body.len(), "backend response");

        if !status.is_success() {
            let reason =
                serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                    .ok()
                    .and_then(|envelope| envelope.reason().map(str::to_string))
                    .unwrap_or_else(|| {
                        status.canonical_reason().unwrap_or("unknown").to_string()
                    });
            return Err(BackendError::Status {
                endpoint,
                status: status.as_u16(),
                reason,
            });
        }

        // 202/204 acknowledgements may come without a body.
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse::empty());
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&body)
            .map_err(|source| BackendError::Decode { endpoint, source })?;
        if envelope.is_error() {
            return Err(BackendError::Rejected {
                endpoint,
                reason: envelope.reason().unwrap_or("unspecified").to_string(),
            });
        }
        Ok(envelope)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<T, BackendError> {
        let envelope = self
            .send(endpoint, self.request(Method::GET, endpoint))
            .await?;
        envelope.data.ok_or(BackendError::EmptyPayload { endpoint })
    }

    async fn post_batch(
        &self,
        endpoint: &'static str,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError> {
        let body = TaskIdsRequest {
            task_ids: task_ids.to_vec(),
        };
        // A 2xx means the action ran. Any payload shape is accepted.
        let envelope = self
            .send::<serde_json::Value>(
                endpoint,
                self.json(Method::POST, endpoint, &body),
            )
            .await?;
        Ok(batch_outcome(envelope))
    }

    fn json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &'static str,
        body: &B,
    ) -> RequestBuilder {
        self.request(method, endpoint).json(body)
    }
}

fn batch_outcome(envelope: ApiResponse<serde_json::Value>) -> BatchOutcome {
    let nested = envelope
        .data
        .as_ref()
        .and_then(|data| data.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);
    if envelope.data.as_ref().is_some_and(|data| !data.is_object()) {
        debug!(data = ?envelope.data, "batch acknowledgement carried a non-object payload");
    }
    BatchOutcome {
        message: nested
            .or(envelope.message)
            .unwrap_or_else(|| "ok".to_string()),
    }
}

#[async_trait]
impl DedupeBackend for HttpBackend {
    async fn fetch_policy(&self) -> Result<RawPolicy, BackendError> {
        self.fetch(dedupe::POLICY).await
    }

    async fn save_policy(&self, policy: &RawPolicy) -> Result<(), BackendError> {
        self.send::<serde_json::Value>(
            dedupe::POLICY,
            self.json(Method::PUT, dedupe::POLICY, policy),
        )
        .await?;
        Ok(())
    }

    async fn fetch_tasks(&self) -> Result<Vec<DuplicateTask>, BackendError> {
        self.fetch(dedupe::TASKS).await
    }

    async fn trigger_scan(&self) -> Result<ScanAck, BackendError> {
        let endpoint = dedupe::SCAN;
        match self
            .send::<serde_json::Value>(
                endpoint,
                self.request(Method::POST, endpoint),
            )
            .await
        {
            Ok(_) => Ok(ScanAck::Accepted),
            Err(BackendError::Status {
                status: 409, reason, ..
            }) => Ok(ScanAck::Busy {
                reason: Some(reason),
            }),
            Err(err) => Err(err),
        }
    }

    async fn execute(
        &self,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError> {
        self.post_batch(dedupe::EXECUTE, task_ids).await
    }

    async fn ignore(
        &self,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError> {
        self.post_batch(dedupe::IGNORE, task_ids).await
    }

    async fn remove(
        &self,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError> {
        self.post_batch(dedupe::REMOVE, task_ids).await
    }

    async fn fetch_libraries(
        &self,
    ) -> Result<Vec<LibrarySummary>, BackendError> {
        self.fetch(libraries::COLLECTION).await
    }
}
