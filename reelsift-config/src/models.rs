use std::time::Duration;

use reelsift_core::api::HttpBackendSettings;
use reelsift_core::api::http::normalize_base_url;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigLoadError;

const DEFAULT_BASE_URL: &str = "http://localhost:8096";
const DEFAULT_API_VERSION: &str = "v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOG_FILTER: &str = "info,reelsift_core=info";

/// Durations are written the human way (`"30s"`, `"1m 30s"`).
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer
            .serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

/// Where the deduplication backend lives and how to talk to it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Scheme is optional; `http://` is assumed.
    pub base_url: String,
    pub api_version: String,
    #[serde(with = "humantime_duration")]
    pub request_timeout: Duration,
    /// Sent as `X-Api-Key` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl BackendConfig {
    pub fn http_settings(&self) -> HttpBackendSettings {
        HttpBackendSettings {
            base_url: self.base_url.clone(),
            api_version: self.api_version.clone(),
            timeout: self.request_timeout,
            api_key: self.api_key.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn parse_toml(raw: &str, origin: &str) -> Result<Self, ConfigLoadError> {
        toml::from_str(raw).map_err(|source| ConfigLoadError::Toml {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn parse_json(raw: &str, origin: &str) -> Result<Self, ConfigLoadError> {
        serde_json::from_str(raw).map_err(|source| ConfigLoadError::Json {
            origin: origin.to_string(),
            source,
        })
    }

    /// Try TOML first, then JSON. The TOML error is reported when both fail.
    pub fn parse_from_str(
        raw: &str,
        origin: &str,
    ) -> Result<Self, ConfigLoadError> {
        Self::parse_toml(raw, origin)
            .or_else(|toml_err| Self::parse_json(raw, origin).map_err(|_| toml_err))
    }

    /// Normalize the base URL and reject values the client cannot use.
    pub fn validate(mut self) -> Result<Self, ConfigLoadError> {
        let normalized = normalize_base_url(&self.backend.base_url);
        Url::parse(&normalized).map_err(|source| {
            ConfigLoadError::InvalidBaseUrl {
                url: self.backend.base_url.clone(),
                source,
            }
        })?;
        self.backend.base_url = normalized;

        self.backend.api_version = self.backend.api_version.trim().to_string();
        if self.backend.api_version.is_empty() {
            return Err(ConfigLoadError::EmptyApiVersion);
        }
        if self.backend.request_timeout.is_zero() {
            return Err(ConfigLoadError::ZeroTimeout);
        }
        self.backend.api_key = self
            .backend
            .api_key
            .take()
            .filter(|key| !key.trim().is_empty());
        Ok(self)
    }
}
