// src/config.rs
use reqwest::Url;

use crate::error::ClientError;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "CHAT_API_BASE_URL";
/// Used when the environment does not provide a base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base: String = base_url.into();
        let base = base.trim();

        if base.is_empty() {
            return Err(ClientError::InvalidConfig("base URL is empty".to_string()));
        }
        let url = Url::parse(base)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid base URL '{base}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(Self { base_url: url.as_str().trim_end_matches('/').to_string() })
    }

    /// Resolve the base URL from `CHAT_API_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`] when it is unset or blank.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(resolve_base_url(std::env::var(BASE_URL_ENV).ok()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string() }
    }
}

fn resolve_base_url(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
