// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("request failed ({status}): {message}")]
    RequestFailed { status: StatusCode, message: String },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Build a `RequestFailed` from a failed response's status and body.
    pub fn request_failed(status: StatusCode, body: &str) -> Self {
        Self::RequestFailed {
            status,
            message: error_text(status, body),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

// JSON `error`/`message` field, then raw body, then the reason phrase.
fn error_text(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(serde_json::Value::String(text)) = map.get(key)
                && !text.trim().is_empty()
            {
                return text.trim().to_string();
            }
        }
    }

    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_string()
}
