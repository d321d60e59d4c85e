// src/services/chat_api.rs
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::ClientError,
    message::{ChatMessageRequest, ChatMessageResponse, Message},
};

const MESSAGE_PATH: &str = "/chat/message";
const HISTORY_PATH: &str = "/chat/history";

/// Stateless wrapper around the chat backend's HTTP API.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection
/// pool between clones.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one user message. `session_id` is left out of the request body
    /// when `None`, and the backend assigns a fresh session.
    pub async fn send_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatMessageResponse, ClientError> {
        if message.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let url = self.config.endpoint(MESSAGE_PATH);
        let request = ChatMessageRequest::new(message, session_id);
        debug!(%url, has_session = session_id.is_some(), "POST chat message");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        debug!(%status, "chat message response");

        if !status.is_success() {
            let body = failure_body(response).await;
            warn!(%status, "sending message failed: {body}");
            return Err(ClientError::request_failed(status, &body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch the stored messages of a session. A body that is empty, not
    /// JSON, or not an array yields an empty history.
    pub async fn get_chat_history(&self, session_id: &str) -> Result<Vec<Message>, ClientError> {
        let url = self.config.endpoint(HISTORY_PATH);
        debug!(%url, session_id, "GET chat history");

        let response = self
            .http
            .get(&url)
            .query(&[("sessionId", session_id)])
            .send()
            .await?;
        let status = response.status();
        debug!(%status, "chat history response");

        if !status.is_success() {
            let body = failure_body(response).await;
            warn!(%status, "fetching history failed: {body}");
            return Err(ClientError::request_failed(status, &body));
        }

        let bytes = response.bytes().await?;
        Ok(parse_history(&bytes))
    }
}

// An unreadable error body leaves `RequestFailed` with the reason phrase.
async fn failure_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("could not read error body: {e}");
            String::new()
        }
    }
}

fn parse_history(body: &[u8]) -> Vec<Message> {
    let entries = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            debug!("history body is not an array ({}), treating as empty", kind_of(&other));
            return Vec::new();
        }
        Err(e) => {
            if !body.is_empty() {
                warn!("history body is not valid JSON: {e}");
            }
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Message>(entry) {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!("skipping malformed history entry: {e}");
                None
            }
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
