// src/services/conversation.rs
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};
use uuid::Uuid;

use super::chat_api::ChatClient;
use crate::{
    error::ClientError,
    message::{Message, Sender},
};

/// A chat session seen from the client side: remembers the session id the
/// backend hands out and keeps a local transcript of the exchange.
#[derive(Debug, Clone)]
pub struct Conversation {
    client: ChatClient,
    session_id: Option<String>,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(client: ChatClient) -> Self {
        Self { client, session_id: None, messages: Vec::new() }
    }

    // Continue a session started elsewhere. The transcript stays empty
    // until `refresh` is called.
    pub fn resume(client: ChatClient, session_id: impl Into<String>) -> Self {
        Self {
            client,
            session_id: Some(session_id.into()),
            messages: Vec::new(),
        }
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Send `text` and return the reply. On failure nothing is recorded.
    pub async fn send(&mut self, text: &str) -> Result<String, ClientError> {
        let sent_at = now_millis();
        let response = self
            .client
            .send_message(text, self.session_id.as_deref())
            .await?;

        if self.session_id.as_deref() != Some(response.session_id.as_str()) {
            debug!(session_id = %response.session_id, "session assigned");
        }
        self.session_id = Some(response.session_id);

        self.messages.push(local_message(text, Sender::User, sent_at));
        self.messages
            .push(local_message(&response.reply, Sender::Ai, now_millis()));

        Ok(response.reply)
    }

    /// Replace the transcript with the backend's stored history.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let Some(session_id) = self.session_id.as_deref() else {
            return Ok(());
        };
        self.messages = self.client.get_chat_history(session_id).await?;
        Ok(())
    }
}

fn local_message(text: &str, sender: Sender, timestamp: i64) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        sender,
        timestamp,
    }
}

fn now_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => millis_since_epoch(elapsed),
        Err(e) => {
            warn!("system clock is before the Unix epoch: {e}");
            0
        }
    }
}

fn millis_since_epoch(elapsed: Duration) -> i64 {
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}
