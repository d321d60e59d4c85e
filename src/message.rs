// src/message.rs
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatMessageRequest {
    pub fn new(message: impl Into<String>, session_id: Option<&str>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub reply: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One entry of a session's history as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Milliseconds since the Unix epoch.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
}

// Backends written in JS send `Date.now()`-style numbers, which may arrive
// as floats (`1.7e12`, `1700000000000.5`). Fractions are rounded.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(millis) = number.as_i64() {
        return Ok(millis);
    }
    match number.as_f64() {
        Some(millis) if millis.is_finite() => Ok(millis.round() as i64),
        _ => Err(de::Error::custom(format!("timestamp out of range: {number}"))),
    }
}
