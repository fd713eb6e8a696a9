//! Wire types and errors for the external completion API.
//!
//! The upstream contract is an OpenAI-style chat completion: POST JSON
//! `{model, messages, temperature, max_tokens}`, reply text at
//! `choices[0].message.content`. Anything else is a gateway failure --
//! the response shape is decoded exactly once at the gateway boundary.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Outbound completion request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Inbound completion response body. Fields beyond the reply path are
/// ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Extract the reply text, if the body has the expected shape.
    pub fn reply_text(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

/// Errors from the completion or form-intake endpoints.
///
/// Callers never surface these to users directly; a fixed fallback string
/// replaces them at the controller.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response body: {0}")]
    MalformedResponse(String),
}
