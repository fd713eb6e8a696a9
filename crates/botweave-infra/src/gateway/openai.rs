//! OpenAI-compatible completion gateway.
//!
//! Implements `CompletionGateway` from `botweave-core` against any endpoint
//! speaking the chat-completions wire format. One request per turn, no
//! streaming; the widget renders whole replies.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use botweave_core::gateway::CompletionGateway;
use botweave_observe::genai_attrs::{OP_CHAT, PROVIDER_OPENAI};
use botweave_types::chat::{Message, MessageRole};
use botweave_types::config::GlobalConfig;
use botweave_types::gateway::{ChatRequest, ChatResponse, GatewayError};

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "BOTWEAVE_API_KEY";

/// HTTP client for the chat-completions endpoint.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key.
pub struct OpenAiGateway {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiGateway {
    pub fn new(config: &GlobalConfig, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.chat_endpoint.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Build a gateway reading the API key from `BOTWEAVE_API_KEY`.
    pub fn from_env(config: &GlobalConfig) -> anyhow::Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| anyhow::anyhow!("{API_KEY_ENV} is not set"))?;
        Ok(Self::new(config, SecretString::from(key)))
    }

    fn build_body(&self, system: &str, recent: &[Message]) -> ChatRequest {
        let mut messages = Vec::with_capacity(recent.len() + 1);
        messages.push(Message {
            role: MessageRole::System,
            content: system.to_string(),
        });
        messages.extend_from_slice(recent);

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, system: &str, recent: &[Message]) -> Result<String, GatewayError> {
        let body = self.build_body(system, recent);

        // Span name follows the OTel GenAI convention: "{operation} {model}".
        let span = tracing::info_span!(
            "chat_completion",
            otel.name = %format!("{OP_CHAT} {}", self.model),
            gen_ai.operation.name = OP_CHAT,
            gen_ai.provider.name = PROVIDER_OPENAI,
            gen_ai.request.model = %self.model,
            gen_ai.request.temperature = self.temperature,
            gen_ai.request.max_tokens = self.max_tokens,
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .instrument(span)
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        parsed
            .reply_text()
            .ok_or_else(|| GatewayError::MalformedResponse("no choices in response".to_string()))
    }
}
