//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! One call per `complete`. Retrying is the orchestrator's decision, never
//! this module's.

use crate::config::LlmConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

/// User-Agent sent with every completion request
const USER_AGENT: &str = concat!("folio-ai/", env!("CARGO_PKG_VERSION"));

/// Longest response-body excerpt kept on a status error
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to completion API failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("completion API rejected credentials (HTTP {0})")]
    Unauthorized(u16),
    #[error("completion API rate limit exceeded")]
    RateLimited,
    #[error("completion API returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// A single chat-completion round trip.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the instruction pair and return the model's raw reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, TransportError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `reqwest`-backed client. Cheap to share: the inner `Client` pools
/// connections and is safe for concurrent use.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionClient {
    /// Build a client for `{base_url}/chat/completions`
    pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, TransportError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    TransportError::Unauthorized(status.as_u16())
                }
                StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited,
                _ => {
                    let text = response.text().await.unwrap_or_default();
                    TransportError::Status {
                        status: status.as_u16(),
                        body: excerpt(&text),
                    }
                }
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TransportError::MalformedResponse("no choices in response".into()))?;

        tracing::debug!(
            model = %self.model,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            latency_ms = start.elapsed().as_millis() as u64,
            "completion received"
        );

        // A null content falls through to JSON decoding, where it is retryable
        Ok(choice.message.content.unwrap_or_default())
    }
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
