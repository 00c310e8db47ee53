//! OpenAI-compatible field extractor.
//!
//! Talks to any chat-completions endpoint with the OpenAI wire format. Groq
//! is the default backend; OpenAI itself works by changing the base URL and
//! model.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ExtractorConfig::groq(api_key)
//!     .with_model("llama-3.3-70b-versatile")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let extractor = OpenAiExtractor::new(config)?;
//! ```
//!
//! The adapter makes one attempt per call. Retries and the overall deadline
//! belong to the caller.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::prompts::{system_prompt, user_prompt};
use super::response_parser::parse_extraction;
use crate::domain::event::PartialFieldMap;
use crate::ports::{ExtractionError, ExtractionRequest, FieldExtractor};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl ExtractorConfig {
    /// Groq defaults.
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: GROQ_DEFAULT_MODEL.to_string(),
            base_url: GROQ_BASE_URL.to_string(),
            temperature: 0.2,
            timeout: Duration::from_secs(30),
        }
    }

    /// OpenAI defaults.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            model: OPENAI_DEFAULT_MODEL.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            ..Self::groq(api_key)
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Field extractor backed by an OpenAI-compatible chat model.
pub struct OpenAiExtractor {
    config: ExtractorConfig,
    client: Client,
}

impl OpenAiExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExtractionError::InvalidRequest(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_chat_request(&self, request: &ExtractionRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(request),
                },
            ],
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        }
    }

    async fn send_request(&self, request: &ExtractionRequest) -> Result<Response, ExtractionError> {
        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&self.to_chat_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    ExtractionError::network(format!("Connection failed: {}", e))
                } else {
                    ExtractionError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(response: Response) -> Result<Response, ExtractionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(ExtractionError::AuthenticationFailed),
            429 => Err(ExtractionError::RateLimited {
                retry_after_secs: parse_retry_after(&error_body),
            }),
            400 | 404 | 422 => Err(ExtractionError::InvalidRequest(error_body)),
            500..=599 => Err(ExtractionError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(ExtractionError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn parse_response(&self, response: Response) -> Result<PartialFieldMap, ExtractionError> {
        let response = Self::handle_response_status(response).await?;
        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::parse(format!("Failed to parse response: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ExtractionError::parse("No choices in response"))?;
        debug!(model = %self.config.model, chars = content.len(), "Extraction response received");

        parse_extraction(&content)
    }
}

/// Reads "try again in Ns" from a rate-limit body, defaulting to 30s.
fn parse_retry_after(error_body: &str) -> u32 {
    let message = serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| error_body.to_string());

    message
        .find("try again in ")
        .map(|idx| &message[idx + "try again in ".len()..])
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

#[async_trait]
impl FieldExtractor for OpenAiExtractor {
    async fn extract(&self, request: ExtractionRequest) -> Result<PartialFieldMap, ExtractionError> {
        if request.text.trim().is_empty() {
            return Err(ExtractionError::InvalidRequest("empty text".to_string()));
        }
        let response = self.send_request(&request).await?;
        self.parse_response(response).await
    }

    fn name(&self) -> String {
        self.config.model.clone()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
