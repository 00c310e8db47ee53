//! Field Extractor Port - Interface for the extraction capability.
//!
//! The extraction capability turns free email text into a partial field map.
//! It is nondeterministic and usually backed by an LLM, so it lives behind
//! this port and the round step never calls it directly.
//!
//! # Contract
//!
//! - Fields not evidenced in the text are omitted from the map.
//! - Values are raw; validation happens during merge.
//! - Implementations may return corrections for fields outside `focus_fields`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::{FieldKey, PartialFieldMap};
use crate::domain::foundation::Language;

/// Port for field extraction.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Extract field values from inbound text.
    async fn extract(&self, request: ExtractionRequest) -> Result<PartialFieldMap, ExtractionError>;

    /// Name of the backing model or implementation, for logging.
    fn name(&self) -> String;
}

/// Request for one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Inbound email text.
    pub text: String,
    /// Language of the thread.
    pub language: Language,
    /// Fields still missing; empty for an initial email.
    pub focus_fields: Vec<FieldKey>,
    /// True when the text answers an earlier outbound email.
    pub is_reply: bool,
}

impl ExtractionRequest {
    /// Creates a request for an initial email.
    pub fn initial(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
            focus_fields: Vec::new(),
            is_reply: false,
        }
    }

    /// Creates a request for a reply, hinting at the still-missing fields.
    pub fn reply(text: impl Into<String>, language: Language, focus_fields: Vec<FieldKey>) -> Self {
        Self {
            text: text.into(),
            language,
            focus_fields,
            is_reply: true,
        }
    }
}

/// Errors from the extraction capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with something that is not a field map.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl ExtractionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractionError::RateLimited { .. }
                | ExtractionError::Unavailable { .. }
                | ExtractionError::Network(_)
                | ExtractionError::Timeout { .. }
        )
    }
}
