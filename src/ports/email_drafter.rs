//! Email Drafter Port - Interface for the drafting capability.
//!
//! The drafter receives the structured state of a round and returns the
//! outbound email text. It decides wording only; which kind of email to
//! write is fixed by the [`EmailMode`] chosen in the domain.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::{EmailMode, EventRecord, OutboundEmail};
use crate::domain::foundation::{EventId, Language};

/// Port for drafting outbound emails.
#[async_trait]
pub trait EmailDrafter: Send + Sync {
    /// Draft the outbound email for a round.
    async fn draft(&self, request: DraftRequest) -> Result<OutboundEmail, DraftError>;
}

/// Structured input for one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
    pub event_id: EventId,
    /// Round the email is written for.
    pub round_number: u32,
    pub language: Language,
    /// First name used in the greeting, if known.
    pub first_name: Option<String>,
    pub mode: EmailMode,
}

impl DraftRequest {
    /// Builds the drafting input for a record snapshot.
    pub fn for_record(record: &EventRecord) -> Self {
        Self {
            event_id: record.event_id().clone(),
            round_number: record.round_number(),
            language: record.language(),
            first_name: record.first_name().map(str::to_string),
            mode: record.email_mode(),
        }
    }
}

/// Errors from the drafting capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("drafter unavailable: {message}")]
    Unavailable { message: String },

    #[error("network error: {0}")]
    Network(String),

    /// The draft could not be rendered from the given input.
    #[error("rendering failed: {0}")]
    Rendering(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl DraftError {
    pub fn rendering(message: impl Into<String>) -> Self {
        Self::Rendering(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DraftError::Unavailable { .. } | DraftError::Network(_) | DraftError::Timeout { .. }
        )
    }
}
