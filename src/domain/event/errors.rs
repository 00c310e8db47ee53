//! Event-specific error types.

use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{ErrorCode, EventId, UnsupportedLanguage, ValidationError};

/// External capability a round depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Extraction,
    Drafting,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Extraction => "extraction",
            Capability::Drafting => "drafting",
        })
    }
}

/// Errors that abort a round. None of them leave a partial record behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// No record exists for the id.
    #[error("Event not found: {0}")]
    UnknownEvent(EventId),

    /// The caller's round number is not the record's current round.
    #[error("Round mismatch for {event_id}: expected round {expected}, current round is {current}")]
    RoundMismatch {
        event_id: EventId,
        expected: u32,
        current: u32,
    },

    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguage),

    /// Extraction or drafting failed or timed out.
    #[error("{capability} failed: {reason}")]
    ExternalCapabilityFailure {
        capability: Capability,
        reason: String,
        timed_out: bool,
    },

    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl EventError {
    pub fn unknown_event(id: EventId) -> Self {
        EventError::UnknownEvent(id)
    }

    pub fn round_mismatch(event_id: EventId, expected: u32, current: u32) -> Self {
        EventError::RoundMismatch {
            event_id,
            expected,
            current,
        }
    }

    pub fn capability(capability: Capability, reason: impl Into<String>) -> Self {
        EventError::ExternalCapabilityFailure {
            capability,
            reason: reason.into(),
            timed_out: false,
        }
    }

    pub fn capability_timeout(capability: Capability, reason: impl Into<String>) -> Self {
        EventError::ExternalCapabilityFailure {
            capability,
            reason: reason.into(),
            timed_out: true,
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EventError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        EventError::InvalidState(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EventError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EventError::UnknownEvent(_) => ErrorCode::EventNotFound,
            EventError::RoundMismatch { .. } => ErrorCode::RoundMismatch,
            EventError::UnsupportedLanguage(_) => ErrorCode::UnsupportedLanguage,
            EventError::ExternalCapabilityFailure {
                timed_out: true, ..
            } => ErrorCode::CapabilityTimeout,
            EventError::ExternalCapabilityFailure {
                capability: Capability::Extraction,
                ..
            } => ErrorCode::ExtractionFailed,
            EventError::ExternalCapabilityFailure {
                capability: Capability::Drafting,
                ..
            } => ErrorCode::DraftingFailed,
            EventError::InvalidInput { .. } => ErrorCode::ValidationFailed,
            EventError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            EventError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }
}

impl From<ValidationError> for EventError {
    fn from(err: ValidationError) -> Self {
        EventError::InvalidState(err.to_string())
    }
}
