//! HTTP DTOs for intake endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::application::RoundResult;
use crate::domain::event::{EventError, EventRecord, EventStatus, FieldFailure};
use crate::domain::foundation::{EventId, Language};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

fn default_language() -> String {
    Language::English.as_str().to_string()
}

/// Request to process an initial event email.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessEmailRequest {
    pub email_content: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Optional per-request capability deadline.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Request to process a reply to an outbound email.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessReplyRequest {
    pub event_id: String,
    pub reply_content: String,
    pub round_number: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A field value rejected during the round.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailureResponse {
    pub field: String,
    pub value: Value,
    pub code: String,
    pub reason: String,
}

impl From<&FieldFailure> for ValidationFailureResponse {
    fn from(failure: &FieldFailure) -> Self {
        Self {
            field: failure.key.as_str().to_string(),
            value: failure.raw.clone(),
            code: failure.code.clone(),
            reason: failure.reason.clone(),
        }
    }
}

/// State of an event after a round.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub event_id: String,
    pub round_number: u32,
    pub language: Language,
    pub extracted_data: Map<String, Value>,
    pub missing_fields: Vec<String>,
    pub is_complete: bool,
    pub followup_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_subject: Option<String>,
    pub attachments: Vec<String>,
    pub status: EventStatus,
    pub email_mode: String,
    pub validation_failures: Vec<ValidationFailureResponse>,
    /// True when an identical submission had already produced this round.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub replayed: bool,
    pub updated_at: String,
}

impl From<&EventRecord> for EventResponse {
    fn from(record: &EventRecord) -> Self {
        let email = record.outbound_email();
        Self {
            event_id: record.event_id().to_string(),
            round_number: record.round_number(),
            language: record.language(),
            extracted_data: record.fields().to_json_map(),
            missing_fields: record
                .missing_fields()
                .into_iter()
                .map(|key| key.as_str().to_string())
                .collect(),
            is_complete: record.is_complete(),
            followup_email: email.map(|e| e.body.clone()),
            followup_subject: email.map(|e| e.subject.clone()),
            attachments: record.attachments().to_vec(),
            status: record.status(),
            email_mode: record.email_mode().kind().to_string(),
            validation_failures: record.failures().iter().map(Into::into).collect(),
            replayed: false,
            updated_at: record.updated_at().to_rfc3339(),
        }
    }
}

impl From<RoundResult> for EventResponse {
    fn from(result: RoundResult) -> Self {
        let mut response = EventResponse::from(&result.record);
        response.replayed = result.replayed;
        response
    }
}

/// All rounds of an event, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct EventHistoryResponse {
    pub event_id: String,
    pub rounds: Vec<EventResponse>,
}

impl EventHistoryResponse {
    pub fn new(event_id: &EventId, history: &[EventRecord]) -> Self {
        Self {
            event_id: event_id.to_string(),
            rounds: history.iter().map(EventResponse::from).collect(),
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&EventError> for ErrorResponse {
    fn from(error: &EventError) -> Self {
        let response = Self {
            code: error.code().to_string(),
            message: error.to_string(),
            details: None,
        };
        match error {
            EventError::RoundMismatch {
                expected, current, ..
            } => response.with_details(json!({
                "expected_round": expected,
                "current_round": current,
            })),
            EventError::ExternalCapabilityFailure {
                capability,
                timed_out,
                ..
            } => response.with_details(json!({
                "capability": capability.to_string(),
                "timed_out": timed_out,
            })),
            EventError::InvalidInput { field, .. } => {
                response.with_details(json!({ "field": field }))
            }
            _ => response,
        }
    }
}
