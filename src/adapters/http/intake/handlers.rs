//! HTTP handlers for intake endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    GetEventHandler, GetEventHistoryHandler, GetEventQuery, ProcessInitialCommand,
    ProcessInitialHandler, ProcessReplyCommand, ProcessReplyHandler,
};
use crate::domain::event::EventError;
use crate::domain::foundation::{EventId, Timestamp};

use super::dto::{
    ErrorResponse, EventHistoryResponse, EventResponse, HealthResponse, ProcessEmailRequest,
    ProcessReplyRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct IntakeHandlers {
    process_initial: Arc<ProcessInitialHandler>,
    process_reply: Arc<ProcessReplyHandler>,
    get_event: Arc<GetEventHandler>,
    get_history: Arc<GetEventHistoryHandler>,
}

impl IntakeHandlers {
    pub fn new(
        process_initial: Arc<ProcessInitialHandler>,
        process_reply: Arc<ProcessReplyHandler>,
        get_event: Arc<GetEventHandler>,
        get_history: Arc<GetEventHistoryHandler>,
    ) -> Self {
        Self {
            process_initial,
            process_reply,
            get_event,
            get_history,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/process-email - Open an event from an initial email
pub async fn process_email(
    State(handlers): State<IntakeHandlers>,
    Json(req): Json<ProcessEmailRequest>,
) -> Response {
    let cmd = ProcessInitialCommand {
        email_content: req.email_content,
        language: req.language,
        timeout: req.timeout_secs.map(Duration::from_secs),
    };

    match handlers.process_initial.handle(cmd).await {
        Ok(result) => {
            let status = if result.replayed {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, Json(EventResponse::from(result))).into_response()
        }
        Err(e) => handle_event_error(e),
    }
}

/// POST /api/process-reply - Fold a reply into an event
pub async fn process_reply(
    State(handlers): State<IntakeHandlers>,
    Json(req): Json<ProcessReplyRequest>,
) -> Response {
    let event_id = match parse_event_id(&req.event_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ProcessReplyCommand {
        event_id,
        reply_content: req.reply_content,
        round_number: req.round_number,
        timeout: req.timeout_secs.map(Duration::from_secs),
    };

    match handlers.process_reply.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(EventResponse::from(result))).into_response(),
        Err(e) => handle_event_error(e),
    }
}

/// GET /api/events/:id - Latest snapshot of an event
pub async fn get_event(
    State(handlers): State<IntakeHandlers>,
    Path(event_id): Path<String>,
) -> Response {
    let event_id = match parse_event_id(&event_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_event.handle(GetEventQuery { event_id }).await {
        Ok(record) => (StatusCode::OK, Json(EventResponse::from(&record))).into_response(),
        Err(e) => handle_event_error(e),
    }
}

/// GET /api/events/:id/history - Every round of an event
pub async fn get_event_history(
    State(handlers): State<IntakeHandlers>,
    Path(event_id): Path<String>,
) -> Response {
    let event_id = match parse_event_id(&event_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetEventQuery {
        event_id: event_id.clone(),
    };
    match handlers.get_history.handle(query).await {
        Ok(history) => (
            StatusCode::OK,
            Json(EventHistoryResponse::new(&event_id, &history)),
        )
            .into_response(),
        Err(e) => handle_event_error(e),
    }
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Timestamp::now().to_rfc3339(),
    })
}

fn parse_event_id(raw: &str) -> Result<EventId, Response> {
    raw.parse::<EventId>().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::bad_request(format!("Invalid event ID: {}", e))
                    .with_details(serde_json::json!({ "field": "event_id" })),
            ),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn status_for(error: &EventError) -> StatusCode {
    match error {
        EventError::InvalidInput { .. } | EventError::UnsupportedLanguage(_) => {
            StatusCode::BAD_REQUEST
        }
        EventError::UnknownEvent(_) => StatusCode::NOT_FOUND,
        EventError::RoundMismatch { .. } => StatusCode::CONFLICT,
        EventError::ExternalCapabilityFailure {
            timed_out: true, ..
        } => StatusCode::GATEWAY_TIMEOUT,
        EventError::ExternalCapabilityFailure { .. } => StatusCode::BAD_GATEWAY,
        EventError::InvalidState(_) | EventError::Infrastructure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn handle_event_error(error: EventError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}
