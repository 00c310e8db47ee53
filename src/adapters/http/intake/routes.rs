//! HTTP routes for intake endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_event, get_event_history, process_email, process_reply, IntakeHandlers,
};

/// Creates the intake router with all endpoints.
pub fn intake_routes(handlers: IntakeHandlers) -> Router {
    Router::new()
        .route("/process-email", post(process_email))
        .route("/process-reply", post(process_reply))
        .route("/events/:id", get(get_event))
        .route("/events/:id/history", get(get_event_history))
        .with_state(handlers)
}
