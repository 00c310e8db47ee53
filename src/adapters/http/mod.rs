//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the intake endpoints, the health check and the
//! tower-http middleware stack.

pub mod intake;

use std::time::Duration;

use axum::{routing::get, Router};
use http::{header, HeaderValue, Method};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

pub use intake::{health, intake_routes, IntakeHandlers};

/// Builds the full application router.
///
/// An empty `cors_origins` list allows any origin.
pub fn app_router(
    handlers: IntakeHandlers,
    cors_origins: &[String],
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", intake_routes(handlers))
        .layer(cors_layer(cors_origins))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}
