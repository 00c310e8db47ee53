//! Shared plumbing for the intake handlers.
//!
//! Extraction and drafting are the only suspension points of a round. Both
//! share one deadline fixed when the round starts, and are retried on
//! transient errors; the adapters themselves make one attempt per call.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout_at, Instant};
use tracing::{error, warn};

use crate::domain::event::{Capability, EventError, EventRecord, OutboundEmail, PartialFieldMap};
use crate::ports::{
    DraftError, DraftRequest, EmailDrafter, ExtractionError, ExtractionRequest, FieldExtractor,
};

/// Settings shared by the intake command handlers.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Time budget for all capability calls of one round, retries included.
    pub capability_timeout: Duration,
    /// Additional attempts after a transient failure.
    pub max_retries: u32,
    /// Pause before the first retry; doubles on each further retry.
    pub retry_backoff: Duration,
    /// Upper bound on inbound text size in bytes.
    pub max_message_bytes: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            capability_timeout: Duration::from_secs(45),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            max_message_bytes: 100_000,
        }
    }
}

impl IntakeConfig {
    /// Time budget for a round, preferring the caller's override.
    pub fn budget(&self, requested: Option<Duration>) -> Duration {
        requested.unwrap_or(self.capability_timeout)
    }

    /// Instant by which every capability call of a round starting now must
    /// have finished.
    pub fn deadline(&self, requested: Option<Duration>) -> Instant {
        Instant::now() + self.budget(requested)
    }

    /// Rejects empty or oversized inbound text.
    pub fn check_message(&self, field: &str, text: &str) -> Result<(), EventError> {
        if text.trim().is_empty() {
            return Err(EventError::invalid_input(field, "must not be empty"));
        }
        if text.len() > self.max_message_bytes {
            return Err(EventError::invalid_input(
                field,
                format!("exceeds {} bytes", self.max_message_bytes),
            ));
        }
        Ok(())
    }
}

/// Port errors that may clear up on a second attempt.
pub(super) trait TransientError: fmt::Display {
    fn is_transient(&self) -> bool;
    fn is_timeout(&self) -> bool;
}

impl TransientError for ExtractionError {
    fn is_transient(&self) -> bool {
        self.is_retryable()
    }

    fn is_timeout(&self) -> bool {
        matches!(self, ExtractionError::Timeout { .. })
    }
}

impl TransientError for DraftError {
    fn is_transient(&self) -> bool {
        self.is_retryable()
    }

    fn is_timeout(&self) -> bool {
        matches!(self, DraftError::Timeout { .. })
    }
}

/// Runs `attempt` until it succeeds, fails permanently, runs out of
/// retries, or the deadline passes.
pub(super) async fn call_capability<T, E, F, Fut>(
    capability: Capability,
    deadline: Instant,
    config: &IntakeConfig,
    mut attempt: F,
) -> Result<T, EventError>
where
    E: TransientError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let retries = async {
        let mut retry = 0u32;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && retry < config.max_retries => {
                    let pause = config.retry_backoff.saturating_mul(1 << retry.min(16));
                    retry += 1;
                    warn!(%capability, attempt = retry, error = %err, "retrying capability call");
                    sleep(pause).await;
                }
                Err(err) => return Err(err),
            }
        }
    };

    match timeout_at(deadline, retries).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            error!(%capability, error = %err, "capability call failed");
            if err.is_timeout() {
                Err(EventError::capability_timeout(capability, err.to_string()))
            } else {
                Err(EventError::capability(capability, err.to_string()))
            }
        }
        Err(_) => {
            error!(%capability, "capability call ran past the round deadline");
            Err(EventError::capability_timeout(
                capability,
                "round deadline passed before an answer arrived",
            ))
        }
    }
}

/// Extracts a partial field map under the deadline.
pub(super) async fn extract_fields(
    extractor: &dyn FieldExtractor,
    request: ExtractionRequest,
    deadline: Instant,
    config: &IntakeConfig,
) -> Result<PartialFieldMap, EventError> {
    call_capability(Capability::Extraction, deadline, config, || {
        extractor.extract(request.clone())
    })
    .await
}

/// Drafts the outbound email for a snapshot under the deadline.
pub(super) async fn draft_email(
    drafter: &dyn EmailDrafter,
    record: &EventRecord,
    deadline: Instant,
    config: &IntakeConfig,
) -> Result<OutboundEmail, EventError> {
    let request = DraftRequest::for_record(record);
    call_capability(Capability::Drafting, deadline, config, || {
        drafter.draft(request.clone())
    })
    .await
}
