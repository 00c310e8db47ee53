//! Result shared by the round-processing commands.

use tracing::{info, warn};

use crate::domain::event::{EventRecord, RoundOutcome, StatusTransition};

/// Result of processing an initial email or a reply.
#[derive(Debug, Clone)]
pub struct RoundResult {
    /// The stored snapshot for the round.
    pub record: EventRecord,
    /// Status change applied by this call; `None` when replayed.
    pub transition: Option<StatusTransition>,
    /// True when an identical submission had already stored this round.
    pub replayed: bool,
}

impl RoundResult {
    pub(super) fn stored(record: EventRecord, transition: StatusTransition) -> Self {
        info!(
            event_id = %record.event_id(),
            round = record.round_number(),
            missing = record.missing_fields().len(),
            status = %record.status(),
            "round stored"
        );
        Self {
            record,
            transition: Some(transition),
            replayed: false,
        }
    }

    pub(super) fn replayed(record: EventRecord) -> Self {
        info!(
            event_id = %record.event_id(),
            round = record.round_number(),
            "identical submission, returning stored round"
        );
        Self {
            record,
            transition: None,
            replayed: true,
        }
    }
}

/// Logs field-local problems of a round step.
pub(super) fn log_outcome(outcome: &RoundOutcome) {
    let event_id = outcome.record.event_id();
    for failure in &outcome.failures {
        warn!(%event_id, field = %failure.key, reason = %failure.reason, "field value rejected");
    }
    if outcome.transition.is_regression() {
        warn!(%event_id, "correction reopened a complete request");
    }
}
