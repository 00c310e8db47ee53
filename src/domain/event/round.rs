//! Round step - the pure core of the round controller.
//!
//! `open_round` and `apply_reply` take a prior snapshot (or none), the
//! partial field map from extraction, and the round's inbound metadata, and
//! return the next snapshot. They perform no I/O; extraction, drafting and
//! persistence are driven by the application layer around them.

use sha2::{Digest, Sha256};

use crate::domain::foundation::{EventId, Language, StateMachine, Timestamp};

use super::aggregate::{EventRecord, Snapshot};
use super::attachments::extract_attachments;
use super::completion::evaluate;
use super::email_mode::{select_mode, EmailMode};
use super::errors::EventError;
use super::fields::{EventFields, PartialFieldMap};
use super::merger::{merge, FieldChange, FieldFailure};
use super::status::EventStatus;

/// Round number of the first snapshot.
pub const FIRST_ROUND: u32 = 1;

/// Metadata of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInput {
    /// Hex SHA-256 of the inbound text.
    pub digest: String,
    pub received_at: Timestamp,
    pub attachments: Vec<String>,
}

impl RoundInput {
    pub fn from_text(text: &str, received_at: Timestamp) -> Self {
        Self {
            digest: message_digest(text),
            received_at,
            attachments: extract_attachments(text),
        }
    }
}

/// Hex SHA-256 of a message.
pub fn message_digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Status change applied by a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: EventStatus,
    pub to: EventStatus,
}

impl StatusTransition {
    /// True when a complete record fell back to awaiting a reply.
    pub fn is_regression(&self) -> bool {
        self.from == EventStatus::Complete && self.to == EventStatus::AwaitingReply
    }
}

/// Result of one round step.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub record: EventRecord,
    pub failures: Vec<FieldFailure>,
    pub changes: Vec<FieldChange>,
    pub transition: StatusTransition,
    pub mode: EmailMode,
}

/// Builds the round-1 snapshot from an initial email's extraction.
pub fn open_round(
    event_id: EventId,
    language: Language,
    partial: &PartialFieldMap,
    input: RoundInput,
) -> Result<RoundOutcome, EventError> {
    let (snapshot, transition) = step(
        EventStatus::Initial,
        &EventFields::new(),
        FIRST_ROUND,
        partial,
        input,
    )?;
    Ok(finish(EventRecord::first(event_id, language, snapshot), transition))
}

/// Builds the snapshot that follows `prior` from a reply's extraction.
///
/// `expected_round` must equal the prior snapshot's round number; a stale or
/// future round is rejected without producing anything.
pub fn apply_reply(
    prior: &EventRecord,
    expected_round: u32,
    partial: &PartialFieldMap,
    input: RoundInput,
) -> Result<RoundOutcome, EventError> {
    check_round(prior, expected_round)?;
    let next_round = prior.round_number().checked_add(1).ok_or_else(|| {
        EventError::invalid_state(format!("round counter exhausted for {}", prior.event_id()))
    })?;

    let (snapshot, transition) =
        step(prior.status(), prior.fields(), next_round, partial, input)?;
    Ok(finish(prior.next(snapshot), transition))
}

/// Rejects a reply whose expected round is not the current one.
pub fn check_round(prior: &EventRecord, expected_round: u32) -> Result<(), EventError> {
    if expected_round != prior.round_number() {
        return Err(EventError::round_mismatch(
            prior.event_id().clone(),
            expected_round,
            prior.round_number(),
        ));
    }
    Ok(())
}

fn step(
    from: EventStatus,
    prior_fields: &EventFields,
    round_number: u32,
    partial: &PartialFieldMap,
    input: RoundInput,
) -> Result<(Snapshot, StatusTransition), EventError> {
    let merged = merge(prior_fields, partial);
    let completion = evaluate(&merged.fields);
    let to = from.transition_to(EventStatus::for_completion(completion.is_complete()))?;

    let snapshot = Snapshot {
        round_number,
        fields: merged.fields,
        status: to,
        source_digest: input.digest,
        attachments: input.attachments,
        failures: merged.failures,
        changes: merged.changes,
        at: input.received_at,
    };
    Ok((snapshot, StatusTransition { from, to }))
}

fn finish(record: EventRecord, transition: StatusTransition) -> RoundOutcome {
    RoundOutcome {
        failures: record.failures().to_vec(),
        changes: record.changes().to_vec(),
        mode: select_mode(&record.completion(), record.fields()),
        record,
        transition,
    }
}
