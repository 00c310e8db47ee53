//! Event repository port.
//!
//! Stores one immutable snapshot per `(event_id, round_number)`. The latest
//! snapshot is the system of record; earlier ones form the audit history.
//!
//! # Idempotency
//!
//! `save_round` is insert-if-absent on `(event_id, round_number)`:
//!
//! - round absent and directly after the latest round: inserted
//! - round present with the same source digest: the stored snapshot is
//!   returned and nothing is written
//! - round present with a different digest, or a gap in the sequence:
//!   `RoundConflict`
//!
//! Implementations must make the check-and-insert atomic per event.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::{EventError, EventRecord};
use crate::domain::foundation::EventId;

/// Outcome of saving a round snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot was stored.
    Inserted,
    /// An identical submission for this round was already stored.
    AlreadyPresent(Box<EventRecord>),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Round {round_number} of {event_id} conflicts with stored history")]
    RoundConflict {
        event_id: EventId,
        round_number: u32,
    },

    #[error("Failed to serialize record: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize record: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl RepositoryError {
    pub fn round_conflict(event_id: EventId, round_number: u32) -> Self {
        RepositoryError::RoundConflict {
            event_id,
            round_number,
        }
    }
}

impl From<RepositoryError> for EventError {
    fn from(err: RepositoryError) -> Self {
        EventError::infrastructure(err.to_string())
    }
}

/// Repository port for event record snapshots.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store the snapshot for `record.round_number()`.
    ///
    /// # Errors
    ///
    /// - `RoundConflict` if a different submission already holds the round,
    ///   or the round does not directly follow the latest stored one
    /// - `IoError` / `SerializationFailed` on persistence failure
    async fn save_round(&self, record: &EventRecord) -> Result<SaveOutcome, RepositoryError>;

    /// Latest snapshot of an event, or `None` if the event is unknown.
    async fn load_latest(&self, id: &EventId) -> Result<Option<EventRecord>, RepositoryError>;

    /// Snapshot of a specific round.
    async fn load_round(
        &self,
        id: &EventId,
        round_number: u32,
    ) -> Result<Option<EventRecord>, RepositoryError>;

    /// All snapshots of an event in ascending round order.
    ///
    /// Returns an empty list for an unknown event.
    async fn history(&self, id: &EventId) -> Result<Vec<EventRecord>, RepositoryError>;
}

/// Decides what `save_round` should do given the latest stored snapshot.
///
/// Shared by the repository implementations.
pub fn check_save(
    record: &EventRecord,
    latest: Option<&EventRecord>,
    existing: Option<&EventRecord>,
) -> Result<Option<SaveOutcome>, RepositoryError> {
    let conflict = || RepositoryError::round_conflict(record.event_id().clone(), record.round_number());

    if let Some(existing) = existing {
        return if existing.source_digest() == record.source_digest() {
            Ok(Some(SaveOutcome::AlreadyPresent(Box::new(existing.clone()))))
        } else {
            Err(conflict())
        };
    }

    let next_round = latest.map_or(1, |latest| latest.round_number().saturating_add(1));
    if record.round_number() != next_round {
        return Err(conflict());
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn EventRepository) {}
    }

    #[test]
    fn round_conflict_message_names_round() {
        let id: EventId = "REQ-20250101-ABCDEF".parse().unwrap();
        let err = RepositoryError::round_conflict(id, 3);
        assert_eq!(
            err.to_string(),
            "Round 3 of REQ-20250101-ABCDEF conflicts with stored history"
        );
    }
}
