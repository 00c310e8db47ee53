//! In-memory event repository.
//!
//! Keeps every round snapshot in a map guarded by a tokio `RwLock`.
//! Used in tests and when `engine.storage = "memory"`.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::event::EventRecord;
use crate::domain::foundation::EventId;
use crate::ports::{check_save, EventRepository, RepositoryError, SaveOutcome};

/// In-memory storage of round snapshots, keyed by event.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    rounds: RwLock<HashMap<EventId, Vec<EventRecord>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events stored.
    pub async fn event_count(&self) -> usize {
        self.rounds.read().await.len()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn save_round(&self, record: &EventRecord) -> Result<SaveOutcome, RepositoryError> {
        let mut rounds = self.rounds.write().await;
        let history = rounds.get(record.event_id());

        let existing = history.and_then(|h| h.iter().find(|r| r.round_number() == record.round_number()));
        if let Some(outcome) = check_save(record, history.and_then(|h| h.last()), existing)? {
            return Ok(outcome);
        }

        rounds
            .entry(record.event_id().clone())
            .or_default()
            .push(record.clone());
        Ok(SaveOutcome::Inserted)
    }

    async fn load_latest(&self, id: &EventId) -> Result<Option<EventRecord>, RepositoryError> {
        let rounds = self.rounds.read().await;
        Ok(rounds.get(id).and_then(|history| history.last()).cloned())
    }

    async fn load_round(
        &self,
        id: &EventId,
        round_number: u32,
    ) -> Result<Option<EventRecord>, RepositoryError> {
        let rounds = self.rounds.read().await;
        Ok(rounds
            .get(id)
            .and_then(|history| history.iter().find(|r| r.round_number() == round_number))
            .cloned())
    }

    async fn history(&self, id: &EventId) -> Result<Vec<EventRecord>, RepositoryError> {
        let rounds = self.rounds.read().await;
        Ok(rounds.get(id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{apply_reply, open_round, FieldKey, PartialFieldMap, RoundInput};
    use crate::domain::foundation::{Language, Timestamp};

    fn first_round(text: &str) -> EventRecord {
        let partial = PartialFieldMap::new().with(FieldKey::Location, "Chennai");
        open_round(
            EventId::new(),
            Language::English,
            &partial,
            RoundInput::from_text(text, Timestamp::now()),
        )
        .unwrap()
        .record
    }

    fn reply(prior: &EventRecord, text: &str) -> EventRecord {
        apply_reply(
            prior,
            prior.round_number(),
            &PartialFieldMap::new(),
            RoundInput::from_text(text, Timestamp::now()),
        )
        .unwrap()
        .record
    }

    #[tokio::test]
    async fn saves_and_loads_latest() {
        let repo = InMemoryEventRepository::new();
        let first = first_round("hello");
        let second = reply(&first, "more");

        assert_eq!(repo.save_round(&first).await.unwrap(), SaveOutcome::Inserted);
        assert_eq!(repo.save_round(&second).await.unwrap(), SaveOutcome::Inserted);

        let latest = repo.load_latest(first.event_id()).await.unwrap().unwrap();
        assert_eq!(latest.round_number(), 2);
        assert_eq!(repo.history(first.event_id()).await.unwrap().len(), 2);
        assert_eq!(repo.event_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_event_loads_nothing() {
        let repo = InMemoryEventRepository::new();
        let id = EventId::new();
        assert!(repo.load_latest(&id).await.unwrap().is_none());
        assert!(repo.history(&id).await.unwrap().is_empty());
        assert!(repo.load_round(&id, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn identical_resubmission_returns_stored_snapshot() {
        let repo = InMemoryEventRepository::new();
        let first = first_round("hello");
        repo.save_round(&first).await.unwrap();
        let second = reply(&first, "same reply");
        repo.save_round(&second).await.unwrap();

        let again = reply(&first, "same reply");
        let outcome = repo.save_round(&again).await.unwrap();
        assert_eq!(outcome, SaveOutcome::AlreadyPresent(Box::new(second)));
        assert_eq!(repo.history(first.event_id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn different_submission_for_same_round_conflicts() {
        let repo = InMemoryEventRepository::new();
        let first = first_round("hello");
        repo.save_round(&first).await.unwrap();
        repo.save_round(&reply(&first, "reply a")).await.unwrap();

        let err = repo.save_round(&reply(&first, "reply b")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::RoundConflict { round_number: 2, .. }));
    }

    #[tokio::test]
    async fn gaps_in_round_sequence_are_rejected() {
        let repo = InMemoryEventRepository::new();
        let first = first_round("hello");
        let second = reply(&first, "two");

        let err = repo.save_round(&second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::RoundConflict { .. }));
    }
}
