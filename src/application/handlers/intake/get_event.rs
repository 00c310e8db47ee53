//! Query handlers for stored event snapshots.

use std::sync::Arc;

use crate::domain::event::{EventError, EventRecord};
use crate::domain::foundation::EventId;
use crate::ports::EventRepository;

/// Query for an event's snapshots.
#[derive(Debug, Clone)]
pub struct GetEventQuery {
    pub event_id: EventId,
}

/// Returns the latest snapshot of an event.
pub struct GetEventHandler {
    repository: Arc<dyn EventRepository>,
}

impl GetEventHandler {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetEventQuery) -> Result<EventRecord, EventError> {
        self.repository
            .load_latest(&query.event_id)
            .await?
            .ok_or_else(|| EventError::unknown_event(query.event_id))
    }
}

/// Returns every snapshot of an event, oldest first.
pub struct GetEventHistoryHandler {
    repository: Arc<dyn EventRepository>,
}

impl GetEventHistoryHandler {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetEventQuery) -> Result<Vec<EventRecord>, EventError> {
        let history = self.repository.history(&query.event_id).await?;
        if history.is_empty() {
            return Err(EventError::unknown_event(query.event_id));
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryEventRepository;
    use crate::domain::event::{apply_reply, open_round, FieldKey, PartialFieldMap, RoundInput};
    use crate::domain::foundation::{Language, Timestamp};

    async fn seeded() -> (Arc<InMemoryEventRepository>, EventId) {
        let repo = Arc::new(InMemoryEventRepository::new());
        let first = open_round(
            EventId::new(),
            Language::English,
            &PartialFieldMap::new().with(FieldKey::Location, "Chennai"),
            RoundInput::from_text("first", Timestamp::now()),
        )
        .unwrap()
        .record;
        let second = apply_reply(
            &first,
            1,
            &PartialFieldMap::new().with(FieldKey::Budget, "$5,000"),
            RoundInput::from_text("second", Timestamp::now()),
        )
        .unwrap()
        .record;
        repo.save_round(&first).await.unwrap();
        repo.save_round(&second).await.unwrap();
        (repo, first.event_id().clone())
    }

    #[tokio::test]
    async fn returns_latest_snapshot() {
        let (repo, id) = seeded().await;
        let record = GetEventHandler::new(repo)
            .handle(GetEventQuery { event_id: id })
            .await
            .unwrap();
        assert_eq!(record.round_number(), 2);
        assert!(record.fields().is_set(FieldKey::Budget));
    }

    #[tokio::test]
    async fn returns_history_in_round_order() {
        let (repo, id) = seeded().await;
        let history = GetEventHistoryHandler::new(repo)
            .handle(GetEventQuery { event_id: id })
            .await
            .unwrap();
        let rounds: Vec<u32> = history.iter().map(EventRecord::round_number).collect();
        assert_eq!(rounds, vec![1, 2]);
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let id = EventId::new();

        let err = GetEventHandler::new(repo.clone())
            .handle(GetEventQuery { event_id: id.clone() })
            .await
            .unwrap_err();
        assert_eq!(err, EventError::unknown_event(id.clone()));

        let err = GetEventHistoryHandler::new(repo)
            .handle(GetEventQuery { event_id: id })
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::UnknownEvent(_)));
    }
}
