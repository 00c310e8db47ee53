//! End-to-end round scenarios through the application handlers.
//!
//! Walks one event request thread from the initial email to completion and
//! beyond, checking round numbering, missing-field tracking, status
//! transitions and stale-round rejection.

use std::sync::Arc;
use std::time::Duration;

use event_intake::adapters::ai::MockFieldExtractor;
use event_intake::adapters::drafting::TemplateEmailDrafter;
use event_intake::adapters::storage::{FileEventRepository, InMemoryEventRepository};
use event_intake::application::{
    IntakeConfig, ProcessInitialCommand, ProcessInitialHandler, ProcessReplyCommand,
    ProcessReplyHandler,
};
use event_intake::domain::event::{
    EmailMode, EmailModeKind, EventError, EventRecord, EventStatus, FieldKey, FieldValue,
    PartialFieldMap,
};
use event_intake::ports::EventRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    extractor: MockFieldExtractor,
    repository: Arc<dyn EventRepository>,
    initial: ProcessInitialHandler,
    reply: ProcessReplyHandler,
}

impl Harness {
    fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self::with_extractor(MockFieldExtractor::new(), repository)
    }

    fn with_extractor(extractor: MockFieldExtractor, repository: Arc<dyn EventRepository>) -> Self {
        let drafter = Arc::new(TemplateEmailDrafter::default());
        let config = IntakeConfig {
            retry_backoff: Duration::ZERO,
            ..IntakeConfig::default()
        };
        Self {
            initial: ProcessInitialHandler::with_config(
                Arc::new(extractor.clone()),
                drafter.clone(),
                repository.clone(),
                config.clone(),
            ),
            reply: ProcessReplyHandler::with_config(
                Arc::new(extractor.clone()),
                drafter,
                repository.clone(),
                config,
            ),
            extractor,
            repository,
        }
    }

    async fn open(&self, fields: PartialFieldMap, text: &str) -> EventRecord {
        self.extractor.push_response(fields);
        self.initial
            .handle(ProcessInitialCommand::new(text, "English"))
            .await
            .unwrap()
            .record
    }

    async fn reply(
        &self,
        record: &EventRecord,
        round: u32,
        fields: PartialFieldMap,
        text: &str,
    ) -> Result<EventRecord, EventError> {
        self.extractor.push_response(fields);
        self.reply
            .handle(ProcessReplyCommand::new(record.event_id().clone(), text, round))
            .await
            .map(|result| result.record)
    }
}

fn scenario_a_fields() -> PartialFieldMap {
    PartialFieldMap::new()
        .with(FieldKey::FullName, "Priya Sharma")
        .with(FieldKey::Phone, "+91 98765 43210")
        .with(FieldKey::Location, "Chennai")
        .with(FieldKey::EventName, "Annual Partner Summit")
        .with(FieldKey::EventType, "Conference")
        .with(FieldKey::NumberOfAttendees, 200)
        .with(FieldKey::EventStartDate, "2025-07-25")
        .with(FieldKey::EventEndDate, "2025-07-27")
}

const SCENARIO_A_TEXT: &str = "Hello, I'm Priya Sharma from Acme Corp. We are organising our \
    Annual Partner Summit, a conference in Chennai from July 25-27, 2025 for about 200 \
    delegates. You can call me on +91 98765 43210.";

async fn completed(h: &Harness) -> EventRecord {
    let first = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;
    let second = h
        .reply(
            &first,
            1,
            PartialFieldMap::new()
                .with(FieldKey::Budget, "50000 USD")
                .with(FieldKey::NumberOfSleepingRooms, 80),
            "Budget is 50000 USD and we need 80 rooms.",
        )
        .await
        .unwrap();
    h.reply(
        &second,
        2,
        PartialFieldMap::new().with(FieldKey::Email, "Priya.Sharma@Acme.com"),
        "My email is Priya.Sharma@Acme.com",
    )
    .await
    .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn scenario_a_initial_email_extracts_known_fields() {
    let h = Harness::new(Arc::new(InMemoryEventRepository::new()));
    let record = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;

    assert_eq!(record.round_number(), 1);
    assert_eq!(
        record.fields().get(FieldKey::Location),
        Some(&FieldValue::Text("Chennai".to_string()))
    );
    assert_eq!(
        record.fields().get(FieldKey::NumberOfAttendees),
        Some(&FieldValue::Count(200))
    );
    assert_eq!(
        record.missing_fields(),
        vec![
            FieldKey::Email,
            FieldKey::NumberOfSleepingRooms,
            FieldKey::Budget
        ]
    );
    assert!(!record.is_complete());
    assert_eq!(record.status(), EventStatus::AwaitingReply);
    assert_eq!(
        record.outbound_email().unwrap().mode,
        EmailModeKind::RequestMoreInfo
    );
}

#[tokio::test]
async fn scenario_b_reply_fills_two_fields() {
    let h = Harness::new(Arc::new(InMemoryEventRepository::new()));
    let first = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;

    let second = h
        .reply(
            &first,
            1,
            PartialFieldMap::new()
                .with(FieldKey::Budget, "$50,000")
                .with(FieldKey::NumberOfSleepingRooms, 80),
            "Budget is $50,000 and we need 80 rooms.",
        )
        .await
        .unwrap();

    assert_eq!(second.round_number(), 2);
    assert_eq!(second.missing_fields(), vec![FieldKey::Email]);
    assert_eq!(
        first.missing_fields().len() - second.missing_fields().len(),
        2
    );
    for (key, value) in first.fields().iter() {
        assert_eq!(second.fields().get(key), Some(value));
    }
}

#[tokio::test]
async fn scenario_c_last_field_completes_with_thank_you() {
    let h = Harness::new(Arc::new(InMemoryEventRepository::new()));
    let record = completed(&h).await;

    assert_eq!(record.round_number(), 3);
    assert!(record.missing_fields().is_empty());
    assert!(record.is_complete());
    assert_eq!(record.status(), EventStatus::Complete);
    assert_eq!(
        record.fields().get(FieldKey::Email),
        Some(&FieldValue::Email("priya.sharma@acme.com".to_string()))
    );

    match record.email_mode() {
        EmailMode::ThankYou { fields } => assert_eq!(fields.set_count(), 11),
        other => panic!("expected thank-you, got {:?}", other),
    }
    let email = record.outbound_email().unwrap();
    assert_eq!(email.mode, EmailModeKind::ThankYou);
    assert!(email.body.contains("Chennai"));
}

#[tokio::test]
async fn scenario_d_compatible_date_correction_stays_complete() {
    let h = Harness::new(Arc::new(InMemoryEventRepository::new()));
    let record = completed(&h).await;

    let corrected = h
        .reply(
            &record,
            3,
            PartialFieldMap::new().with(FieldKey::EventStartDate, "2025-07-26"),
            "Small change: we start on the 26th.",
        )
        .await
        .unwrap();

    assert_eq!(corrected.round_number(), 4);
    assert_eq!(corrected.status(), EventStatus::Complete);
    assert_eq!(
        corrected.fields().get(FieldKey::EventStartDate).unwrap().to_string(),
        "2025-07-26"
    );
}

#[tokio::test]
async fn scenario_d_conflicting_date_correction_reopens() {
    let h = Harness::new(Arc::new(InMemoryEventRepository::new()));
    let record = completed(&h).await;

    let reopened = h
        .reply(
            &record,
            3,
            PartialFieldMap::new().with(FieldKey::EventStartDate, "2025-08-02"),
            "We had to move to August 2nd.",
        )
        .await
        .unwrap();

    assert_eq!(reopened.status(), EventStatus::AwaitingReply);
    assert_eq!(reopened.missing_fields(), vec![FieldKey::EventEndDate]);
    assert_eq!(
        reopened.outbound_email().unwrap().mode,
        EmailModeKind::RequestMoreInfo
    );
}

#[tokio::test]
async fn scenario_e_stale_round_is_rejected() {
    let h = Harness::new(Arc::new(InMemoryEventRepository::new()));
    let first = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;
    let second = h
        .reply(
            &first,
            1,
            PartialFieldMap::new().with(FieldKey::Budget, "$50,000"),
            "Budget $50k",
        )
        .await
        .unwrap();

    let err = h
        .reply(
            &first,
            1,
            PartialFieldMap::new().with(FieldKey::Budget, "$99,000"),
            "Budget $99k",
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EventError::RoundMismatch {
            expected: 1,
            current: 2,
            ..
        }
    ));
    let latest = h
        .repository
        .load_latest(first.event_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest, second);
}

#[tokio::test]
async fn empty_reply_still_advances_one_round() {
    let h = Harness::new(Arc::new(InMemoryEventRepository::new()));
    let first = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;

    let second = h
        .reply(&first, 1, PartialFieldMap::new(), "Thanks, will get back to you.")
        .await
        .unwrap();

    assert_eq!(second.round_number(), 2);
    assert_eq!(second.fields(), first.fields());
}

#[tokio::test]
async fn identical_in_flight_replies_store_one_round() {
    let extractor = MockFieldExtractor::new().with_delay(Duration::from_millis(50));
    let h = Harness::with_extractor(extractor, Arc::new(InMemoryEventRepository::new()));
    let first = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;

    let budget = PartialFieldMap::new().with(FieldKey::Budget, "$50,000");
    h.extractor.push_response(budget.clone());
    h.extractor.push_response(budget);

    let cmd = ProcessReplyCommand::new(first.event_id().clone(), "Budget is $50k", 1);
    let (a, b) = tokio::join!(h.reply.handle(cmd.clone()), h.reply.handle(cmd));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.record, b.record);
    assert_eq!(a.record.round_number(), 2);
    assert!(a.replayed != b.replayed);
    let history = h.repository.history(first.event_id()).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn different_in_flight_replies_lose_with_round_mismatch() {
    let extractor = MockFieldExtractor::new().with_delay(Duration::from_millis(50));
    let h = Harness::with_extractor(extractor, Arc::new(InMemoryEventRepository::new()));
    let first = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;

    let id = first.event_id().clone();
    let (a, b) = tokio::join!(
        h.reply
            .handle(ProcessReplyCommand::new(id.clone(), "Budget is $50k", 1)),
        h.reply
            .handle(ProcessReplyCommand::new(id.clone(), "We need 80 rooms", 1)),
    );

    let (winner, loser) = match (a, b) {
        (Ok(w), Err(l)) | (Err(l), Ok(w)) => (w, l),
        other => panic!("expected one winner, got {:?}", other),
    };
    assert_eq!(winner.record.round_number(), 2);
    assert!(matches!(
        loser,
        EventError::RoundMismatch {
            expected: 1,
            current: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn file_storage_survives_a_new_repository_instance() {
    let dir = tempfile::tempdir().unwrap();
    let h = Harness::new(Arc::new(FileEventRepository::new(dir.path())));
    let first = h.open(scenario_a_fields(), SCENARIO_A_TEXT).await;
    h.reply(
        &first,
        1,
        PartialFieldMap::new().with(FieldKey::Budget, "€25,000"),
        "Budget €25k",
    )
    .await
    .unwrap();

    let reopened = FileEventRepository::new(dir.path());
    let history = reopened.history(first.event_id()).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], first);
    assert!(history[1].fields().is_set(FieldKey::Budget));
}
