//! ProcessReplyHandler - Command handler for a reply in an existing thread.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::capability::{draft_email, extract_fields, IntakeConfig};
use super::round_result::{log_outcome, RoundResult};
use crate::domain::event::{apply_reply, check_round, EventError, RoundInput};
use crate::domain::foundation::{EventId, Timestamp};
use crate::ports::{
    EmailDrafter, EventRepository, ExtractionRequest, FieldExtractor, RepositoryError, SaveOutcome,
};

/// Command to fold a reply into an event.
#[derive(Debug, Clone)]
pub struct ProcessReplyCommand {
    pub event_id: EventId,
    pub reply_content: String,
    /// Round the client believes is current.
    pub round_number: u32,
    /// Per-request time budget for the round's capability calls.
    pub timeout: Option<Duration>,
}

impl ProcessReplyCommand {
    pub fn new(event_id: EventId, reply_content: impl Into<String>, round_number: u32) -> Self {
        Self {
            event_id,
            reply_content: reply_content.into(),
            round_number,
            timeout: None,
        }
    }
}

/// Handler for replies.
pub struct ProcessReplyHandler {
    extractor: Arc<dyn FieldExtractor>,
    drafter: Arc<dyn EmailDrafter>,
    repository: Arc<dyn EventRepository>,
    config: IntakeConfig,
}

impl ProcessReplyHandler {
    pub fn new(
        extractor: Arc<dyn FieldExtractor>,
        drafter: Arc<dyn EmailDrafter>,
        repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self::with_config(extractor, drafter, repository, IntakeConfig::default())
    }

    pub fn with_config(
        extractor: Arc<dyn FieldExtractor>,
        drafter: Arc<dyn EmailDrafter>,
        repository: Arc<dyn EventRepository>,
        config: IntakeConfig,
    ) -> Self {
        Self {
            extractor,
            drafter,
            repository,
            config,
        }
    }

    #[tracing::instrument(
        skip(self, cmd),
        fields(event_id = %cmd.event_id, round = cmd.round_number)
    )]
    pub async fn handle(&self, cmd: ProcessReplyCommand) -> Result<RoundResult, EventError> {
        // 1. Validate input
        self.config.check_message("reply_content", &cmd.reply_content)?;
        let deadline = self.config.deadline(cmd.timeout);
        let input = RoundInput::from_text(&cmd.reply_content, Timestamp::now());

        // 2. Load the current snapshot and reject stale rounds
        let prior = self
            .repository
            .load_latest(&cmd.event_id)
            .await?
            .ok_or_else(|| EventError::unknown_event(cmd.event_id.clone()))?;
        check_round(&prior, cmd.round_number)?;

        // 3. Extract fields, hinting at what is still missing
        let request = ExtractionRequest::reply(
            cmd.reply_content,
            prior.language(),
            prior.missing_fields(),
        );
        let partial =
            extract_fields(self.extractor.as_ref(), request, deadline, &self.config).await?;

        // 4. Build the next round
        let outcome = apply_reply(&prior, cmd.round_number, &partial, input)?;
        log_outcome(&outcome);
        let transition = outcome.transition;
        let mut record = outcome.record;

        // 5. Draft the outbound email
        let email = draft_email(self.drafter.as_ref(), &record, deadline, &self.config).await?;
        record.attach_email(email);

        // 6. Persist
        match self.repository.save_round(&record).await {
            Ok(SaveOutcome::Inserted) => Ok(RoundResult::stored(record, transition)),
            Ok(SaveOutcome::AlreadyPresent(stored)) => Ok(RoundResult::replayed(*stored)),
            Err(RepositoryError::RoundConflict { .. }) => {
                // Another submission won the round while this one was in flight.
                let current = self
                    .repository
                    .load_latest(&cmd.event_id)
                    .await?
                    .map_or(record.round_number(), |latest| latest.round_number());
                warn!(current, "reply lost the race for its round");
                Err(EventError::round_mismatch(
                    cmd.event_id,
                    cmd.round_number,
                    current,
                ))
            }
            Err(err) => {
                warn!(error = %err, "failed to store round");
                Err(err.into())
            }
        }
    }
}
