//! ProcessInitialHandler - Command handler for a new event request email.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::capability::{draft_email, extract_fields, IntakeConfig};
use super::round_result::{log_outcome, RoundResult};
use crate::domain::event::{open_round, EventError, RoundInput};
use crate::domain::foundation::{EventId, Language, Timestamp};
use crate::ports::{EmailDrafter, EventRepository, ExtractionRequest, FieldExtractor, SaveOutcome};

/// Command to open a new event from an initial email.
#[derive(Debug, Clone)]
pub struct ProcessInitialCommand {
    pub email_content: String,
    /// Language name as sent by the client, e.g. "English".
    pub language: String,
    /// Per-request time budget for the round's capability calls.
    pub timeout: Option<Duration>,
}

impl ProcessInitialCommand {
    pub fn new(email_content: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            email_content: email_content.into(),
            language: language.into(),
            timeout: None,
        }
    }
}

/// Handler for initial emails.
pub struct ProcessInitialHandler {
    extractor: Arc<dyn FieldExtractor>,
    drafter: Arc<dyn EmailDrafter>,
    repository: Arc<dyn EventRepository>,
    config: IntakeConfig,
}

impl ProcessInitialHandler {
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

    #[tracing::instrument(skip(self, cmd), fields(language = %cmd.language))]
    pub async fn handle(&self, cmd: ProcessInitialCommand) -> Result<RoundResult, EventError> {
        // 1. Validate input
        self.config.check_message("email_content", &cmd.email_content)?;
        let language: Language = cmd.language.parse()?;
        let deadline = self.config.deadline(cmd.timeout);
        let input = RoundInput::from_text(&cmd.email_content, Timestamp::now());

        // 2. Extract fields
        let partial = extract_fields(
            self.extractor.as_ref(),
            ExtractionRequest::initial(cmd.email_content, language),
            deadline,
            &self.config,
        )
        .await?;

        // 3. Build round 1
        let outcome = open_round(EventId::new(), language, &partial, input)?;
        log_outcome(&outcome);
        let transition = outcome.transition;
        let mut record = outcome.record;

        // 4. Draft the outbound email
        let email = draft_email(self.drafter.as_ref(), &record, deadline, &self.config).await?;
        record.attach_email(email);

        // 5. Persist
        match self.repository.save_round(&record).await {
            Ok(SaveOutcome::Inserted) => Ok(RoundResult::stored(record, transition)),
            Ok(SaveOutcome::AlreadyPresent(stored)) => Ok(RoundResult::replayed(*stored)),
            Err(err) => {
                warn!(event_id = %record.event_id(), error = %err, "failed to store round 1");
                Err(err.into())
            }
        }
    }
}
