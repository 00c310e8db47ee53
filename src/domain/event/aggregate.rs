//! EventRecord aggregate - one snapshot of an event request thread.
//!
//! A record is produced by exactly one round and never mutated in place by a
//! later one; the round step builds the next snapshot from the prior one.
//! Missing fields and the complete verdict are derived from `fields` on
//! demand and cannot be set directly.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, Language, Timestamp};

use super::completion::{evaluate, Completion};
use super::email_mode::{select_mode, EmailMode, EmailModeKind};
use super::fields::EventFields;
use super::merger::{FieldChange, FieldFailure};
use super::schema::FieldKey;
use super::status::EventStatus;

/// Outbound email drafted for a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub mode: EmailModeKind,
    pub subject: String,
    pub body: String,
}

/// Snapshot of an event request after a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    event_id: EventId,
    round_number: u32,
    language: Language,
    fields: EventFields,
    status: EventStatus,
    /// SHA-256 of the inbound text that produced this round.
    source_digest: String,
    #[serde(default)]
    attachments: Vec<String>,
    #[serde(default)]
    failures: Vec<FieldFailure>,
    #[serde(default)]
    changes: Vec<FieldChange>,
    #[serde(default)]
    outbound_email: Option<OutboundEmail>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Everything a round contributes to a new snapshot.
pub(crate) struct Snapshot {
    pub round_number: u32,
    pub fields: EventFields,
    pub status: EventStatus,
    pub source_digest: String,
    pub attachments: Vec<String>,
    pub failures: Vec<FieldFailure>,
    pub changes: Vec<FieldChange>,
    pub at: Timestamp,
}

impl EventRecord {
    /// Creates the round-1 snapshot.
    pub(crate) fn first(event_id: EventId, language: Language, snapshot: Snapshot) -> Self {
        Self {
            event_id,
            round_number: snapshot.round_number,
            language,
            fields: snapshot.fields,
            status: snapshot.status,
            source_digest: snapshot.source_digest,
            attachments: snapshot.attachments,
            failures: snapshot.failures,
            changes: snapshot.changes,
            outbound_email: None,
            created_at: snapshot.at,
            updated_at: snapshot.at,
        }
    }

    /// Creates the snapshot that follows `self`.
    pub(crate) fn next(&self, snapshot: Snapshot) -> Self {
        Self {
            event_id: self.event_id.clone(),
            round_number: snapshot.round_number,
            language: self.language,
            fields: snapshot.fields,
            status: snapshot.status,
            source_digest: snapshot.source_digest,
            attachments: snapshot.attachments,
            failures: snapshot.failures,
            changes: snapshot.changes,
            outbound_email: None,
            created_at: self.created_at,
            updated_at: snapshot.at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn fields(&self) -> &EventFields {
        &self.fields
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn source_digest(&self) -> &str {
        &self.source_digest
    }

    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Field-local validation failures recorded by this round.
    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Field changes applied by this round.
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    pub fn outbound_email(&self) -> Option<&OutboundEmail> {
        self.outbound_email.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ───────────────────────────────────────────────────────────────
    // Derived
    // ───────────────────────────────────────────────────────────────

    pub fn completion(&self) -> Completion {
        evaluate(&self.fields)
    }

    /// Unset keys in schema order.
    pub fn missing_fields(&self) -> Vec<FieldKey> {
        self.completion().into_missing_fields()
    }

    pub fn is_complete(&self) -> bool {
        self.completion().is_complete()
    }

    /// Drafting input for this snapshot.
    pub fn email_mode(&self) -> EmailMode {
        select_mode(&self.completion(), &self.fields)
    }

    /// First word of the client's name, if known.
    pub fn first_name(&self) -> Option<&str> {
        match self.fields.get(FieldKey::FullName) {
            Some(super::schema::FieldValue::Text(name)) => name.split_whitespace().next(),
            _ => None,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Mutations
    // ───────────────────────────────────────────────────────────────

    /// Attaches the drafted email. Replaces any previous draft.
    pub fn attach_email(&mut self, email: OutboundEmail) {
        self.outbound_email = Some(email);
    }
}
