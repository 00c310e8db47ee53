//! Event domain module.
//!
//! Progressive extraction of an event request across rounds of email
//! correspondence: the field schema, merge policy, completion evaluation,
//! lifecycle status and the pure round step that ties them together.

mod aggregate;
mod attachments;
mod completion;
mod email_mode;
mod errors;
mod fields;
mod merger;
mod round;
mod schema;
mod status;

pub use aggregate::{EventRecord, OutboundEmail};
pub use attachments::{extract_attachments, ATTACHMENT_EXTENSIONS};
pub use completion::{evaluate, Completion};
pub use email_mode::{select_mode, EmailMode, EmailModeKind};
pub use errors::{Capability, EventError};
pub use fields::{EventFields, ExtractedValue, PartialFieldMap};
pub use merger::{merge, FieldChange, FieldFailure, MergeOutcome};
pub use round::{
    apply_reply, check_round, message_digest, open_round, RoundInput, RoundOutcome,
    StatusTransition, FIRST_ROUND,
};
pub use schema::{
    all_keys, is_placeholder, validate, CurrencyAmount, FieldKey, FieldKind, FieldValue,
    MAX_BUDGET_MAJOR_UNITS, MAX_COUNT, MAX_TEXT_LENGTH,
};
pub use status::EventStatus;
