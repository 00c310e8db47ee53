//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the event intake domain.

mod errors;
mod ids;
mod language;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::EventId;
pub use language::{Language, UnsupportedLanguage};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
