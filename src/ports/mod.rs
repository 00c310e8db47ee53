//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `FieldExtractor` - text in, partial field map out
//! - `EmailDrafter` - round state in, outbound email out
//! - `EventRepository` - per-round snapshot persistence

mod email_drafter;
mod event_repository;
mod field_extractor;

pub use email_drafter::{DraftError, DraftRequest, EmailDrafter};
pub use event_repository::{check_save, EventRepository, RepositoryError, SaveOutcome};
pub use field_extractor::{ExtractionError, ExtractionRequest, FieldExtractor};
