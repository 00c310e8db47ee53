//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Field extraction via OpenAI-compatible chat models (Groq, OpenAI) and a mock
//! - `drafting` - Template-based outbound email drafting
//! - `storage` - Round snapshot repositories (in-memory, YAML files)
//! - `http` - REST API (axum)

pub mod ai;
pub mod drafting;
pub mod http;
pub mod storage;

pub use ai::{MockFieldExtractor, OpenAiExtractor};
pub use drafting::TemplateEmailDrafter;
pub use storage::{FileEventRepository, InMemoryEventRepository};
