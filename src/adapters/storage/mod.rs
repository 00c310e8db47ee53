//! Storage adapters for event round snapshots.

mod file_event_repository;
mod in_memory_event_repository;

pub use file_event_repository::FileEventRepository;
pub use in_memory_event_repository::InMemoryEventRepository;
