//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers drive a round (extract, step, draft, persist); query
//! handlers read stored snapshots.

pub mod handlers;

pub use handlers::{
    GetEventHandler, GetEventHistoryHandler, GetEventQuery, IntakeConfig, ProcessInitialCommand,
    ProcessInitialHandler, ProcessReplyCommand, ProcessReplyHandler, RoundResult,
};
