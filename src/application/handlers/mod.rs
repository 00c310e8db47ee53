//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod intake;

pub use intake::{
    GetEventHandler, GetEventHistoryHandler, GetEventQuery, IntakeConfig, ProcessInitialCommand,
    ProcessInitialHandler, ProcessReplyCommand, ProcessReplyHandler, RoundResult,
};
