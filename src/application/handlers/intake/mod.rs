//! Event intake command and query handlers.

mod capability;
mod get_event;
mod process_initial;
mod process_reply;
mod round_result;

pub use capability::IntakeConfig;
pub use get_event::{GetEventHandler, GetEventHistoryHandler, GetEventQuery};
pub use process_initial::{ProcessInitialCommand, ProcessInitialHandler};
pub use process_reply::{ProcessReplyCommand, ProcessReplyHandler};
pub use round_result::RoundResult;
