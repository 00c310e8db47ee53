//! EventStatus enum for tracking where an event request stands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of an event request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// No record exists yet.
    #[default]
    Initial,
    /// Record exists with at least one field missing.
    AwaitingReply,
    /// All fields are set. Corrections are still accepted.
    Complete,
}

impl EventStatus {
    /// Status a record should hold given its completion verdict.
    pub fn for_completion(is_complete: bool) -> Self {
        if is_complete {
            EventStatus::Complete
        } else {
            EventStatus::AwaitingReply
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, EventStatus::Complete)
    }
}

impl StateMachine for EventStatus {
    /// Valid transitions:
    /// - Initial -> AwaitingReply | Complete
    /// - AwaitingReply -> AwaitingReply | Complete
    /// - Complete -> Complete | AwaitingReply (a correction invalidated a field)
    fn valid_transitions(&self) -> Vec<Self> {
        use EventStatus::*;
        match self {
            Initial => vec![AwaitingReply, Complete],
            AwaitingReply => vec![AwaitingReply, Complete],
            Complete => vec![Complete, AwaitingReply],
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventStatus::Initial => "Initial",
            EventStatus::AwaitingReply => "AwaitingReply",
            EventStatus::Complete => "Complete",
        };
        write!(f, "{}", s)
    }
}
