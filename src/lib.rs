//! Event Intake - progressive extraction and completion tracking
//!
//! Turns free-form event request emails into a structured 11-field record,
//! tracks which fields are still missing across reply rounds, and drafts the
//! follow-up or thank-you email for each round.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
