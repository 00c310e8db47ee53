//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `event` - Event request schema, merge, completion and round step

pub mod event;
pub mod foundation;
