//! Event system for the gwt host
//!
//! This crate provides the event bus and event types a host publishes
//! while it opens, finishes, and fails scopes.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
