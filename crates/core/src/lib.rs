//! Shared building blocks for the gwt scenario engine.
//!
//! - [`TestContext`] - capability a host test runner offers the engine
//! - [`Failure`] / [`Severity`] - everything the engine can report
//! - [`ConfigError`] - malformed builder input
//! - [`Variant`] - alternate test case derived from a basis scenario
//! - [`naming`] - scope prefix and scope name composition

pub mod context;
pub mod domain;
pub mod error;

pub use context::TestContext;
pub use domain::naming;
pub use domain::{Phase, Variant};
pub use error::{ConfigError, Failure, Severity};
