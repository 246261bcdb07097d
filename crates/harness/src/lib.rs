//! Hosts that implement [`gwt_core::TestContext`].
//!
//! - [`Harness`] / [`ScopeContext`] - scoped runner with abort-on-fatal
//!   semantics, usable from a plain `#[test]` through [`check`]
//! - [`RecordingContext`] - in-memory double that records scope names and
//!   failures without aborting anything
//! - [`HarnessConfig`] - host settings read from `.gwt/config.json`

pub mod config;
pub mod error;
mod host;
mod recording;
mod report;

pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use host::{check, init_tracing, Harness, ScopeContext};
pub use recording::{Record, RecordingContext};
pub use report::{FailureRecord, Report, ScopeRecord};
