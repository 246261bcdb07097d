use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a failure affects the scope it is reported in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Recorded against the scope; remaining checks and work continue.
    Soft,
    /// Aborts the scope and everything nested under it.
    Hard,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

/// Everything the engine (or a scenario callback) can report to a host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    #[error("When string of BDD test must not be empty")]
    MissingWhen,

    #[error("Then string of BDD test must not be empty")]
    MissingThen,

    #[error("Act function of BDD test is not defined")]
    MissingAct,

    #[error("Assert function of BDD test is not defined")]
    MissingAssert,

    #[error("when+then not run: BDD test not configured properly (prefix = \"{prefix}\")")]
    NotConfigured { prefix: String },

    #[error("test setup not run: Arrange returned a nil given function (prefix = \"{prefix}\")")]
    MissingSetup { prefix: String },

    #[error("test setup not run: Arrange function returned an empty Given string (prefix = \"{prefix}\")")]
    EmptyGiven { prefix: String },

    #[error("BDD configuration error: test case variant at index {index} has no Kind detail")]
    VariantWithoutKind { index: usize },

    #[error("{0}")]
    Message(String),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl Failure {
    /// Create a free-form failure raised by scenario code.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

/// Malformed builder input, detected before any scope runs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("gwt::given_when_then: given description must be non-empty when given function is non-nil")]
    EmptyGivenLabel,

    #[error("gwt::given_when_then: when description must be non-empty")]
    EmptyWhenLabel,

    #[error("gwt::given_when_then: then description must be non-empty")]
    EmptyThenLabel,
}
