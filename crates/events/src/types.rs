//! Event types for the gwt scope event system

use chrono::{DateTime, Utc};
use gwt_core::Severity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published [`Event`] stamped with its own id and publish time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: Event,
}

impl EventEnvelope {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events a host publishes during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A named scope was opened
    #[serde(rename = "scope.started")]
    ScopeStarted { run_id: Uuid, path: String },

    /// A scope returned, either normally or by aborting
    #[serde(rename = "scope.finished")]
    ScopeFinished {
        run_id: Uuid,
        path: String,
        passed: bool,
        elapsed_ms: u64,
    },

    /// A failure was reported against a scope
    #[serde(rename = "scope.failure")]
    FailureRecorded {
        run_id: Uuid,
        path: String,
        severity: Severity,
        message: String,
    },
}

impl Event {
    /// Get the run ID this event belongs to
    pub fn run_id(&self) -> Uuid {
        match self {
            Event::ScopeStarted { run_id, .. }
            | Event::ScopeFinished { run_id, .. }
            | Event::FailureRecorded { run_id, .. } => *run_id,
        }
    }

    /// Get the full path of the scope this event concerns
    pub fn path(&self) -> &str {
        match self {
            Event::ScopeStarted { path, .. }
            | Event::ScopeFinished { path, .. }
            | Event::FailureRecorded { path, .. } => path,
        }
    }
}
