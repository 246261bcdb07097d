use chrono::{DateTime, Utc};
use gwt_core::Severity;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{HarnessError, Result};

/// One scope opened during a run, in the order scopes were opened.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeRecord {
    pub path: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub passed: bool,
}

/// One failure reported during a run.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// Path of the scope the failure was reported against.
    pub path: String,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of a [`Harness::run`](crate::Harness::run).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: Uuid,
    pub name: String,
    pub scopes: Vec<ScopeRecord>,
    pub failures: Vec<FailureRecord>,
}

impl Report {
    pub(crate) fn new(run_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            run_id,
            name: name.into(),
            scopes: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Paths of every scope, in the order they were opened.
    pub fn scope_paths(&self) -> Vec<&str> {
        self.scopes.iter().map(|s| s.path.as_str()).collect()
    }

    /// Look up a scope by its full path.
    pub fn scope(&self, path: &str) -> Option<&ScopeRecord> {
        self.scopes.iter().find(|s| s.path == path)
    }

    /// One line per failure: `[severity] path: message`.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}: {}", f.severity.as_str(), f.path, f.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            Ok(self)
        } else {
            Err(HarnessError::ScenarioFailed {
                count: self.failures.len(),
                summary: self.summary(),
                name: self.name,
            })
        }
    }
}
