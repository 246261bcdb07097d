//! In-memory host double.
//!
//! Runs scope bodies against itself, so every scope name, soft failure, and
//! hard failure lands in one chronological log. Nothing aborts: after a
//! `fatal` the caller keeps control, which is exactly what the engine's own
//! code has to cope with.

use gwt_core::{Failure, TestContext};

/// Something observed by a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Scope(String),
    Error(Failure),
    Fatal(Failure),
}

impl Record {
    fn is_failure(&self) -> bool {
        matches!(self, Record::Error(_) | Record::Fatal(_))
    }
}

/// Test double for [`TestContext`] that records instead of executing
/// scopes in isolation.
#[derive(Default)]
pub struct RecordingContext {
    name: String,
    records: Vec<Record>,
    observer: Option<Box<dyn FnMut(&str)>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Call `f` with every scope name as the scope opens.
    pub fn with_observer(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.observer = Some(Box::new(f));
        self
    }

    /// Everything observed, in order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Names passed to `run`, in order.
    pub fn scopes(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Scope(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Soft failures, in order.
    pub fn errors(&self) -> Vec<&Failure> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Error(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    /// Hard failures, in order.
    pub fn fatals(&self) -> Vec<&Failure> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Fatal(f) => Some(f),
                _ => None,
            })
            .collect()
    }
}

impl TestContext for RecordingContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, name: &str, f: &mut dyn FnMut(&mut dyn TestContext)) -> bool {
        self.records.push(Record::Scope(name.to_string()));
        if let Some(observer) = self.observer.as_mut() {
            observer(name);
        }

        let before = self.records.len();
        f(self);
        !self.records[before..].iter().any(Record::is_failure)
    }

    fn fatal(&mut self, failure: Failure) {
        self.records.push(Record::Fatal(failure));
    }

    fn error(&mut self, failure: Failure) {
        self.records.push(Record::Error(failure));
    }

    fn failed(&self) -> bool {
        self.records.iter().any(Record::is_failure)
    }
}

impl std::fmt::Debug for RecordingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingContext")
            .field("name", &self.name)
            .field("records", &self.records)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
