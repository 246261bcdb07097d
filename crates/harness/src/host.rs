//! Scoped test runner.
//!
//! Every scope body runs under `catch_unwind`. A hard failure records
//! itself and unwinds with a private payload that the enclosing scope
//! recognizes, so it aborts exactly that scope and its children. A child
//! failure marks its parent failed; siblings that already finished keep
//! their outcome.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Instant;

use chrono::Utc;
use gwt_core::{Failure, Severity, TestContext};
use gwt_events::{Event, EventBus};
use tracing::{debug, info, info_span, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::HarnessConfig;
use crate::report::{FailureRecord, Report, ScopeRecord};

/// Unwind payload of a hard failure.
struct ScopeAbort;

/// Install a `fmt` subscriber filtered by `RUST_LOG` that writes through
/// the test harness' captured output. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Run `f` as a scenario named `name` with the config found for the
/// current crate, panicking with a failure summary if anything failed.
///
/// Meant to be the body of a `#[test]`.
pub fn check(name: &str, f: impl FnOnce(&mut dyn TestContext)) -> Report {
    init_tracing();
    let report = Harness::new(HarnessConfig::load()).run(name, f);
    match report.into_result() {
        Ok(report) => report,
        Err(e) => panic!("{e}"),
    }
}

/// State shared by every scope of one run.
struct RunState {
    config: HarnessConfig,
    bus: Option<EventBus>,
    report: Report,
}

impl RunState {
    fn publish(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

/// Entry point of the production host.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
    bus: Option<EventBus>,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config, bus: None }
    }

    /// Publish scope events to `bus` during runs.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Run `f` in a root scope named `name` and report what happened.
    ///
    /// Failures never escape as panics; with `catch_panics` disabled a
    /// panic from scenario code does.
    pub fn run(&self, name: &str, f: impl FnOnce(&mut dyn TestContext)) -> Report {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, name = %name, "Starting run");

        let state = Rc::new(RefCell::new(RunState {
            config: self.config.clone(),
            bus: self.bus.clone(),
            report: Report::new(run_id, name),
        }));

        let mut root = ScopeContext::new(name.to_string(), name.to_string(), run_id, Rc::clone(&state));
        let mut f = Some(f);
        let passed = root.execute(&mut |t: &mut dyn TestContext| {
            if let Some(f) = f.take() {
                f(t);
            }
        });

        drop(root);
        let report = match Rc::try_unwrap(state) {
            Ok(state) => state.into_inner().report,
            Err(shared) => shared.borrow().report.clone(),
        };

        info!(
            run_id = %run_id,
            passed,
            scopes = report.scopes.len(),
            failures = report.failures.len(),
            "Run finished"
        );
        report
    }
}

/// A scope of a [`Harness`] run.
pub struct ScopeContext {
    path: String,
    name: String,
    run_id: Uuid,
    failed: bool,
    state: Rc<RefCell<RunState>>,
}

impl ScopeContext {
    fn new(path: String, name: String, run_id: Uuid, state: Rc<RefCell<RunState>>) -> Self {
        Self {
            path,
            name,
            run_id,
            failed: false,
            state,
        }
    }

    /// Run `f` as this scope's body and return whether the scope passed.
    fn execute(&mut self, f: &mut dyn FnMut(&mut dyn TestContext)) -> bool {
        let span = info_span!("scope", path = %self.path);
        let _enter = span.enter();

        let started = Instant::now();
        let (slot, catch_panics) = {
            let mut state = self.state.borrow_mut();
            state.report.scopes.push(ScopeRecord {
                path: self.path.clone(),
                started_at: Utc::now(),
                elapsed_ms: 0,
                passed: true,
            });
            state.publish(Event::ScopeStarted {
                run_id: self.run_id,
                path: self.path.clone(),
            });
            (state.report.scopes.len() - 1, state.config.catch_panics)
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&mut *self)));
        if let Err(payload) = outcome {
            if !payload.is::<ScopeAbort>() {
                if !catch_panics {
                    panic::resume_unwind(payload);
                }
                self.record(Severity::Hard, &Failure::Panicked(panic_message(payload.as_ref())));
            }
        }

        let passed = !self.failed;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.report.scopes.get_mut(slot) {
            record.passed = passed;
            record.elapsed_ms = elapsed_ms;
        }
        state.publish(Event::ScopeFinished {
            run_id: self.run_id,
            path: self.path.clone(),
            passed,
            elapsed_ms,
        });

        if passed {
            if state.config.log_passing_scopes {
                info!(path = %self.path, elapsed_ms, "Scope passed");
            } else {
                debug!(path = %self.path, elapsed_ms, "Scope passed");
            }
        } else {
            warn!(path = %self.path, elapsed_ms, "Scope failed");
        }
        passed
    }

    fn record(&mut self, severity: Severity, failure: &Failure) {
        self.failed = true;
        let message = failure.to_string();
        warn!(
            path = %self.path,
            severity = severity.as_str(),
            message = %message,
            "Failure recorded"
        );

        let mut state = self.state.borrow_mut();
        state.publish(Event::FailureRecorded {
            run_id: self.run_id,
            path: self.path.clone(),
            severity,
            message: message.clone(),
        });
        state.report.failures.push(FailureRecord {
            path: self.path.clone(),
            severity,
            message,
        });
    }
}

impl TestContext for ScopeContext {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, name: &str, f: &mut dyn FnMut(&mut dyn TestContext)) -> bool {
        let path = {
            let state = self.state.borrow();
            format!("{}{}{}", self.path, state.config.separator, name)
        };
        let mut child = ScopeContext::new(path, name.to_string(), self.run_id, Rc::clone(&self.state));
        let passed = child.execute(f);
        if !passed {
            self.failed = true;
        }
        passed
    }

    fn fatal(&mut self, failure: Failure) {
        self.record(Severity::Hard, &failure);
        panic::resume_unwind(Box::new(ScopeAbort));
    }

    fn error(&mut self, failure: Failure) {
        self.record(Severity::Soft, &failure);
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

impl std::fmt::Debug for ScopeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeContext")
            .field("path", &self.path)
            .field("run_id", &self.run_id)
            .field("failed", &self.failed)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
