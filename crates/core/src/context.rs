//! Capability a host test runner exposes to the engine.
//!
//! The engine and every scenario callback only ever see `&mut dyn
//! TestContext`. A production host and an in-memory double both implement
//! it, so nothing in the engine depends on a concrete runner type.

use crate::error::Failure;

/// Scoped execution capability of a host test runner.
///
/// Scopes nest: [`TestContext::run`] opens a named child scope and hands
/// the body a context for that child. Failures are reported against the
/// context they are raised on.
pub trait TestContext {
    /// Name of the current scope.
    fn name(&self) -> &str;

    /// Marks the calling frame as a helper for failure attribution.
    fn helper(&mut self) {}

    /// Opens a named child scope, runs `f` inside it, and returns whether
    /// the child passed.
    fn run(&mut self, name: &str, f: &mut dyn FnMut(&mut dyn TestContext)) -> bool;

    /// Reports a hard failure.
    ///
    /// Implementations may unwind out of the current scope. Callers must not
    /// rely on code after this call running, and must return right after it
    /// when the host does not unwind.
    fn fatal(&mut self, failure: Failure);

    /// Reports a soft failure; execution continues.
    fn error(&mut self, failure: Failure);

    /// Whether anything failed in this scope or a child scope.
    fn failed(&self) -> bool;

    /// Soft failure with a free-form message.
    fn fail(&mut self, msg: &str) {
        self.error(Failure::message(msg));
    }

    /// Hard failure with a free-form message.
    fn fail_now(&mut self, msg: &str) {
        self.fatal(Failure::message(msg));
    }
}
