//! Phase-sequenced scenario engine.
//!
//! A [`Lifecycle`] describes one scenario. Its runnable (see
//! [`TestFactory`]) executes, inside whatever host implements
//! [`TestContext`], the fixed order:
//!
//! - Arrange, then the `after_arrange` hook
//! - Given scope: setup, then the `after_given` hook
//! - Describe
//! - validation gate
//! - When scope: Act, then the `after_act` hook
//! - Then scope: Assert, then the `after_assert` hook
//!
//! and replays it once per [`Variant`] the scenario's generator yields.

pub mod builders;
mod fanout;
pub mod hooks;
pub mod lifecycle;
mod sequencer;

pub use builders::{
    given_fn, given_when_then, try_given_when_then, try_when_then, when_then, GivenFn,
};
pub use gwt_core::{naming, ConfigError, Failure, Phase, Severity, TestContext, Variant};
pub use hooks::{AfterAct, AfterArrange, AfterAssert, AfterGiven, Hooks};
pub use lifecycle::{
    Arrange, Arrangement, Assert, Describe, DescribeResponse, Lifecycle, TestFactory, TestFn,
};
