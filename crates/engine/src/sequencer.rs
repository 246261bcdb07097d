//! One replay of the phase pipeline for a single test case.

use gwt_core::{naming, Failure, Phase, TestContext};
use tracing::{debug, trace, warn};

use crate::hooks::{AfterAct, AfterArrange, AfterAssert, AfterGiven, Hooks};
use crate::lifecycle::{
    ActFn, Arrange, ArrangeFn, Assert, AssertFn, Describe, DescribeFn, Lifecycle, SetupFn,
};

/// How a replay ended, as seen from the context it was started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Any hard failure stayed inside a scope the replay opened.
    Completed,
    /// A hard failure was raised on the caller's context itself.
    Aborted,
}

/// Working copy of a scenario for exactly one test case value.
///
/// Arrange, hooks, and Describe may rewrite labels and function slots;
/// those changes only live as long as this replay.
pub(crate) struct Replay<T, R> {
    given: String,
    when: String,
    then: String,
    hooks: Hooks<T, R>,
    arrange: Option<ArrangeFn<T, R>>,
    describe: Option<DescribeFn<T>>,
    act: Option<ActFn<T, R>>,
    assert: Option<AssertFn<T, R>>,
    tc: T,
    prefix: String,
    has_given_phase: bool,
}

impl<T, R> Replay<T, R> {
    pub(crate) fn new(scenario: &Lifecycle<T, R>, tc: T, index: Option<usize>, kind: &str) -> Self {
        let has_given_phase = scenario.arrange.is_some() || !scenario.given.is_empty();
        Self {
            given: scenario.given.clone(),
            when: scenario.when.clone(),
            then: scenario.then.clone(),
            hooks: scenario.hooks.clone(),
            arrange: scenario.arrange.clone(),
            describe: scenario.describe.clone(),
            act: scenario.act.clone(),
            assert: scenario.assert.clone(),
            tc,
            prefix: naming::compose_prefix(index, kind),
            has_given_phase,
        }
    }

    /// Run every phase in order, stopping at the first hard failure.
    pub(crate) fn run(mut self, t: &mut dyn TestContext) -> Outcome {
        t.helper();
        debug!(
            prefix = %self.prefix,
            has_given_phase = self.has_given_phase,
            "Starting replay"
        );

        if !self.has_given_phase {
            self.hooks.after_arrange(
                t,
                AfterArrange {
                    tc: &mut self.tc,
                    arrange_ran: false,
                    missing_setup: true,
                    empty_given: true,
                },
            );
            self.hooks.after_given(
                t,
                AfterGiven {
                    tc: &mut self.tc,
                    given: &mut self.given,
                    when: &mut self.when,
                    then: &mut self.then,
                    given_ran: false,
                },
            );
            return self.describe_act_assert(t);
        }

        let Some(setup) = self.arrange(t) else {
            return Outcome::Aborted;
        };

        let scope = naming::given_scope(&self.prefix, &self.given);
        let mut setup = setup;
        t.run(&scope, &mut |t: &mut dyn TestContext| {
            t.helper();
            self.given_phase(t, setup.take());
            self.describe_act_assert(t);
        });
        Outcome::Completed
    }

    /// Arrange and its hook. Returns the setup slot for the given scope, or
    /// `None` when the replay was aborted.
    fn arrange(&mut self, t: &mut dyn TestContext) -> Option<Option<SetupFn<T>>> {
        let mut setup = None;
        let mut arrange_ran = false;

        if let Some(arrange) = self.arrange.clone() {
            trace!(prefix = %self.prefix, phase = %Phase::Arrange, "Running phase");
            arrange_ran = true;
            let arrangement = arrange(
                t,
                Arrange {
                    tc: &mut self.tc,
                    hooks: &mut self.hooks,
                    describe: &mut self.describe,
                    act: &mut self.act,
                    assert: &mut self.assert,
                    given: self.given.clone(),
                    when: &mut self.when,
                    then: &mut self.then,
                },
            );
            self.given = arrangement.given;

            if arrangement.setup.is_none() {
                warn!(prefix = %self.prefix, "Arrange returned no setup");
                t.fatal(Failure::MissingSetup {
                    prefix: self.prefix.clone(),
                });
                return None;
            }
            setup = arrangement.setup;
        }

        self.hooks.after_arrange(
            t,
            AfterArrange {
                tc: &mut self.tc,
                arrange_ran,
                missing_setup: setup.is_none(),
                empty_given: self.given.is_empty(),
            },
        );

        if self.given.is_empty() {
            warn!(prefix = %self.prefix, "Arrange returned an empty given label");
            t.fatal(Failure::EmptyGiven {
                prefix: self.prefix.clone(),
            });
            return None;
        }

        Some(setup)
    }

    fn given_phase(&mut self, t: &mut dyn TestContext, setup: Option<SetupFn<T>>) {
        trace!(prefix = %self.prefix, phase = %Phase::Given, "Running phase");
        let given_ran = match setup {
            Some(setup) => {
                setup(t, &mut self.tc);
                true
            }
            None => false,
        };

        self.hooks.after_given(
            t,
            AfterGiven {
                tc: &mut self.tc,
                given: &mut self.given,
                when: &mut self.when,
                then: &mut self.then,
                given_ran,
            },
        );
    }

    fn describe_act_assert(&mut self, t: &mut dyn TestContext) -> Outcome {
        t.helper();

        if let Some(describe) = self.describe.clone() {
            trace!(prefix = %self.prefix, phase = %Phase::Describe, "Running phase");
            let response = describe(
                t,
                Describe {
                    tc: &self.tc,
                    given: &self.given,
                    when: &self.when,
                    then: &self.then,
                },
            );
            self.when = response.when;
            self.then = response.then;
        }

        let Some((act, assert)) = self.validate(t) else {
            return Outcome::Aborted;
        };

        let when_scope = naming::when_scope(&self.prefix, &self.when, self.has_given_phase);
        let then_scope = naming::then_scope(&self.then);
        let hooks = &self.hooks;
        let tc = &mut self.tc;

        t.run(&when_scope, &mut |t: &mut dyn TestContext| {
            t.helper();
            trace!(phase = %Phase::Act, "Running phase");
            let mut result = act(t, &*tc);
            hooks.after_act(
                t,
                AfterAct {
                    tc: &mut *tc,
                    result: &mut result,
                },
            );

            t.run(&then_scope, &mut |t: &mut dyn TestContext| {
                t.helper();
                trace!(phase = %Phase::Assert, "Running phase");
                assert(
                    t,
                    Assert {
                        tc: &*tc,
                        result: &result,
                    },
                );
                hooks.after_assert(
                    t,
                    AfterAssert {
                        tc: &mut *tc,
                        result: &mut result,
                    },
                );
            });
        });
        Outcome::Completed
    }

    /// Check that the replay can enter Act, reporting every missing piece.
    fn validate(&self, t: &mut dyn TestContext) -> Option<(ActFn<T, R>, AssertFn<T, R>)> {
        trace!(prefix = %self.prefix, phase = %Phase::Validate, "Running phase");
        let mut configured = true;

        if self.when.is_empty() {
            t.error(Failure::MissingWhen);
            configured = false;
        }
        if self.then.is_empty() {
            t.error(Failure::MissingThen);
            configured = false;
        }
        if self.act.is_none() {
            t.error(Failure::MissingAct);
            configured = false;
        }
        if self.assert.is_none() {
            t.error(Failure::MissingAssert);
            configured = false;
        }

        match (configured, self.act.clone(), self.assert.clone()) {
            (true, Some(act), Some(assert)) => Some((act, assert)),
            _ => {
                warn!(prefix = %self.prefix, "Scenario not configured, skipping when/then");
                t.fatal(Failure::NotConfigured {
                    prefix: self.prefix.clone(),
                });
                None
            }
        }
    }
}
