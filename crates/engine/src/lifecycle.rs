//! Scenario descriptor and the runnable factory it produces.

use std::rc::Rc;

use gwt_core::{TestContext, Variant};

use crate::fanout;
use crate::hooks::Hooks;

pub type ArrangeFn<T, R> = Rc<dyn Fn(&mut dyn TestContext, Arrange<'_, T, R>) -> Arrangement<T>>;
pub type SetupFn<T> = Box<dyn FnOnce(&mut dyn TestContext, &mut T)>;
pub type DescribeFn<T> = Rc<dyn Fn(&mut dyn TestContext, Describe<'_, T>) -> DescribeResponse>;
pub type ActFn<T, R> = Rc<dyn Fn(&mut dyn TestContext, &T) -> R>;
pub type AssertFn<T, R> = Rc<dyn Fn(&mut dyn TestContext, Assert<'_, T, R>)>;
pub type CloneFn<T> = Rc<dyn Fn(T) -> T>;
pub type VariantIter<T> = Box<dyn Iterator<Item = Variant<T>>>;
pub type VariantsFn<T> = Rc<dyn Fn(&mut dyn TestContext, T) -> VariantIter<T>>;

/// Runnable produced by a [`TestFactory`].
pub type TestFn = Box<dyn Fn(&mut dyn TestContext)>;

/// Mutable configuration handed to the Arrange function.
///
/// Everything reachable from here belongs to the current replay's working
/// copy of the scenario, so replacing a slot never leaks into another
/// replay.
pub struct Arrange<'a, T, R> {
    pub tc: &'a mut T,
    pub hooks: &'a mut Hooks<T, R>,
    pub describe: &'a mut Option<DescribeFn<T>>,
    pub act: &'a mut Option<ActFn<T, R>>,
    pub assert: &'a mut Option<AssertFn<T, R>>,
    /// Seed for the given label Arrange returns.
    pub given: String,
    /// Must be non-empty by the end of Describe.
    pub when: &'a mut String,
    /// Must be non-empty by the end of Describe.
    pub then: &'a mut String,
}

/// What Arrange returns: the final given label and the setup to run
/// inside the given scope. A missing setup is a hard failure.
pub struct Arrangement<T> {
    pub given: String,
    pub setup: Option<SetupFn<T>>,
}

impl<T> Arrangement<T> {
    pub fn new(
        given: impl Into<String>,
        setup: impl FnOnce(&mut dyn TestContext, &mut T) + 'static,
    ) -> Self {
        Self {
            given: given.into(),
            setup: Some(Box::new(setup)),
        }
    }

    /// An arrangement that fails the replay before the given scope opens.
    pub fn without_setup(given: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            setup: None,
        }
    }
}

/// Read-only view used to finalize the when/then labels.
pub struct Describe<'a, T> {
    pub tc: &'a T,
    pub given: &'a str,
    pub when: &'a str,
    pub then: &'a str,
}

/// Final when/then labels produced by Describe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeResponse {
    pub when: String,
    pub then: String,
}

impl DescribeResponse {
    pub fn new(when: impl Into<String>, then: impl Into<String>) -> Self {
        Self {
            when: when.into(),
            then: then.into(),
        }
    }
}

/// Arguments of the Assert function.
pub struct Assert<'a, T, R> {
    pub tc: &'a T,
    pub result: &'a R,
}

/// A scenario: labels, test case, and the functions of each phase.
///
/// `act` and `assert` are optional here so that Arrange can fill them in;
/// a replay that reaches the validation gate without them fails.
pub struct Lifecycle<T, R> {
    pub given: String,
    pub when: String,
    pub then: String,
    pub tc: T,
    pub hooks: Hooks<T, R>,
    /// Applied to every copy of a test case before it is replayed.
    pub clone_tc: Option<CloneFn<T>>,
    /// Derives more test cases from a snapshot of `tc` taken before the
    /// basis replay runs.
    pub variants: Option<VariantsFn<T>>,
    pub arrange: Option<ArrangeFn<T, R>>,
    pub describe: Option<DescribeFn<T>>,
    pub act: Option<ActFn<T, R>>,
    pub assert: Option<AssertFn<T, R>>,
}

impl<T, R> Lifecycle<T, R> {
    pub fn new(tc: T) -> Self {
        Self {
            given: String::new(),
            when: String::new(),
            then: String::new(),
            tc,
            hooks: Hooks::new(),
            clone_tc: None,
            variants: None,
            arrange: None,
            describe: None,
            act: None,
            assert: None,
        }
    }

    pub fn given(mut self, given: impl Into<String>) -> Self {
        self.given = given.into();
        self
    }

    pub fn when(mut self, when: impl Into<String>) -> Self {
        self.when = when.into();
        self
    }

    pub fn then(mut self, then: impl Into<String>) -> Self {
        self.then = then.into();
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks<T, R>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_clone_tc(mut self, f: impl Fn(T) -> T + 'static) -> Self {
        self.clone_tc = Some(Rc::new(f));
        self
    }

    pub fn with_variants<I>(mut self, f: impl Fn(&mut dyn TestContext, T) -> I + 'static) -> Self
    where
        I: IntoIterator<Item = Variant<T>>,
        I::IntoIter: 'static,
    {
        self.variants = Some(Rc::new(move |t: &mut dyn TestContext, tc: T| -> VariantIter<T> {
            Box::new(f(t, tc).into_iter())
        }));
        self
    }

    pub fn with_arrange(
        mut self,
        f: impl Fn(&mut dyn TestContext, Arrange<'_, T, R>) -> Arrangement<T> + 'static,
    ) -> Self {
        self.arrange = Some(Rc::new(f));
        self
    }

    pub fn with_describe(
        mut self,
        f: impl Fn(&mut dyn TestContext, Describe<'_, T>) -> DescribeResponse + 'static,
    ) -> Self {
        self.describe = Some(Rc::new(f));
        self
    }

    pub fn with_act(mut self, f: impl Fn(&mut dyn TestContext, &T) -> R + 'static) -> Self {
        self.act = Some(act_fn(f));
        self
    }

    pub fn with_assert(
        mut self,
        f: impl Fn(&mut dyn TestContext, Assert<'_, T, R>) + 'static,
    ) -> Self {
        self.assert = Some(assert_fn(f));
        self
    }

    /// Copy a test case the way every replay receives it.
    pub(crate) fn prepare_tc(&self, tc: T) -> T {
        match &self.clone_tc {
            Some(f) => f(tc),
            None => tc,
        }
    }
}

impl<T: Clone, R> Clone for Lifecycle<T, R> {
    fn clone(&self) -> Self {
        Self {
            given: self.given.clone(),
            when: self.when.clone(),
            then: self.then.clone(),
            tc: self.tc.clone(),
            hooks: self.hooks.clone(),
            clone_tc: self.clone_tc.clone(),
            variants: self.variants.clone(),
            arrange: self.arrange.clone(),
            describe: self.describe.clone(),
            act: self.act.clone(),
            assert: self.assert.clone(),
        }
    }
}

impl<T: std::fmt::Debug, R> std::fmt::Debug for Lifecycle<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("given", &self.given)
            .field("when", &self.when)
            .field("then", &self.then)
            .field("tc", &self.tc)
            .field("hooks", &self.hooks)
            .field("clone_tc", &self.clone_tc.is_some())
            .field("variants", &self.variants.is_some())
            .field("arrange", &self.arrange.is_some())
            .field("describe", &self.describe.is_some())
            .field("act", &self.act.is_some())
            .field("assert", &self.assert.is_some())
            .finish()
    }
}

/// Wrap a closure as an Act slot, e.g. to replace it from Arrange.
pub fn act_fn<T, R>(f: impl Fn(&mut dyn TestContext, &T) -> R + 'static) -> ActFn<T, R> {
    Rc::new(f)
}

/// Wrap a closure as an Assert slot, e.g. to replace it from Arrange.
pub fn assert_fn<T, R>(f: impl Fn(&mut dyn TestContext, Assert<'_, T, R>) + 'static) -> AssertFn<T, R> {
    Rc::new(f)
}

/// Wrap a closure as a Describe slot, e.g. to replace it from Arrange.
pub fn describe_fn<T>(
    f: impl Fn(&mut dyn TestContext, Describe<'_, T>) -> DescribeResponse + 'static,
) -> DescribeFn<T> {
    Rc::new(f)
}

/// Produces runnable scope functions for a scenario.
pub trait TestFactory {
    /// Runnable with an optional ordinal for table-driven numbering.
    fn test_with(&self, index: Option<usize>) -> TestFn;

    /// Runnable without numbering.
    fn test(&self) -> TestFn {
        self.test_with(None)
    }

    /// Runnable whose scope names carry `index`.
    fn test_indexed(&self, index: usize) -> TestFn {
        self.test_with(Some(index))
    }
}

impl<T: Clone + 'static, R: 'static> TestFactory for Lifecycle<T, R> {
    fn test_with(&self, index: Option<usize>) -> TestFn {
        let scenario = self.clone();
        Box::new(move |t: &mut dyn TestContext| fanout::run_scenario(&scenario, t, index))
    }
}
