//! Optional callbacks fired between phases.
//!
//! Each hook receives a freshly built argument struct holding mutable
//! views onto the replay's test case (and result, for Act/Assert hooks).
//! Changes made through those views are seen by every later phase of the
//! same replay. An unset hook does nothing.

use std::rc::Rc;

use gwt_core::TestContext;

/// Arguments of the `after_arrange` hook.
pub struct AfterArrange<'a, T> {
    pub tc: &'a mut T,
    /// Whether an Arrange function was configured and called.
    pub arrange_ran: bool,
    /// Whether no setup callback is available for the given scope.
    pub missing_setup: bool,
    /// Whether the given label is empty.
    pub empty_given: bool,
}

/// Arguments of the `after_given` hook.
pub struct AfterGiven<'a, T> {
    pub tc: &'a mut T,
    pub given: &'a mut String,
    pub when: &'a mut String,
    pub then: &'a mut String,
    /// Whether a setup callback ran inside the given scope.
    pub given_ran: bool,
}

/// Arguments of the `after_act` hook.
pub struct AfterAct<'a, T, R> {
    pub tc: &'a mut T,
    pub result: &'a mut R,
}

/// Arguments of the `after_assert` hook.
pub struct AfterAssert<'a, T, R> {
    pub tc: &'a mut T,
    pub result: &'a mut R,
}

pub type AfterArrangeFn<T> = Rc<dyn Fn(&mut dyn TestContext, AfterArrange<'_, T>)>;
pub type AfterGivenFn<T> = Rc<dyn Fn(&mut dyn TestContext, AfterGiven<'_, T>)>;
pub type AfterActFn<T, R> = Rc<dyn Fn(&mut dyn TestContext, AfterAct<'_, T, R>)>;
pub type AfterAssertFn<T, R> = Rc<dyn Fn(&mut dyn TestContext, AfterAssert<'_, T, R>)>;

/// The four post-phase hooks of a scenario.
pub struct Hooks<T, R> {
    pub after_arrange: Option<AfterArrangeFn<T>>,
    pub after_given: Option<AfterGivenFn<T>>,
    pub after_act: Option<AfterActFn<T, R>>,
    pub after_assert: Option<AfterAssertFn<T, R>>,
}

impl<T, R> Hooks<T, R> {
    pub fn new() -> Self {
        Self {
            after_arrange: None,
            after_given: None,
            after_act: None,
            after_assert: None,
        }
    }

    pub fn set_after_arrange(
        &mut self,
        f: impl Fn(&mut dyn TestContext, AfterArrange<'_, T>) + 'static,
    ) {
        self.after_arrange = Some(Rc::new(f));
    }

    pub fn set_after_given(&mut self, f: impl Fn(&mut dyn TestContext, AfterGiven<'_, T>) + 'static) {
        self.after_given = Some(Rc::new(f));
    }

    pub fn set_after_act(&mut self, f: impl Fn(&mut dyn TestContext, AfterAct<'_, T, R>) + 'static) {
        self.after_act = Some(Rc::new(f));
    }

    pub fn set_after_assert(
        &mut self,
        f: impl Fn(&mut dyn TestContext, AfterAssert<'_, T, R>) + 'static,
    ) {
        self.after_assert = Some(Rc::new(f));
    }

    pub fn with_after_arrange(
        mut self,
        f: impl Fn(&mut dyn TestContext, AfterArrange<'_, T>) + 'static,
    ) -> Self {
        self.set_after_arrange(f);
        self
    }

    pub fn with_after_given(
        mut self,
        f: impl Fn(&mut dyn TestContext, AfterGiven<'_, T>) + 'static,
    ) -> Self {
        self.set_after_given(f);
        self
    }

    pub fn with_after_act(
        mut self,
        f: impl Fn(&mut dyn TestContext, AfterAct<'_, T, R>) + 'static,
    ) -> Self {
        self.set_after_act(f);
        self
    }

    pub fn with_after_assert(
        mut self,
        f: impl Fn(&mut dyn TestContext, AfterAssert<'_, T, R>) + 'static,
    ) -> Self {
        self.set_after_assert(f);
        self
    }

    /// Whether any hook is configured.
    pub fn is_empty(&self) -> bool {
        self.after_arrange.is_none()
            && self.after_given.is_none()
            && self.after_act.is_none()
            && self.after_assert.is_none()
    }

    pub(crate) fn after_arrange(&self, t: &mut dyn TestContext, args: AfterArrange<'_, T>) {
        if let Some(f) = &self.after_arrange {
            f(t, args);
        }
    }

    pub(crate) fn after_given(&self, t: &mut dyn TestContext, args: AfterGiven<'_, T>) {
        if let Some(f) = &self.after_given {
            f(t, args);
        }
    }

    pub(crate) fn after_act(&self, t: &mut dyn TestContext, args: AfterAct<'_, T, R>) {
        if let Some(f) = &self.after_act {
            f(t, args);
        }
    }

    pub(crate) fn after_assert(&self, t: &mut dyn TestContext, args: AfterAssert<'_, T, R>) {
        if let Some(f) = &self.after_assert {
            f(t, args);
        }
    }
}

impl<T, R> Default for Hooks<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Clone for Hooks<T, R> {
    fn clone(&self) -> Self {
        Self {
            after_arrange: self.after_arrange.clone(),
            after_given: self.after_given.clone(),
            after_act: self.after_act.clone(),
            after_assert: self.after_assert.clone(),
        }
    }
}

impl<T, R> std::fmt::Debug for Hooks<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("after_arrange", &self.after_arrange.is_some())
            .field("after_given", &self.after_given.is_some())
            .field("after_act", &self.after_act.is_some())
            .field("after_assert", &self.after_assert.is_some())
            .finish()
    }
}
