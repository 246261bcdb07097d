//! Given/When/Then and When/Then constructors.
//!
//! Both produce a ready-to-run [`Lifecycle`] and reject malformed labels
//! before any scope runs. The when and then functions are plain (not
//! optional) parameters, so their presence is guaranteed by the caller's
//! types.

use std::rc::Rc;

use gwt_core::{ConfigError, TestContext};

use crate::lifecycle::{Arrangement, Lifecycle};

/// Setup function of a given step.
pub type GivenFn<T> = Rc<dyn Fn(&mut dyn TestContext, &mut T)>;

/// Wrap a closure as a given step.
pub fn given_fn<T>(f: impl Fn(&mut dyn TestContext, &mut T) + 'static) -> GivenFn<T> {
    Rc::new(f)
}

/// Build a scenario from a given step (optional), a when step, and a then
/// step.
///
/// A given label without a given function still opens a given scope, it
/// just has nothing to set up.
pub fn try_given_when_then<T, R, W, A>(
    tc: T,
    given: &str,
    given_fn: Option<GivenFn<T>>,
    when: &str,
    when_fn: W,
    then: &str,
    then_fn: A,
) -> Result<Lifecycle<T, R>, ConfigError>
where
    T: 'static,
    R: 'static,
    W: Fn(&mut dyn TestContext, &T) -> R + 'static,
    A: Fn(&mut dyn TestContext, &T, &R) + 'static,
{
    if given_fn.is_some() && given.is_empty() {
        return Err(ConfigError::EmptyGivenLabel);
    }
    if when.is_empty() {
        return Err(ConfigError::EmptyWhenLabel);
    }
    if then.is_empty() {
        return Err(ConfigError::EmptyThenLabel);
    }

    let mut scenario = Lifecycle::new(tc)
        .given(given)
        .when(when)
        .then(then)
        .with_act(when_fn)
        .with_assert(move |t, cfg| then_fn(t, cfg.tc, cfg.result));

    if let Some(setup) = given_fn {
        scenario = scenario.with_arrange(move |_, cfg| {
            let setup = Rc::clone(&setup);
            Arrangement::new(cfg.given, move |t: &mut dyn TestContext, tc: &mut T| setup(t, tc))
        });
    }

    Ok(scenario)
}

/// Like [`try_given_when_then`] without a given step.
pub fn try_when_then<T, R, W, A>(
    tc: T,
    when: &str,
    when_fn: W,
    then: &str,
    then_fn: A,
) -> Result<Lifecycle<T, R>, ConfigError>
where
    T: 'static,
    R: 'static,
    W: Fn(&mut dyn TestContext, &T) -> R + 'static,
    A: Fn(&mut dyn TestContext, &T, &R) + 'static,
{
    try_given_when_then(tc, "", None, when, when_fn, then, then_fn)
}

/// Build a Given/When/Then scenario.
///
/// # Panics
///
/// Panics with the [`ConfigError`] message when a label is malformed.
pub fn given_when_then<T, R, W, A>(
    tc: T,
    given: &str,
    given_fn: Option<GivenFn<T>>,
    when: &str,
    when_fn: W,
    then: &str,
    then_fn: A,
) -> Lifecycle<T, R>
where
    T: 'static,
    R: 'static,
    W: Fn(&mut dyn TestContext, &T) -> R + 'static,
    A: Fn(&mut dyn TestContext, &T, &R) + 'static,
{
    match try_given_when_then(tc, given, given_fn, when, when_fn, then, then_fn) {
        Ok(scenario) => scenario,
        Err(e) => panic!("{e}"),
    }
}

/// Build a When/Then scenario.
///
/// # Panics
///
/// Panics with the [`ConfigError`] message when a label is empty.
pub fn when_then<T, R, W, A>(tc: T, when: &str, when_fn: W, then: &str, then_fn: A) -> Lifecycle<T, R>
where
    T: 'static,
    R: 'static,
    W: Fn(&mut dyn TestContext, &T) -> R + 'static,
    A: Fn(&mut dyn TestContext, &T, &R) + 'static,
{
    given_when_then(tc, "", None, when, when_fn, then, then_fn)
}
