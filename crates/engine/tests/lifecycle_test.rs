use std::cell::RefCell;
use std::rc::Rc;

use gwt_engine::lifecycle::{act_fn, assert_fn, describe_fn};
use gwt_engine::{
    given_fn, given_when_then, when_then, Arrangement, DescribeResponse, Failure, Hooks,
    Lifecycle, TestContext, TestFactory, Variant,
};
use gwt_harness::{Harness, HarnessConfig, Record, RecordingContext, Report};

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn push(log: &Log, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn minimal() -> Lifecycle<u32, u32> {
    Lifecycle::new(1)
        .when("w")
        .then("t")
        .with_act(|_, tc| *tc * 2)
        .with_assert(|_, _| {})
}

fn record(scenario: &impl TestFactory) -> RecordingContext {
    let mut t = RecordingContext::new();
    scenario.test()(&mut t);
    t
}

fn host_run(name: &str, test: gwt_engine::TestFn) -> Report {
    Harness::new(HarnessConfig::default()).run(name, |t| test(t))
}

#[test]
fn when_then_without_given_opens_two_scopes() {
    let t = record(&minimal());

    assert_eq!(t.scopes(), vec!["when w", "then t"]);
    assert!(!t.failed());
}

#[test]
fn unconfigured_scenario_reports_every_gap_then_aborts() {
    let scenario: Lifecycle<u32, u32> = Lifecycle::new(0);
    let t = record(&scenario);

    assert_eq!(
        t.records(),
        &[
            Record::Error(Failure::MissingWhen),
            Record::Error(Failure::MissingThen),
            Record::Error(Failure::MissingAct),
            Record::Error(Failure::MissingAssert),
            Record::Fatal(Failure::NotConfigured {
                prefix: String::new()
            }),
        ]
    );
    assert!(t.scopes().is_empty());
}

#[test]
fn validation_reports_only_missing_pieces() {
    let scenario = minimal().then("");
    let mut t = RecordingContext::new();
    scenario.test_indexed(4)(&mut t);

    assert_eq!(
        t.records(),
        &[
            Record::Error(Failure::MissingThen),
            Record::Fatal(Failure::NotConfigured {
                prefix: "4/".to_string()
            }),
        ]
    );
}

#[test]
fn arrange_opens_given_scope_and_hooks_fire_in_order() {
    let calls = log();
    let hooks_log = Rc::clone(&calls);
    let setup_log = Rc::clone(&calls);

    let hooks = {
        let (a, b, c, d) = (
            Rc::clone(&hooks_log),
            Rc::clone(&hooks_log),
            Rc::clone(&hooks_log),
            Rc::clone(&hooks_log),
        );
        Hooks::new()
            .with_after_arrange(move |_, args| {
                assert!(args.arrange_ran);
                assert!(!args.missing_setup);
                assert!(!args.empty_given);
                push(&a, "after_arrange");
            })
            .with_after_given(move |_, args| {
                assert!(args.given_ran);
                push(&b, "after_given");
            })
            .with_after_act(move |_, _| push(&c, "after_act"))
            .with_after_assert(move |_, _| push(&d, "after_assert"))
    };

    let scenario = minimal().with_hooks(hooks).with_arrange(move |_, _| {
        let setup_log = Rc::clone(&setup_log);
        Arrangement::new("ctx", move |_: &mut dyn TestContext, _: &mut u32| {
            push(&setup_log, "setup");
        })
    });

    let t = record(&scenario);

    assert_eq!(t.scopes(), vec!["given ctx", "when w", "then t"]);
    assert!(!t.failed());
    assert_eq!(
        entries(&calls),
        vec!["after_arrange", "setup", "after_given", "after_act", "after_assert"]
    );
}

#[test]
fn arrange_without_setup_fails_once_with_prefix() {
    let given_entered = log();
    let seen = Rc::clone(&given_entered);
    let scenario = minimal()
        .with_arrange(|_, _| Arrangement::without_setup("nil given"))
        .with_hooks(Hooks::new().with_after_given(move |_, _| push(&seen, "after_given")));

    let mut t = RecordingContext::new();
    scenario.test_indexed(2)(&mut t);

    assert_eq!(
        t.records(),
        &[Record::Fatal(Failure::MissingSetup {
            prefix: "2/".to_string()
        })]
    );
    assert!(entries(&given_entered).is_empty());
}

#[test]
fn arrange_with_empty_given_fails_after_hook() {
    let flags = Rc::new(RefCell::new(None));
    let seen = Rc::clone(&flags);
    let scenario = minimal()
        .with_arrange(|_, _| Arrangement::new("", |_: &mut dyn TestContext, _: &mut u32| {}))
        .with_hooks(Hooks::new().with_after_arrange(move |_, args| {
            *seen.borrow_mut() = Some((args.arrange_ran, args.missing_setup, args.empty_given));
        }));

    let t = record(&scenario);

    assert_eq!(
        t.records(),
        &[Record::Fatal(Failure::EmptyGiven {
            prefix: String::new()
        })]
    );
    assert_eq!(*flags.borrow(), Some((true, false, true)));
}

#[test]
fn missing_setup_takes_precedence_over_empty_given() {
    let scenario = minimal().with_arrange(|_, _| Arrangement::without_setup(""));
    let t = record(&scenario);

    assert_eq!(
        t.records(),
        &[Record::Fatal(Failure::MissingSetup {
            prefix: String::new()
        })]
    );
}

#[test]
fn indexed_scenario_without_given_prefixes_when_scope() {
    let mut t = RecordingContext::new();
    minimal().test_indexed(3)(&mut t);

    assert_eq!(t.scopes(), vec!["3/when w", "then t"]);
}

#[test]
fn given_label_alone_opens_given_scope_without_setup() {
    let flags = log();
    let (a, b) = (Rc::clone(&flags), Rc::clone(&flags));
    let scenario = minimal().given("g").with_hooks(
        Hooks::new()
            .with_after_arrange(move |_, args| {
                push(
                    &a,
                    format!("{} {} {}", args.arrange_ran, args.missing_setup, args.empty_given),
                );
            })
            .with_after_given(move |_, args| push(&b, format!("given_ran={}", args.given_ran))),
    );

    let mut t = RecordingContext::new();
    scenario.test_indexed(0)(&mut t);

    assert_eq!(t.scopes(), vec!["0/given g", "when w", "then t"]);
    assert_eq!(entries(&flags), vec!["false true false", "given_ran=false"]);
}

#[test]
fn no_given_phase_dispatches_degenerate_hooks() {
    let flags = log();
    let (a, b) = (Rc::clone(&flags), Rc::clone(&flags));
    let scenario = minimal().with_hooks(
        Hooks::new()
            .with_after_arrange(move |_, args| {
                push(
                    &a,
                    format!("{} {} {}", args.arrange_ran, args.missing_setup, args.empty_given),
                );
            })
            .with_after_given(move |_, args| push(&b, format!("given_ran={}", args.given_ran))),
    );

    let t = record(&scenario);

    assert_eq!(t.scopes(), vec!["when w", "then t"]);
    assert_eq!(entries(&flags), vec!["false true true", "given_ran=false"]);
}

#[test]
fn arrange_rewrites_working_copy_only() {
    let results = log();
    let sink = Rc::clone(&results);

    let scenario = Lifecycle::<u32, u32>::new(5).with_arrange(move |_, cfg| {
        *cfg.when = "doubled".to_string();
        *cfg.then = "is even".to_string();
        *cfg.act = Some(act_fn(|_, tc: &u32| *tc * 2));
        let sink = Rc::clone(&sink);
        *cfg.assert = Some(assert_fn(move |_, a| push(&sink, format!("{}->{}", a.tc, a.result))));
        cfg.hooks.set_after_act(|_, args| *args.result += 1);
        *cfg.tc += 1;
        Arrangement::new(cfg.given, |_: &mut dyn TestContext, tc: &mut u32| *tc *= 10)
    });
    let scenario = scenario.given("seed");

    let test = scenario.test();
    let mut first = RecordingContext::new();
    test(&mut first);
    let mut second = RecordingContext::new();
    test(&mut second);

    assert_eq!(first.scopes(), vec!["given seed", "when doubled", "then is even"]);
    assert_eq!(first.records(), second.records());
    assert_eq!(entries(&results), vec!["60->121", "60->121"]);
    assert!(scenario.act.is_none());
    assert!(scenario.when.is_empty());
    assert_eq!(scenario.tc, 5);
}

#[test]
fn describe_finalizes_labels_from_test_case() {
    let scenario: Lifecycle<u32, u32> = minimal()
        .given("a number")
        .when("")
        .with_describe(|_, d| {
            DescribeResponse::new(format!("doubling {}", d.tc), format!("{} holds", d.then))
        });

    let t = record(&scenario);

    assert_eq!(t.scopes(), vec!["given a number", "when doubling 1", "then t holds"]);
    assert!(!t.failed());
}

#[test]
fn arrange_may_install_describe() {
    let scenario: Lifecycle<u32, u32> = minimal().when("").with_arrange(|_, cfg| {
        *cfg.describe = Some(describe_fn(|_, d| DescribeResponse::new("late", d.then)));
        Arrangement::new("ctx", |_: &mut dyn TestContext, _: &mut u32| {})
    });

    let t = record(&scenario);
    assert_eq!(t.scopes(), vec!["given ctx", "when late", "then t"]);
}

#[test]
fn hooks_mutate_state_seen_by_later_phases() {
    let asserted = log();
    let sink = Rc::clone(&asserted);
    let scenario = minimal()
        .given("g")
        .with_assert(move |_, a| push(&sink, format!("{} {}", a.tc, a.result)))
        .with_hooks(
            Hooks::<u32, u32>::new()
                .with_after_given(|_, args| {
                    *args.tc = 7;
                    args.then.push_str(" (adjusted)");
                })
                .with_after_act(|_, args| {
                    *args.result += 100;
                    *args.tc += 1;
                }),
        );

    let t = record(&scenario);

    assert_eq!(t.scopes(), vec!["given g", "when w", "then t (adjusted)"]);
    assert_eq!(entries(&asserted), vec!["8 114"]);
}

#[test]
fn variants_skip_and_missing_kind_keep_counting() {
    let scenario = minimal().with_variants(|_, tc| {
        vec![
            Variant::new("ignored", tc).skip(),
            Variant::new("", tc + 1),
            Variant::new("tripled", tc + 2),
        ]
    });

    let t = record(&scenario);

    assert_eq!(
        t.scopes(),
        vec!["when w", "then t", "tripled/when w", "then t"]
    );
    assert_eq!(
        t.errors(),
        vec![&Failure::VariantWithoutKind { index: 1 }]
    );
    assert!(t.fatals().is_empty());
}

#[test]
fn variants_carry_kind_prefix_on_given_scope_without_index() {
    let scenario = minimal()
        .given("g")
        .with_variants(|_, tc| std::iter::once(Variant::new("edge", tc)));

    let mut t = RecordingContext::new();
    scenario.test_indexed(1)(&mut t);

    assert_eq!(
        t.scopes(),
        vec!["1/given g", "when w", "then t", "edge/given g", "when w", "then t"]
    );
}

#[test]
fn variant_generator_sees_pre_replay_snapshot() {
    let seeds = log();
    let acted = log();
    let (seed_sink, act_sink) = (Rc::clone(&seeds), Rc::clone(&acted));

    let scenario = Lifecycle::<Vec<u32>, usize>::new(vec![1])
        .given("g")
        .when("w")
        .then("t")
        .with_act(move |_, tc| {
            push(&act_sink, format!("{:?}", tc));
            tc.len()
        })
        .with_assert(|_, _| {})
        .with_hooks(Hooks::<Vec<u32>, usize>::new().with_after_given(|_, args| args.tc.push(99)))
        .with_variants(move |_, tc: Vec<u32>| {
            push(&seed_sink, format!("{:?}", tc));
            vec![Variant::new("more", vec![1, 2])]
        });

    let t = record(&scenario);

    assert!(!t.failed());
    assert_eq!(entries(&seeds), vec!["[1]"]);
    assert_eq!(entries(&acted), vec!["[1, 99]", "[1, 2, 99]"]);
    assert_eq!(scenario.tc, vec![1]);
}

#[derive(Debug, Clone)]
struct Tracked {
    shared: Rc<RefCell<Vec<u32>>>,
    deep_copies: u32,
}

#[test]
fn clone_fn_applies_to_basis_and_variants_unless_skipped() {
    let seen = log();
    let sink = Rc::clone(&seen);
    let shared = Rc::new(RefCell::new(vec![0]));

    let scenario = Lifecycle::<Tracked, ()>::new(Tracked {
        shared: Rc::clone(&shared),
        deep_copies: 0,
    })
    .when("w")
    .then("t")
    .with_clone_tc(|tc: Tracked| Tracked {
        shared: Rc::new(RefCell::new(tc.shared.borrow().clone())),
        deep_copies: tc.deep_copies + 1,
    })
    .with_act(move |_, tc| {
        tc.shared.borrow_mut().push(1);
        push(&sink, format!("copies={}", tc.deep_copies));
    })
    .with_assert(|_, _| {})
    .with_variants(|_, tc: Tracked| {
        vec![
            Variant::new("cloned", tc.clone()),
            Variant::new("aliased", tc).skip_clone(),
        ]
    });

    let t = record(&scenario);

    assert!(!t.failed());
    assert_eq!(entries(&seen), vec!["copies=1", "copies=1", "copies=0"]);
    // only the variant that bypassed the clone function wrote through the alias
    assert_eq!(*shared.borrow(), vec![0, 1]);
}

#[test]
fn builders_run_given_when_then() {
    let calls = log();
    let (g, w, th) = (Rc::clone(&calls), Rc::clone(&calls), Rc::clone(&calls));

    let scenario = given_when_then(
        10u32,
        "a counter",
        Some(given_fn(move |_, tc: &mut u32| {
            *tc += 1;
            push(&g, "given");
        })),
        "it is doubled",
        move |_, tc: &u32| {
            push(&w, "when");
            *tc * 2
        },
        "the result is 22",
        move |t, _, result: &u32| {
            push(&th, "then");
            if *result != 22 {
                t.fail("unexpected result");
            }
        },
    );

    let report = host_run("counter", scenario.test());

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(entries(&calls), vec!["given", "when", "then"]);
    assert_eq!(
        report.scope_paths(),
        vec![
            "counter",
            "counter/given a counter",
            "counter/given a counter/when it is doubled",
            "counter/given a counter/when it is doubled/then the result is 22",
        ]
    );
}

#[test]
fn when_then_builder_has_no_given_scope() {
    let scenario = when_then(
        "abc".to_string(),
        "measured",
        |_, tc: &String| tc.len(),
        "is three",
        |t, _, len: &usize| {
            if *len != 3 {
                t.fail_now("wrong length");
            }
        },
    );

    let report = host_run("len", scenario.test_indexed(0));

    assert!(report.passed(), "{}", report.summary());
    assert_eq!(
        report.scope_paths(),
        vec!["len", "len/0/when measured", "len/0/when measured/then is three"]
    );
}

#[test]
fn host_hard_failure_in_assert_aborts_only_then_scope() {
    let after = log();
    let sink = Rc::clone(&after);
    let scenario = minimal()
        .with_assert(|t, a| {
            if *a.result != 3 {
                t.fail_now("result should be 3");
            }
        })
        .with_hooks(Hooks::new().with_after_assert(move |_, _| push(&sink, "after_assert")))
        .with_variants(|_, _| vec![Variant::new("ok", 1)]);

    let report = host_run("abort", scenario.test());

    assert!(!report.passed());
    assert!(entries(&after).is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].path, "abort/when w/then t");
    assert_eq!(report.failures[1].path, "abort/ok/when w/then t");
    assert!(!report.scope("abort/when w").unwrap().passed);
}

#[test]
fn host_configuration_failure_stops_the_replay() {
    let scenario: Lifecycle<u32, u32> = Lifecycle::new(0).given("g");
    let report = host_run("broken", scenario.test());

    assert_eq!(report.scope_paths(), vec!["broken", "broken/given g"]);
    let messages: Vec<&str> = report.failures.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "When string of BDD test must not be empty",
            "Then string of BDD test must not be empty",
            "Act function of BDD test is not defined",
            "Assert function of BDD test is not defined",
            "when+then not run: BDD test not configured properly (prefix = \"\")",
        ]
    );
}

#[test]
fn host_walk_continues_past_variant_without_kind() {
    let scenario = minimal().with_variants(|_, tc| {
        vec![Variant::new("", tc), Variant::new("later", tc)]
    });

    let report = host_run("walk", scenario.test());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].message,
        "BDD configuration error: test case variant at index 0 has no Kind detail"
    );
    assert!(report.scope("walk/later/when w").is_some());
}

fn blank_when_for_two(scenario: Lifecycle<u32, u32>) -> Lifecycle<u32, u32> {
    scenario
        .with_describe(|_, d| {
            let when = if *d.tc == 2 { "" } else { d.when };
            DescribeResponse::new(when, d.then)
        })
        .with_variants(|_, _| vec![Variant::new("bad", 2), Variant::new("good", 3)])
}

#[test]
fn unconfigured_variant_ends_walk_on_both_hosts() {
    let scenario = blank_when_for_two(minimal());

    let t = record(&scenario);
    assert_eq!(t.scopes(), vec!["when w", "then t"]);
    assert_eq!(
        t.records()[2..],
        [
            Record::Error(Failure::MissingWhen),
            Record::Fatal(Failure::NotConfigured {
                prefix: "bad/".to_string()
            }),
        ]
    );

    let report = host_run("root", scenario.test());
    assert_eq!(
        report.scope_paths(),
        vec!["root", "root/when w", "root/when w/then t"]
    );
    assert_eq!(report.failures.len(), 2);
    assert_eq!(
        report.failures[1].message,
        "when+then not run: BDD test not configured properly (prefix = \"bad/\")"
    );
}

#[test]
fn missing_setup_in_variant_ends_walk_on_both_hosts() {
    let scenario = minimal()
        .with_arrange(|_, cfg| {
            if *cfg.tc == 2 {
                Arrangement::without_setup("ctx")
            } else {
                Arrangement::new("ctx", |_: &mut dyn TestContext, _: &mut u32| {})
            }
        })
        .with_variants(|_, _| vec![Variant::new("bad", 2), Variant::new("good", 3)]);

    let t = record(&scenario);
    assert_eq!(t.scopes(), vec!["given ctx", "when w", "then t"]);
    assert_eq!(
        t.fatals(),
        vec![&Failure::MissingSetup {
            prefix: "bad/".to_string()
        }]
    );

    let report = host_run("root", scenario.test());
    assert!(report.scope("root/given ctx/when w/then t").is_some());
    assert!(report.scope("root/good/given ctx").is_none());
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn failure_inside_given_scope_keeps_walking_on_both_hosts() {
    let scenario = blank_when_for_two(minimal().given("g"));

    let t = record(&scenario);
    assert_eq!(
        t.scopes(),
        vec!["given g", "when w", "then t", "bad/given g", "good/given g", "when w", "then t"]
    );
    assert_eq!(t.fatals().len(), 1);

    let report = host_run("root", scenario.test());
    assert!(!report.scope("root/bad/given g").unwrap().passed);
    assert!(report.scope("root/good/given g/when w/then t").unwrap().passed);
    assert_eq!(report.failures.len(), 2);
}

#[test]
fn variants_are_pulled_one_at_a_time_between_replays() {
    let calls = log();
    let (act_log, yield_log) = (Rc::clone(&calls), Rc::clone(&calls));

    let scenario = minimal()
        .with_act(move |_, tc| {
            push(&act_log, format!("act {tc}"));
            *tc
        })
        .with_variants(move |_, tc| {
            let yield_log = Rc::clone(&yield_log);
            let mut produced = 0u32;
            std::iter::from_fn(move || {
                if produced == 2 {
                    return None;
                }
                produced += 1;
                push(&yield_log, format!("yield {produced}"));
                Some(Variant::new(format!("v{produced}"), tc + produced))
            })
        });

    let t = record(&scenario);

    assert!(!t.failed());
    assert_eq!(
        entries(&calls),
        vec!["act 1", "yield 1", "act 2", "yield 2", "act 3"]
    );
}
