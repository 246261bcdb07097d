//! Basis replay followed by one replay per variant.

use gwt_core::{Failure, TestContext};
use tracing::{debug, warn};

use crate::lifecycle::Lifecycle;
use crate::sequencer::{Outcome, Replay};

/// Run the basis test case, then every variant the scenario derives from it.
///
/// The variant generator sees a snapshot of `tc` taken before the basis
/// replay, so nothing the basis replay does to its own copy reaches it.
///
/// A replay that raises a hard failure on `t` itself ends the walk, the
/// same as it does on a host whose `fatal` unwinds out of `t`. Failures
/// inside the scopes a replay opens never stop it.
pub(crate) fn run_scenario<T: Clone, R>(
    scenario: &Lifecycle<T, R>,
    t: &mut dyn TestContext,
    index: Option<usize>,
) {
    t.helper();

    let snapshot = scenario.tc.clone();

    let basis = scenario.prepare_tc(snapshot.clone());
    if Replay::new(scenario, basis, index, "").run(t) == Outcome::Aborted {
        debug!("Basis replay aborted, variants not generated");
        return;
    }

    let Some(variants) = scenario.variants.clone() else {
        return;
    };

    let mut ran = 0usize;
    let mut skipped = 0usize;
    for (i, variant) in variants(t, snapshot).enumerate() {
        if variant.skip {
            skipped += 1;
            continue;
        }

        if variant.kind.is_empty() {
            warn!(index = i, "Variant has no kind");
            t.error(Failure::VariantWithoutKind { index: i });
            continue;
        }

        let tc = if variant.skip_clone {
            variant.tc
        } else {
            scenario.prepare_tc(variant.tc)
        };

        debug!(index = i, kind = %variant.kind, "Replaying variant");
        let outcome = Replay::new(scenario, tc, None, &variant.kind).run(t);
        ran += 1;
        if outcome == Outcome::Aborted {
            warn!(index = i, kind = %variant.kind, "Variant replay aborted, remaining variants not run");
            break;
        }
    }

    debug!(ran, skipped, "Variants finished");
}
