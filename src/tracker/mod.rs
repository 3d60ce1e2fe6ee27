//! Status tracker: applies one probe outcome to a site's stats
//!
//! This is the policy core of the monitor. It is a pure function over
//! `(SiteStats, ProbeOutcome)` so it can be tested exhaustively without any
//! network or clock; side effects (logging, notification) happen in the
//! dispatcher, driven by the returned [`Transition`].
//!
//! # Alerting rules
//!
//! | from     | outcome | to   | transition |
//! |----------|---------|------|------------|
//! | UNKNOWN  | ok      | UP   | none       |
//! | UNKNOWN  | fail    | DOWN | Failure    |
//! | UP       | ok      | UP   | none       |
//! | UP       | fail    | DOWN | Failure    |
//! | DOWN     | ok      | UP   | Recovery   |
//! | DOWN     | fail    | DOWN | none       |

use crate::models::{ProbeOutcome, SiteStats, SiteStatus, Transition, TransitionKind};

/// Apply a probe outcome to a site's stats, returning the alertable
/// transition when one occurred.
///
/// Counters are updated first, then the status, as a single logical step.
/// Callers must hold the site's update lock so that overlapping cycles for
/// the same site cannot interleave; see [`crate::registry::SiteRegistry`].
pub fn apply_outcome(stats: &mut SiteStats, outcome: &ProbeOutcome) -> Option<Transition> {
    let previous = stats.status;
    stats.total_checks += 1;

    let (new_status, transition) = if outcome.ok {
        stats.last_latency_ms = outcome.latency_ms;
        let kind = match previous {
            SiteStatus::Down => Some(TransitionKind::Recovery),
            // First classification is not a recovery
            SiteStatus::Unknown | SiteStatus::Up => None,
        };
        (SiteStatus::Up, kind)
    } else {
        stats.failures += 1;
        stats.last_latency_ms = None;
        let kind = match previous {
            SiteStatus::Up | SiteStatus::Unknown => Some(TransitionKind::Failure),
            SiteStatus::Down => None,
        };
        (SiteStatus::Down, kind)
    };

    stats.status = new_status;

    transition.map(|kind| Transition {
        from: previous,
        to: new_status,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ok(latency_ms: u64) -> ProbeOutcome {
        ProbeOutcome::up(latency_ms, 200)
    }

    fn fail() -> ProbeOutcome {
        ProbeOutcome::down()
    }

    #[test]
    fn test_first_success_classifies_up_without_alert() {
        let mut stats = SiteStats::new();
        let transition = apply_outcome(&mut stats, &ok(25));

        assert_eq!(stats.status, SiteStatus::Up);
        assert_eq!(stats.total_checks, 1);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.last_latency_ms, Some(25));
        // UNKNOWN -> UP is a first classification, not a recovery
        assert!(transition.is_none());
    }

    #[test]
    fn test_first_failure_alerts() {
        let mut stats = SiteStats::new();
        let transition = apply_outcome(&mut stats, &fail());

        assert_eq!(stats.status, SiteStatus::Down);
        assert_eq!(stats.total_checks, 1);
        assert_eq!(stats.failures, 1);
        assert!(stats.last_latency_ms.is_none());

        let t = transition.expect("UNKNOWN -> DOWN must alert");
        assert_eq!(t.from, SiteStatus::Unknown);
        assert_eq!(t.to, SiteStatus::Down);
        assert_eq!(t.kind, TransitionKind::Failure);
    }

    #[test]
    fn test_up_down_down_up_sequence() {
        let mut stats = SiteStats::new();
        let outcomes = [ok(10), fail(), fail(), ok(20)];
        let results: Vec<_> = outcomes
            .iter()
            .map(|o| apply_outcome(&mut stats, o))
            .collect();

        // Statuses after each step: UP, DOWN, DOWN, UP
        assert_eq!(stats.status, SiteStatus::Up);
        assert_eq!(stats.total_checks, 4);
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.last_latency_ms, Some(20));
        assert_eq!(stats.uptime_percent(), 50.00);

        // Exactly two transitions: Failure at step 2, Recovery at step 4
        assert!(results[0].is_none());
        assert_eq!(results[1].unwrap().kind, TransitionKind::Failure);
        assert_eq!(results[1].unwrap().from, SiteStatus::Up);
        assert!(results[2].is_none(), "DOWN -> DOWN must not alert");
        assert_eq!(results[3].unwrap().kind, TransitionKind::Recovery);
        assert_eq!(results[3].unwrap().from, SiteStatus::Down);
        assert_eq!(results[3].unwrap().to, SiteStatus::Up);
    }

    #[test]
    fn test_failure_clears_latency() {
        let mut stats = SiteStats::new();
        apply_outcome(&mut stats, &ok(42));
        assert_eq!(stats.last_latency_ms, Some(42));

        apply_outcome(&mut stats, &fail());
        assert!(stats.last_latency_ms.is_none());
    }

    #[test]
    fn test_repeated_success_updates_latency() {
        let mut stats = SiteStats::new();
        apply_outcome(&mut stats, &ok(42));
        let transition = apply_outcome(&mut stats, &ok(17));

        assert!(transition.is_none());
        assert_eq!(stats.last_latency_ms, Some(17));
        assert_eq!(stats.total_checks, 2);
        assert_eq!(stats.failures, 0);
    }

    #[test]
    fn test_uptime_after_four_checks_one_failure() {
        let mut stats = SiteStats::new();
        for outcome in [ok(5), ok(5), fail(), ok(5)] {
            apply_outcome(&mut stats, &outcome);
        }
        assert_eq!(stats.uptime_percent(), 75.00);
    }

    proptest! {
        /// The invariant failures <= total_checks holds for any outcome
        /// sequence, and counters advance by exactly one per outcome.
        #[test]
        fn prop_counters_stay_consistent(outcomes in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut stats = SiteStats::new();
            for (i, is_ok) in outcomes.iter().enumerate() {
                let outcome = if *is_ok { ok(1) } else { fail() };
                apply_outcome(&mut stats, &outcome);
                prop_assert_eq!(stats.total_checks, (i + 1) as u64);
                prop_assert!(stats.failures <= stats.total_checks);
            }
            let expected_failures = outcomes.iter().filter(|b| !**b).count() as u64;
            prop_assert_eq!(stats.failures, expected_failures);
        }

        /// A transition is emitted iff the status actually changed into
        /// DOWN, or recovered from DOWN.
        #[test]
        fn prop_transitions_match_status_changes(outcomes in proptest::collection::vec(any::<bool>(), 1..100)) {
            let mut stats = SiteStats::new();
            for is_ok in outcomes {
                let before = stats.status;
                let outcome = if is_ok { ok(1) } else { fail() };
                let transition = apply_outcome(&mut stats, &outcome);
                match transition {
                    Some(t) => {
                        prop_assert_eq!(t.from, before);
                        prop_assert_eq!(t.to, stats.status);
                        prop_assert_ne!(t.from, t.to);
                    }
                    None => {
                        // Either no change, or the unalertable UNKNOWN -> UP
                        prop_assert!(
                            before == stats.status
                                || (before == SiteStatus::Unknown && stats.status == SiteStatus::Up)
                        );
                    }
                }
            }
        }
    }
}
