//! Property-based tests for expansion and reconciliation using proptest.
//!
//! These check invariants that must hold for *any* complete pattern, not just
//! the fixtures in `expander_tests.rs` and `reconciler_tests.rs`.

use std::collections::BTreeSet;

use active_periods::{expand_occurrences, reconcile_active_periods, RecurrencePattern};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_timezone() -> impl Strategy<Value = Tz> {
    prop_oneof![
        Just(chrono_tz::UTC),
        Just(chrono_tz::Pacific::Auckland),
        Just(chrono_tz::Australia::Sydney),
        Just(chrono_tz::Europe::London),
        Just(chrono_tz::America::Los_Angeles),
    ]
}

fn arb_weekdays() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::btree_set(0u8..7, 1..=7)
        .prop_map(|set: BTreeSet<u8>| set.into_iter().collect())
}

/// A local start time from 04:00 onwards, so no occurrence lands in a DST
/// gap or overlap in any of the zones above.
fn arb_local_start() -> impl Strategy<Value = (NaiveDate, u32, u32)> {
    (2022i32..=2027, 1u32..=12, 1u32..=28, 4u32..=23, 0u32..=59).prop_map(|(y, m, d, h, min)| {
        (NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, min)
    })
}

fn arb_duration() -> impl Strategy<Value = u32> {
    1u32..=24
}

/// A complete pattern spanning 0..=60 days in `tz`.
fn arb_pattern() -> impl Strategy<Value = (RecurrencePattern, Tz)> {
    (arb_local_start(), 0i64..=60, arb_weekdays(), arb_timezone()).prop_map(
        |((date, hour, min), span_days, weekdays, tz)| {
            let naive = date.and_hms_opt(hour, min, 0).unwrap();
            let dtstart = tz.from_local_datetime(&naive).earliest().unwrap();
            let until = tz
                .from_local_datetime(&(naive + Duration::days(span_days)))
                .earliest()
                .unwrap();
            (
                RecurrencePattern::weekly(
                    dtstart.with_timezone(&Utc),
                    until.with_timezone(&Utc),
                    weekdays,
                ),
                tz,
            )
        },
    )
}

/// An instant from two days before `dtstart` to two days after `until`.
fn now_within(pattern: &RecurrencePattern, offset_minutes: i64) -> DateTime<Utc> {
    let dtstart = pattern.dtstart.unwrap();
    let until = pattern.until.unwrap();
    let window = (until - dtstart).num_minutes() + 4 * 24 * 60;
    dtstart - Duration::days(2) + Duration::minutes(offset_minutes.rem_euclid(window + 1))
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Every occurrence keeps the local start time of dtstart
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn local_start_time_is_stable((pattern, tz) in arb_pattern(), dur in arb_duration()) {
        let periods = expand_occurrences(&pattern, dur, tz).unwrap();
        let anchor = pattern.dtstart.unwrap().with_timezone(&tz);

        for period in &periods {
            let local = period.start_utc().unwrap().with_timezone(&tz);
            prop_assert_eq!(
                (local.hour(), local.minute()),
                (anchor.hour(), anchor.minute()),
                "occurrence {} drifted from {}",
                local,
                anchor
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Expansion is sorted, bounded and one occurrence per local day
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_is_sorted_and_bounded((pattern, tz) in arb_pattern(), dur in arb_duration()) {
        let periods = expand_occurrences(&pattern, dur, tz).unwrap();
        let dtstart = pattern.dtstart.unwrap().timestamp();
        let until = pattern.until.unwrap().timestamp();

        for window in periods.windows(2) {
            prop_assert!(window[0].start_time < window[1].start_time);
        }
        for period in &periods {
            prop_assert!(period.start_time >= dtstart && period.start_time <= until);
            prop_assert_eq!(period.end_time, Some(period.start_time + i64::from(dur) * 3_600));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: No history and unresolved means the full expansion
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn no_history_is_full_expansion(
        (pattern, tz) in arb_pattern(),
        dur in arb_duration(),
        offset in any::<i64>(),
    ) {
        let now = now_within(&pattern, offset);

        let reconciled = reconcile_active_periods(&pattern, dur, &[], false, now, tz).unwrap();

        prop_assert_eq!(reconciled, expand_occurrences(&pattern, dur, tz).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Property 4: Elapsed periods are copied through unchanged
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn elapsed_periods_are_immutable(
        (pattern, tz) in arb_pattern(),
        old_dur in arb_duration(),
        new_dur in arb_duration(),
        weekdays in arb_weekdays(),
        offset in any::<i64>(),
        is_resolved in any::<bool>(),
    ) {
        let existing = expand_occurrences(&pattern, old_dur, tz).unwrap();
        let now = now_within(&pattern, offset);
        let edited = RecurrencePattern { byweekday: weekdays, ..pattern };

        let reconciled =
            reconcile_active_periods(&edited, new_dur, &existing, is_resolved, now, tz).unwrap();

        let started = existing.first().is_some_and(|p| p.start_time <= now.timestamp());
        if started || is_resolved {
            let elapsed: Vec<_> = existing
                .iter()
                .filter(|p| p.start_time + i64::from(new_dur) * 3_600 < now.timestamp())
                .copied()
                .collect();
            prop_assert!(reconciled.len() >= elapsed.len());
            prop_assert_eq!(&reconciled[..elapsed.len()], &elapsed[..]);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Resolved disruptions have no future and never come back empty
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn resolved_has_no_future(
        (pattern, tz) in arb_pattern(),
        dur in arb_duration(),
        offset in any::<i64>(),
    ) {
        let existing = expand_occurrences(&pattern, dur, tz).unwrap();
        let now = now_within(&pattern, offset).timestamp();
        let now_utc = DateTime::from_timestamp(now, 0).unwrap();

        let reconciled =
            reconcile_active_periods(&pattern, dur, &existing, true, now_utc, tz).unwrap();

        prop_assert!(!reconciled.is_empty());
        for period in &reconciled {
            prop_assert!(period.start_time <= now);
            prop_assert!(period.end_time.unwrap() <= now);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Reconciliation is deterministic and reopening is restorable
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn resolve_then_reopen_restores(
        (pattern, tz) in arb_pattern(),
        dur in arb_duration(),
        offset in any::<i64>(),
    ) {
        let existing = expand_occurrences(&pattern, dur, tz).unwrap();
        let now = now_within(&pattern, offset);

        let first = reconcile_active_periods(&pattern, dur, &existing, false, now, tz).unwrap();
        let second = reconcile_active_periods(&pattern, dur, &existing, false, now, tz).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &existing);

        let resolved = reconcile_active_periods(&pattern, dur, &existing, true, now, tz).unwrap();
        let started = existing.first().is_some_and(|p| p.start_time <= now.timestamp());
        if started {
            let reopened =
                reconcile_active_periods(&pattern, dur, &resolved, false, now, tz).unwrap();
            prop_assert_eq!(reopened, existing);
        }
    }
}
