//! Reconcile a recurring disruption's persisted active periods with its
//! (possibly edited) pattern.
//!
//! Periods that have fully elapsed are history and are copied through as-is.
//! The period in progress at `now` and everything after it are regenerated
//! from the pattern, so edits to weekdays, end date or duration take effect
//! from `now` onwards and never retroactively.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::Result;
use crate::expander::{expand_occurrences, hours_to_seconds};
use crate::pattern::RecurrencePattern;
use crate::period::ActivePeriod;

/// Compute the active periods to persist for a recurring disruption.
///
/// # Arguments
///
/// * `pattern` — The recurrence pattern after any edit.
/// * `duration_hours` — Length of each occurrence after any edit.
/// * `existing` — The active periods currently persisted, ascending.
/// * `is_resolved` — Whether the disruption has been resolved.
/// * `now` — The instant the reconciliation happens at.
/// * `tz` — Timezone whose wall clock occurrences are pinned to.
///
/// The result is `past ++ current ++ future`:
///
/// - past: existing periods with `start_time + duration < now`, unchanged;
/// - current: regenerated occurrences containing `now`, ending at `now` when
///   resolved and at `start_time + duration` otherwise;
/// - future: regenerated occurrences starting after `now`, dropped when resolved.
///
/// When nothing has started yet and the disruption is unresolved, the full
/// expansion is returned. A resolved disruption with no periods at all gets a
/// single zero-length period at `now`.
///
/// # Errors
/// Propagates expansion errors for an incomplete pattern.
pub fn reconcile_active_periods(
    pattern: &RecurrencePattern,
    duration_hours: u32,
    existing: &[ActivePeriod],
    is_resolved: bool,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<ActivePeriod>> {
    let all_occurrences = expand_occurrences(pattern, duration_hours, tz)?;
    let now = now.timestamp();

    let not_started = existing.first().is_none_or(|first| now < first.start_time);
    if !is_resolved && not_started {
        debug!(
            occurrences = all_occurrences.len(),
            "no period has started, using full expansion"
        );
        return Ok(all_occurrences);
    }

    let duration = hours_to_seconds(duration_hours);

    // Elapsed periods are judged with the current duration, not whatever
    // duration they were originally generated with. Persisted start times are
    // caller input, so the end is saturated rather than allowed to overflow.
    let past = existing
        .iter()
        .filter(|period| period.start_time.saturating_add(duration) < now)
        .copied();

    let current = all_occurrences
        .iter()
        .filter(|period| period.contains(now))
        .map(|period| {
            let end_time = if is_resolved {
                now
            } else {
                period.start_time.saturating_add(duration)
            };
            ActivePeriod::new(period.start_time, end_time)
        });

    let future = all_occurrences
        .iter()
        .filter(|period| !is_resolved && period.start_time > now)
        .copied();

    let mut periods: Vec<ActivePeriod> = past.chain(current).chain(future).collect();

    if is_resolved && periods.is_empty() {
        debug!(now, "resolved before any period started, recording instant period");
        periods.push(ActivePeriod::instant(now));
    }

    debug!(
        existing = existing.len(),
        reconciled = periods.len(),
        is_resolved,
        "reconciled active periods"
    );

    Ok(periods)
}
