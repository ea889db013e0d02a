//! Recurrence expansion -- converts a weekly pattern into concrete active periods.
//!
//! Wraps the `rrule` crate (v0.13) and `chrono-tz`. Occurrences are generated
//! on the local wall clock of `dtstart` and only then placed in the configured
//! timezone, so they keep their local time-of-day when the UTC offset changes
//! between them.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rrule::{Frequency, NWeekday, RRule, RRuleSet};
use tracing::{debug, trace};

use crate::error::{PeriodError, Result};
use crate::fields;
use crate::pattern::RecurrencePattern;
use crate::period::ActivePeriod;

const SECONDS_PER_HOUR: i64 = 3_600;

/// Length of `duration_hours` in seconds.
pub(crate) fn hours_to_seconds(duration_hours: u32) -> i64 {
    i64::from(duration_hours) * SECONDS_PER_HOUR
}

/// Expand a weekly pattern into one active period per occurrence.
///
/// Every occurrence between `dtstart` and `until` (inclusive) on a selected
/// weekday starts at the local time-of-day of `dtstart` in `tz` and ends
/// `duration_hours` later. The result is in ascending order and is empty when
/// no selected weekday falls inside the bounds.
///
/// # Errors
/// Returns `PeriodError::InvalidPattern` if the pattern is incomplete (see
/// [`RecurrencePattern::validate`]) and `PeriodError::Expansion` if the rule
/// cannot be built. The number of occurrences is not limited here; comparing
/// it against a maximum is left to [`crate::validation::check_occurrences`].
pub fn expand_occurrences(
    pattern: &RecurrencePattern,
    duration_hours: u32,
    tz: Tz,
) -> Result<Vec<ActivePeriod>> {
    let duration = hours_to_seconds(duration_hours);

    let periods: Vec<ActivePeriod> = occurrence_starts(pattern, tz)?
        .into_iter()
        .map(|start| {
            let start = start.timestamp();
            ActivePeriod::new(start, start.saturating_add(duration))
        })
        .collect();

    debug!(
        timezone = %tz,
        duration_hours,
        occurrences = periods.len(),
        "expanded recurrence pattern"
    );

    Ok(periods)
}

/// Number of occurrences the pattern generates, independent of duration.
///
/// # Errors
/// Same as [`expand_occurrences`].
pub fn count_occurrences(pattern: &RecurrencePattern, tz: Tz) -> Result<usize> {
    Ok(occurrence_starts(pattern, tz)?.len())
}

/// Start instants of every occurrence, ascending.
fn occurrence_starts(pattern: &RecurrencePattern, tz: Tz) -> Result<Vec<DateTime<Utc>>> {
    let (dtstart, until) = pattern.validate()?;
    let by_weekday: Vec<NWeekday> = pattern
        .weekdays()?
        .into_iter()
        .map(NWeekday::Every)
        .collect();

    // The rule walks the local wall clock of `dtstart`, expressed in UTC so the
    // walk itself never sees an offset change. Each wall-clock occurrence is
    // then resolved in `tz`, which keeps its local time-of-day fixed.
    let anchor = dtstart.with_timezone(&tz).naive_local();
    let rrule_set: RRuleSet = RRule::new(Frequency::Weekly)
        .by_weekday(by_weekday)
        .build(rrule::Tz::UTC.from_utc_datetime(&anchor))
        .map_err(|e| PeriodError::Expansion(format!("{}", e)))?;

    // The rule itself is unbounded; `until` is applied here, inclusively, as
    // an absolute instant.
    let mut starts = Vec::new();
    for occurrence in rrule_set.into_iter() {
        let wall_clock = occurrence.naive_utc();
        let start = fields::resolve_wall_clock(tz, wall_clock)
            .ok_or_else(|| {
                PeriodError::Expansion(format!("{} cannot be resolved in {}", wall_clock, tz))
            })?
            .with_timezone(&Utc);
        if start > until {
            break;
        }
        trace!(%wall_clock, start = %start.to_rfc3339(), "occurrence");
        starts.push(start);
    }

    Ok(starts)
}
