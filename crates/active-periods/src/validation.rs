//! Form-level gates applied before a disruption is submitted.
//!
//! These predicates never read the system clock: `now` is always passed in.
//! They return `bool` because the form only needs to know whether to flag a
//! field; parse failures are folded into `false`.

use std::fmt;

use chrono::{DateTime, Duration, DurationRound, Utc};
use chrono_tz::Tz;

use crate::fields;
use crate::period::ActivePeriod;

/// Shortest and longest duration, in hours, of a recurring occurrence.
pub const MIN_DURATION_HOURS: u32 = 1;
pub const MAX_DURATION_HOURS: u32 = 24;

/// A start date is valid when it parses and is not before today in `tz`.
pub fn is_start_date_valid(start_date: &str, now: DateTime<Utc>, tz: Tz) -> bool {
    let today = now.with_timezone(&tz).date_naive();
    fields::parse_date(start_date).is_ok_and(|date| date >= today)
}

/// A start time is valid when it parses, exists on the start date in `tz`
/// (not skipped by a DST change), and is not before the current minute.
pub fn is_start_time_valid(start_date: &str, start_time: &str, now: DateTime<Utc>, tz: Tz) -> bool {
    let Ok(start) = fields::local_instant(start_date, start_time, tz) else {
        return false;
    };
    let current_minute = now
        .duration_trunc(Duration::minutes(1))
        .unwrap_or(now);
    start.with_timezone(&Utc) >= current_minute
}

/// An end date is required for recurring disruptions and optional otherwise.
/// When present it must parse and not precede the start date.
pub fn is_end_date_valid(end_date: &str, start_date: &str, is_recurrent: bool) -> bool {
    if end_date.is_empty() {
        return !is_recurrent;
    }
    let Ok(end) = fields::parse_date(end_date) else {
        return false;
    };
    match fields::parse_date(start_date) {
        Ok(start) => end >= start,
        Err(_) => true,
    }
}

/// End time of a one-off disruption.
///
/// Recurring disruptions end each occurrence by duration, so the field is
/// ignored for them. Leaving both end date and end time empty keeps the
/// disruption open-ended. Otherwise the end must be after the start and
/// after `now`.
pub fn is_end_time_valid(
    end_date: &str,
    end_time: &str,
    start_date: &str,
    start_time: &str,
    now: DateTime<Utc>,
    tz: Tz,
    is_recurrent: bool,
) -> bool {
    if is_recurrent || (end_date.is_empty() && end_time.is_empty()) {
        return true;
    }
    let Ok(end) = fields::local_instant(end_date, end_time, tz) else {
        return false;
    };
    let end = end.with_timezone(&Utc);
    if end <= now {
        return false;
    }
    match fields::local_instant(start_date, start_time, tz) {
        Ok(start) => end > start.with_timezone(&Utc),
        Err(_) => true,
    }
}

/// Duration of a recurring disruption's occurrences: a whole number of hours
/// between [`MIN_DURATION_HOURS`] and [`MAX_DURATION_HOURS`].
pub fn is_duration_valid(duration: &str, is_recurrent: bool) -> bool {
    if !is_recurrent {
        return true;
    }
    duration
        .trim()
        .parse::<u32>()
        .is_ok_and(|hours| (MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&hours))
}

/// Outcome of checking an expanded pattern against the occurrence cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceCheck {
    /// The pattern generates this many periods, within the cap.
    Valid(usize),
    NoOccurrences,
    TooMany { count: usize, max: usize },
}

impl OccurrenceCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The message shown to the operator, if submission must be blocked.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Valid(_) => None,
            Self::NoOccurrences => Some(
                "No active periods will be created. Please check the recurrence selection."
                    .to_string(),
            ),
            Self::TooMany { count, max } => Some(format!(
                "Too many active periods ({}). The maximum number of active periods is {}.",
                count, max
            )),
        }
    }
}

impl fmt::Display for OccurrenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(count) => write!(f, "{} active periods will be created.", count),
            _ => f.write_str(&self.message().unwrap_or_default()),
        }
    }
}

/// Check generated periods against the zero and `max` thresholds.
pub fn check_occurrences(periods: &[ActivePeriod], max: usize) -> OccurrenceCheck {
    check_occurrence_count(periods.len(), max)
}

/// Same as [`check_occurrences`], for a count from
/// [`crate::expander::count_occurrences`].
pub fn check_occurrence_count(count: usize, max: usize) -> OccurrenceCheck {
    match count {
        0 => OccurrenceCheck::NoOccurrences,
        count if count > max => OccurrenceCheck::TooMany { count, max },
        count => OccurrenceCheck::Valid(count),
    }
}
