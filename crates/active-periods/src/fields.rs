//! Parsing of the control centre's date and time form fields.
//!
//! Dates are entered as `DD/MM/YYYY` and times as 24-hour `HH:mm`, both in
//! the configured local timezone. Parsing is strict: `1/2/2022` or `9:00`
//! are rejected, as the form would reject them.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
};
use chrono_tz::Tz;

use crate::error::{PeriodError, Result};

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Parse a `DD/MM/YYYY` date field.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    if value.len() != 10 {
        return Err(PeriodError::InvalidDate(format!(
            "'{}' is not a DD/MM/YYYY date",
            value
        )));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| PeriodError::InvalidDate(format!("'{}': {}", value, e)))
}

/// Parse a 24-hour `HH:mm` time field.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    if value.len() != 5 {
        return Err(PeriodError::InvalidDate(format!(
            "'{}' is not an HH:mm time",
            value
        )));
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| PeriodError::InvalidDate(format!("'{}': {}", value, e)))
}

/// Combine a date field and a time field into an instant in `tz`.
///
/// Wall-clock times skipped by a spring-forward transition do not exist and
/// are rejected. Times repeated by a fall-back transition resolve to the
/// earlier instant.
pub fn local_instant(date: &str, time: &str, tz: Tz) -> Result<DateTime<Tz>> {
    let naive = parse_date(date)?.and_time(parse_time(time)?);
    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        PeriodError::InvalidDate(format!("{} {} does not exist in {}", date, time, tz))
    })
}

/// How far before a skipped wall-clock time to look for the offset that was
/// in force ahead of the gap. Longer than any DST shift in the tz database.
const GAP_LOOKBEHIND_HOURS: i64 = 3;

/// Resolve a wall-clock time in `tz` without failing on DST gaps.
///
/// Ambiguous times take the earlier instant. Times inside a spring-forward
/// gap are read with the offset from before the gap, which moves them forward
/// by exactly the length of the gap (02:30 becomes 03:30 across a one-hour
/// shift, 02:15 becomes 02:45 across a half-hour one).
pub fn resolve_wall_clock(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let before = tz
                .from_local_datetime(&(naive - Duration::hours(GAP_LOOKBEHIND_HOURS)))
                .earliest()?;
            let offset = i64::from(before.offset().fix().local_minus_utc());
            Some(tz.from_utc_datetime(&(naive - Duration::seconds(offset))))
        }
    }
}
