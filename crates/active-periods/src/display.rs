//! Human-readable rendering of periods and patterns in local time.

use chrono::{DateTime, Weekday};
use chrono_tz::Tz;

use crate::fields::{DATE_FORMAT, DATE_TIME_FORMAT};
use crate::pattern::RecurrencePattern;
use crate::period::ActivePeriod;

/// Render an epoch-seconds timestamp as `DD/MM/YYYY HH:mm` in `tz`.
///
/// Timestamps outside chrono's representable range render as an empty string.
pub fn format_timestamp(epoch_seconds: i64, tz: Tz) -> String {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|dt| dt.with_timezone(&tz).format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Render a period as a `(start, end)` pair; an open end renders empty.
pub fn format_period(period: &ActivePeriod, tz: Tz) -> (String, String) {
    (
        format_timestamp(period.start_time, tz),
        period
            .end_time
            .map(|end| format_timestamp(end, tz))
            .unwrap_or_default(),
    )
}

fn short_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Describe a pattern, e.g. `Every Mon, Wed, Fri from 31/03/2022 16:00 until 05/04/2022`.
///
/// Missing bounds are left out; an empty or invalid weekday selection is
/// described as such rather than failing.
pub fn describe_pattern(pattern: &RecurrencePattern, tz: Tz) -> String {
    let days = match pattern.weekdays() {
        Ok(days) if days.len() == 7 => "day".to_string(),
        Ok(days) if !days.is_empty() => days
            .into_iter()
            .map(short_name)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return "No weekdays selected".to_string(),
    };

    let mut text = format!("Every {}", days);
    if let Some(dtstart) = pattern.dtstart {
        text.push_str(&format!(
            " from {}",
            dtstart.with_timezone(&tz).format(DATE_TIME_FORMAT)
        ));
    }
    if let Some(until) = pattern.until {
        text.push_str(&format!(
            " until {}",
            until.with_timezone(&tz).format(DATE_FORMAT)
        ));
    }
    text
}
