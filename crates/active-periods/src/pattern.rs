//! Weekly recurrence patterns as persisted on a disruption record.

use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};
use crate::fields;

/// Recurrence frequency. Only weekly rules are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    #[serde(rename = "WEEKLY", alias = "weekly")]
    Weekly,
}

/// A weekly-by-weekday rule bounded by `dtstart` and `until` (both inclusive).
///
/// `byweekday` uses 0 = Monday … 6 = Sunday. `dtstart` and `until` are
/// absolute instants; expansion pins every occurrence to the local
/// time-of-day of `dtstart` in the configured timezone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecurrencePattern {
    #[serde(default)]
    pub freq: Frequency,
    #[serde(default)]
    pub dtstart: Option<DateTime<Utc>>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub byweekday: Vec<u8>,
}

/// Map a weekday index (0 = Monday … 6 = Sunday) to a chrono `Weekday`.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

impl RecurrencePattern {
    pub fn weekly(dtstart: DateTime<Utc>, until: DateTime<Utc>, byweekday: Vec<u8>) -> Self {
        Self {
            freq: Frequency::Weekly,
            dtstart: Some(dtstart),
            until: Some(until),
            byweekday,
        }
    }

    /// Build a pattern from the recurrence form fields.
    ///
    /// `dtstart` is the start date at the start time. `until` is the END date
    /// at the START time, so an occurrence may still begin on the end date.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidDate` if a field does not parse or the
    /// start wall-clock time does not exist in `tz`.
    pub fn from_local_fields(
        start_date: &str,
        start_time: &str,
        end_date: &str,
        byweekday: Vec<u8>,
        tz: Tz,
    ) -> Result<Self> {
        let dtstart = fields::local_instant(start_date, start_time, tz)?;
        let until_naive = fields::parse_date(end_date)?.and_time(fields::parse_time(start_time)?);
        let until = fields::resolve_wall_clock(tz, until_naive).ok_or_else(|| {
            PeriodError::InvalidDate(format!(
                "{} {} cannot be resolved in {}",
                end_date, start_time, tz
            ))
        })?;

        Ok(Self::weekly(
            dtstart.with_timezone(&Utc),
            until.with_timezone(&Utc),
            byweekday,
        ))
    }

    /// The selected weekdays, ascending from Monday and without duplicates.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidPattern` for an index outside 0..=6.
    pub fn weekdays(&self) -> Result<Vec<Weekday>> {
        let mut indices = self.byweekday.clone();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|i| {
                weekday_from_index(i).ok_or_else(|| {
                    PeriodError::InvalidPattern(format!("weekday index {} is outside 0..=6", i))
                })
            })
            .collect()
    }

    /// Check that the pattern can be expanded, returning its bounds.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidPattern` when `dtstart` or `until` is
    /// missing, no weekday is selected, a weekday index is out of range, or
    /// `dtstart` is after `until`.
    pub fn validate(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let dtstart = self
            .dtstart
            .ok_or_else(|| PeriodError::InvalidPattern("missing dtstart".to_string()))?;
        let until = self
            .until
            .ok_or_else(|| PeriodError::InvalidPattern("missing until".to_string()))?;
        if self.byweekday.is_empty() {
            return Err(PeriodError::InvalidPattern("no weekday selected".to_string()));
        }
        self.weekdays()?;
        if dtstart > until {
            return Err(PeriodError::InvalidPattern(format!(
                "dtstart {} is after until {}",
                dtstart.to_rfc3339(),
                until.to_rfc3339()
            )));
        }
        Ok((dtstart, until))
    }

    /// Whether every field needed for expansion is present and consistent.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}
