//! The `ActivePeriod` interval type.
//!
//! Periods are stored as epoch seconds because that is what the disruption
//! record persists; conversion to `DateTime<Utc>` happens at the edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single contiguous interval during which a disruption is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePeriod {
    /// Unix timestamp (seconds) at which the period begins.
    pub start_time: i64,
    /// Unix timestamp (seconds) at which the period ends. `None` only for a
    /// period that has not ended yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl ActivePeriod {
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time: Some(end_time),
        }
    }

    /// A zero-length period starting and ending at `t`.
    pub fn instant(t: i64) -> Self {
        Self::new(t, t)
    }

    /// Whether `t` falls within `[start_time, end_time]`, both ends inclusive.
    ///
    /// An open-ended period contains every instant from its start onwards.
    pub fn contains(&self, t: i64) -> bool {
        self.start_time <= t && self.end_time.is_none_or(|end| t <= end)
    }

    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start_time, 0)
    }

    pub fn end_utc(&self) -> Option<DateTime<Utc>> {
        self.end_time
            .and_then(|end| DateTime::from_timestamp(end, 0))
    }
}
