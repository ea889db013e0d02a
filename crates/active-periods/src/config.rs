//! Engine configuration: the control centre's local timezone and the
//! occurrence cap enforced by callers before submission.

use chrono_tz::Tz;

use crate::error::{PeriodError, Result};

/// IANA name of the timezone the control centre operates in.
pub const DEFAULT_TIMEZONE: &str = "Pacific/Auckland";

/// Maximum number of active periods a recurring disruption may generate.
pub const DEFAULT_MAX_OCCURRENCES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Timezone whose wall clock recurring occurrences are pinned to.
    pub timezone: Tz,
    pub max_occurrences: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Pacific::Auckland,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl EngineConfig {
    /// Build a config from an IANA timezone name and an occurrence cap.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidTimezone` if `timezone` is not a valid IANA identifier.
    pub fn new(timezone: &str, max_occurrences: usize) -> Result<Self> {
        Ok(Self {
            timezone: parse_timezone(timezone)?,
            max_occurrences,
        })
    }
}

/// Parse an IANA timezone identifier (e.g. "Pacific/Auckland").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| PeriodError::InvalidTimezone(name.to_string()))
}
