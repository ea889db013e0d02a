//! Error types for active-period operations.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PeriodError {
    /// The recurrence pattern is incomplete or contradictory.
    #[error("Invalid recurrence pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A form date/time field did not parse or does not exist in the timezone.
    #[error("Invalid date/time: {0}")]
    InvalidDate(String),

    #[error("Expansion error: {0}")]
    Expansion(String),
}

pub type Result<T> = std::result::Result<T, PeriodError>;
