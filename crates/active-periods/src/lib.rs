//! # active-periods
//!
//! Weekly recurrence expansion and active-period reconciliation for transit
//! service disruptions.
//!
//! A recurring disruption carries a weekly pattern (start, end date, selected
//! weekdays) and a duration in hours. This crate turns that pattern into the
//! concrete intervals ("active periods") the disruption is in effect for, and
//! reconciles them with the periods already persisted when the pattern is
//! edited or the disruption is resolved. Occurrences stay on the same local
//! wall-clock time across daylight-saving changes.
//!
//! Everything here is a pure function of its inputs. The current instant is
//! always a parameter; nothing reads the system clock.
//!
//! ## Modules
//!
//! - [`expander`] — pattern → active periods, DST-stable
//! - [`reconciler`] — splice regenerated periods into persisted history
//! - [`validation`] — form gates and the occurrence-count check
//! - [`pattern`] / [`period`] — the data model
//! - [`fields`] — `DD/MM/YYYY` and `HH:mm` field parsing
//! - [`display`] — local-time rendering of periods and patterns
//! - [`config`] — timezone and occurrence cap
//! - [`error`] — Error types

pub mod config;
pub mod display;
pub mod error;
pub mod expander;
pub mod fields;
pub mod pattern;
pub mod period;
pub mod reconciler;
pub mod validation;

pub use config::EngineConfig;
pub use error::PeriodError;
pub use expander::{count_occurrences, expand_occurrences};
pub use pattern::{Frequency, RecurrencePattern};
pub use period::ActivePeriod;
pub use reconciler::reconcile_active_periods;
pub use validation::{check_occurrence_count, check_occurrences, OccurrenceCheck};
