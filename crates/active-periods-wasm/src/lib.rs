//! WASM bindings for active-periods.
//!
//! Exposes recurrence expansion, reconciliation and the occurrence-count
//! check to the control-centre front end via `wasm-bindgen`. All structured
//! values cross the boundary as JSON strings in the shape the disruption
//! record already uses (`startTime`/`endTime` epoch seconds, `byweekday`
//! 0 = Monday).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p active-periods-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/active-periods-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/active_periods_wasm.wasm
//! ```

use active_periods::config::parse_timezone;
use active_periods::display::describe_pattern as describe;
use active_periods::{
    check_occurrences as check, expand_occurrences as expand, reconcile_active_periods,
    ActivePeriod, OccurrenceCheck, RecurrencePattern,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for `reconcileActivePeriods`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileInput {
    pattern: RecurrencePattern,
    duration_hours: u32,
    #[serde(default)]
    active_periods: Vec<ActivePeriod>,
    #[serde(default)]
    is_resolved: bool,
    /// The caller's current instant; the engine never reads a clock.
    now: DateTime<Utc>,
}

#[derive(Serialize)]
struct CheckDto {
    valid: bool,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckDto {
    fn new(check: OccurrenceCheck, count: usize) -> Self {
        Self {
            valid: check.is_valid(),
            count,
            message: check.message(),
        }
    }
}

// ---------------------------------------------------------------------------
// Core logic, kept free of `JsValue` so it runs natively under `cargo test`
// ---------------------------------------------------------------------------

fn parse_pattern(json: &str) -> Result<RecurrencePattern, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid pattern JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn expand_json(pattern_json: &str, duration_hours: u32, timezone: &str) -> Result<String, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let pattern = parse_pattern(pattern_json)?;
    let periods = expand(&pattern, duration_hours, tz).map_err(|e| e.to_string())?;
    to_json(&periods)
}

fn reconcile_json(request_json: &str, timezone: &str) -> Result<String, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let input: ReconcileInput = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid reconcile request JSON: {}", e))?;
    let periods = reconcile_active_periods(
        &input.pattern,
        input.duration_hours,
        &input.active_periods,
        input.is_resolved,
        input.now,
        tz,
    )
    .map_err(|e| e.to_string())?;
    to_json(&periods)
}

fn check_json(
    pattern_json: &str,
    duration_hours: u32,
    timezone: &str,
    max_occurrences: usize,
) -> Result<String, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let pattern = parse_pattern(pattern_json)?;
    let periods = expand(&pattern, duration_hours, tz).map_err(|e| e.to_string())?;
    to_json(&CheckDto::new(check(&periods, max_occurrences), periods.len()))
}

fn describe_json(pattern_json: &str, timezone: &str) -> Result<String, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    Ok(describe(&parse_pattern(pattern_json)?, tz))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand a recurrence pattern into active periods.
///
/// Returns a JSON array of `{startTime, endTime}` objects (epoch seconds).
///
/// # Arguments
/// - `pattern_json` -- `{freq, dtstart, until, byweekday}` with RFC 3339 instants
/// - `duration_hours` -- Duration of each occurrence in hours
/// - `timezone` -- IANA timezone (e.g., "Pacific/Auckland")
#[wasm_bindgen(js_name = "expandOccurrences")]
pub fn expand_occurrences(
    pattern_json: &str,
    duration_hours: u32,
    timezone: &str,
) -> Result<String, JsValue> {
    expand_json(pattern_json, duration_hours, timezone).map_err(|e| JsValue::from_str(&e))
}

/// Reconcile persisted active periods with an edited pattern.
///
/// `request_json` is `{pattern, durationHours, activePeriods, isResolved, now}`
/// where `now` is an RFC 3339 instant supplied by the caller.
#[wasm_bindgen(js_name = "reconcileActivePeriods")]
pub fn reconcile(request_json: &str, timezone: &str) -> Result<String, JsValue> {
    reconcile_json(request_json, timezone).map_err(|e| JsValue::from_str(&e))
}

/// Check the number of periods a pattern generates against `max_occurrences`.
///
/// Returns `{valid, count, message?}`; `message` is the text to show when
/// submission must be blocked.
#[wasm_bindgen(js_name = "checkOccurrences")]
pub fn check_occurrences(
    pattern_json: &str,
    duration_hours: u32,
    timezone: &str,
    max_occurrences: usize,
) -> Result<String, JsValue> {
    check_json(pattern_json, duration_hours, timezone, max_occurrences)
        .map_err(|e| JsValue::from_str(&e))
}

/// Describe a recurrence pattern in words, in local time.
#[wasm_bindgen(js_name = "describePattern")]
pub fn describe_pattern(pattern_json: &str, timezone: &str) -> Result<String, JsValue> {
    describe_json(pattern_json, timezone).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERN: &str = r#"{"freq":"WEEKLY","dtstart":"2022-03-31T03:00:00.000Z","until":"2022-04-05T04:00:00.000Z","byweekday":[0,1,2,3,4,5,6]}"#;

    #[test]
    fn expands_to_epoch_second_periods() {
        let json = expand_json(PATTERN, 1, "Pacific/Auckland").unwrap();
        let periods: Vec<ActivePeriod> = serde_json::from_str(&json).unwrap();

        assert_eq!(periods.len(), 6);
        assert_eq!(periods[0], ActivePeriod::new(1648695600, 1648699200));
        assert_eq!(periods[5], ActivePeriod::new(1649131200, 1649134800));
    }

    #[test]
    fn reconciles_with_caller_supplied_now() {
        let request = format!(
            r#"{{"pattern":{},"durationHours":1,"activePeriods":[],"isResolved":true,"now":"2022-03-01T00:00:00Z"}}"#,
            PATTERN
        );

        let json = reconcile_json(&request, "Pacific/Auckland").unwrap();

        assert_eq!(json, r#"[{"startTime":1646092800,"endTime":1646092800}]"#);
    }

    #[test]
    fn check_reports_cap() {
        let json = check_json(PATTERN, 1, "Pacific/Auckland", 5).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["valid"], false);
        assert_eq!(value["count"], 6);
        assert!(value["message"].as_str().unwrap().contains("is 5"));
    }

    #[test]
    fn describes_pattern() {
        assert_eq!(
            describe_json(PATTERN, "Pacific/Auckland").unwrap(),
            "Every day from 31/03/2022 16:00 until 05/04/2022"
        );
    }

    #[test]
    fn bad_timezone_and_json_are_errors() {
        assert!(expand_json(PATTERN, 1, "Mars/Olympus_Mons")
            .unwrap_err()
            .contains("Invalid timezone"));
        assert!(expand_json("{not json", 1, "UTC")
            .unwrap_err()
            .contains("Invalid pattern JSON"));
    }
}
