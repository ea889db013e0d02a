//! `active-periods` CLI: expand, reconcile and check recurring disruption
//! patterns from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Expand a pattern into active periods (JSON on stdout)
//! active-periods expand -i pattern.json --duration 2
//!
//! # Same, as a local-time table
//! active-periods expand -i pattern.json --duration 2 --table
//!
//! # Reconcile persisted periods after an edit
//! active-periods reconcile -i request.json --now 2022-04-02T03:30:00Z
//!
//! # Check a pattern against the occurrence cap before submitting
//! active-periods check -i pattern.json --max-occurrences 100
//!
//! # Describe a pattern in words
//! active-periods describe -i pattern.json
//! ```
//!
//! The timezone defaults to `Pacific/Auckland` and can be set with
//! `--timezone` or `ACTIVE_PERIODS_TZ`. Logs go to stderr, filtered by `RUST_LOG`.

use std::io::{self, Read};

use active_periods::config::{parse_timezone, DEFAULT_MAX_OCCURRENCES, DEFAULT_TIMEZONE};
use active_periods::display::{describe_pattern, format_period};
use active_periods::validation::{MAX_DURATION_HOURS, MIN_DURATION_HOURS};
use active_periods::{
    check_occurrence_count, count_occurrences, expand_occurrences, reconcile_active_periods,
    ActivePeriod, EngineConfig, RecurrencePattern,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "active-periods",
    version,
    about = "Recurring disruption active-period calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA timezone whose wall clock occurrences are pinned to
    #[arg(long, global = true, env = "ACTIVE_PERIODS_TZ", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Maximum number of active periods a pattern may generate
    #[arg(
        long,
        global = true,
        env = "ACTIVE_PERIODS_MAX_OCCURRENCES",
        default_value_t = DEFAULT_MAX_OCCURRENCES
    )]
    max_occurrences: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a recurrence pattern into active periods
    Expand {
        /// Pattern JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Duration of each occurrence in hours (1-24)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=24))]
        duration: u32,
        /// Print a local-time table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Reconcile persisted active periods with an edited pattern
    Reconcile {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reconcile as of this RFC 3339 instant (overrides the request's `now`)
        #[arg(long)]
        now: Option<String>,
        /// Print a local-time table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Check a pattern generates between 1 and --max-occurrences periods
    Check {
        /// Pattern JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Describe a recurrence pattern in words
    Describe {
        /// Pattern JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// Body of a `reconcile` request, shaped like the disruption record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileRequest {
    pattern: RecurrencePattern,
    duration_hours: u32,
    #[serde(default)]
    active_periods: Vec<ActivePeriod>,
    #[serde(default)]
    is_resolved: bool,
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::new(&cli.timezone, cli.max_occurrences)
        .with_context(|| format!("Unsupported --timezone '{}'", cli.timezone))?;
    debug!(timezone = %config.timezone, max_occurrences = config.max_occurrences, "loaded config");

    match cli.command {
        Commands::Expand {
            input,
            output,
            duration,
            table,
        } => {
            let pattern = read_pattern(input.as_deref())?;
            let periods = expand_occurrences(&pattern, duration, config.timezone)
                .context("Failed to expand recurrence pattern")?;
            write_output(output.as_deref(), &render(&periods, table, &config)?)?;
        }
        Commands::Reconcile {
            input,
            output,
            now,
            table,
        } => {
            let raw = read_input(input.as_deref())?;
            let request: ReconcileRequest =
                serde_json::from_str(&raw).context("Failed to parse reconcile request")?;
            if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&request.duration_hours) {
                anyhow::bail!(
                    "durationHours must be between {} and {}, got {}",
                    MIN_DURATION_HOURS,
                    MAX_DURATION_HOURS,
                    request.duration_hours
                );
            }
            let now = resolve_now(now.as_deref(), request.now)?;
            info!(now = %now.to_rfc3339(), is_resolved = request.is_resolved, "reconciling");

            let periods = reconcile_active_periods(
                &request.pattern,
                request.duration_hours,
                &request.active_periods,
                request.is_resolved,
                now,
                config.timezone,
            )
            .context("Failed to reconcile active periods")?;
            write_output(output.as_deref(), &render(&periods, table, &config)?)?;
        }
        Commands::Check { input } => {
            let pattern = read_pattern(input.as_deref())?;
            let count = count_occurrences(&pattern, config.timezone)
                .context("Recurrence pattern is incomplete")?;
            let check = check_occurrence_count(count, config.max_occurrences);
            if let Some(message) = check.message() {
                anyhow::bail!(message);
            }
            println!("{}", check);
        }
        Commands::Describe { input } => {
            let pattern = read_pattern(input.as_deref())?;
            println!("{}", describe_pattern(&pattern, config.timezone));
        }
    }

    Ok(())
}

/// Pick the reconciliation instant: `--now`, then the request's `now`, then
/// the system clock.
fn resolve_now(flag: Option<&str>, from_request: Option<DateTime<Utc>>) -> Result<DateTime<Utc>> {
    match (flag, from_request) {
        (Some(raw), _) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("Invalid --now '{}', expected RFC 3339", raw)),
        (None, Some(now)) => Ok(now),
        (None, None) => Ok(Utc::now()),
    }
}

fn render(periods: &[ActivePeriod], table: bool, config: &EngineConfig) -> Result<String> {
    if !table {
        return Ok(serde_json::to_string_pretty(periods)?);
    }
    let mut out = format!("{:<18}{}\n", "START", "END");
    for period in periods {
        let (start, end) = format_period(period, config.timezone);
        out.push_str(&format!("{:<18}{}\n", start, end));
    }
    Ok(out)
}

fn read_pattern(path: Option<&str>) -> Result<RecurrencePattern> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse recurrence pattern")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
