//! `booking-rules` CLI - validate reservations and list free slots from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a booking request (stdin → stdout), judged against the wall clock
//! cat request.json | booking-rules validate
//!
//! # Validate as of a fixed instant, failing the process when the verdict is invalid
//! booking-rules validate -i request.json --now 2025-02-22T09:00:00Z --exit-code
//!
//! # Free slots of at least 60 minutes on a given local date
//! booking-rules slots -i request.json --date 2025-03-01 --min-minutes 60
//!
//! # Parse and print a stored operating schedule
//! booking-rules check-schedule -i schedule.json
//! ```
//!
//! Set `RUST_LOG=booking_rules=debug` to see per-validation diagnostics on
//! stderr.

use anyhow::{Context, Result};
use booking_rules::{
    available_slots, available_slots_for, ExistingReservation, MalformedSchedule,
    OperatingSchedule, ReservationPolicyConfig, ReservationValidator, TimeRange,
};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Read};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "booking-rules",
    version,
    about = "Reservation rules for shared condominium spaces"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a candidate reservation and print the verdict as JSON
    Validate {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Evaluate as of this RFC 3339 instant instead of the current time
        #[arg(long)]
        now: Option<String>,
        /// Treat an unparseable stored schedule as closed every day
        #[arg(long)]
        strict_schedule: bool,
        /// Exit with status 1 when the verdict is not valid
        #[arg(long)]
        exit_code: bool,
    },
    /// List free slots for a local date as JSON
    Slots {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Local date in the schedule's timezone (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Drop slots shorter than this many minutes
        #[arg(long, default_value_t = 0)]
        min_minutes: i64,
        /// Treat an unparseable stored schedule as closed every day
        #[arg(long)]
        strict_schedule: bool,
    },
    /// Parse an operating schedule and print its weekly table
    CheckSchedule {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// A booking request as sent by the web client or the API server.
#[derive(Debug, Deserialize)]
struct BookingRequest {
    #[serde(default)]
    resource_id: Option<String>,
    #[serde(default)]
    candidate: Option<CandidateInput>,
    /// Stored schedule: either the JSON object or the serialized JSON text.
    #[serde(default)]
    schedule: Option<Value>,
    #[serde(default)]
    policy: ReservationPolicyConfig,
    #[serde(default)]
    existing: Vec<ExistingReservation>,
}

#[derive(Debug, Deserialize)]
struct CandidateInput {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingRequest {
    fn resolve_schedule(&self, strict: bool) -> Option<OperatingSchedule> {
        let fallback = if strict {
            MalformedSchedule::AlwaysClosed
        } else {
            MalformedSchedule::AlwaysOpen
        };
        let raw = match &self.schedule {
            None | Some(Value::Null) => return None,
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        };
        OperatingSchedule::from_raw(Some(&raw), fallback)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            input,
            output,
            now,
            strict_schedule,
            exit_code,
        } => {
            let request = read_request(input.as_deref())?;
            let now = match now.as_deref() {
                Some(raw) => DateTime::parse_from_rfc3339(raw)
                    .with_context(|| format!("Invalid --now instant: {}", raw))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };

            let candidate = request
                .candidate
                .as_ref()
                .context("Request has no candidate")?;
            let candidate =
                TimeRange::new(candidate.start, candidate.end).context("Invalid candidate")?;

            let mut validator = ReservationValidator::new(request.policy.clone())
                .context("Invalid resource policy")?
                .with_schedule(request.resolve_schedule(strict_schedule));
            if let Some(resource_id) = &request.resource_id {
                validator = validator.for_resource(resource_id.clone());
            }

            let verdict = validator.validate(&candidate, &request.existing, now);
            info!(valid = verdict.valid, "verdict computed");

            let pretty = serde_json::to_string_pretty(&verdict.report())?;
            write_output(output.as_deref(), &pretty)?;

            if exit_code && !verdict.valid {
                process::exit(1);
            }
        }
        Commands::Slots {
            input,
            date,
            min_minutes,
            strict_schedule,
        } => {
            let request = read_request(input.as_deref())?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Invalid --date: {}", date))?;
            let schedule = request
                .resolve_schedule(strict_schedule)
                .context("Request has no usable operating schedule")?;

            let slots = match &request.resource_id {
                Some(resource_id) => available_slots_for(
                    resource_id,
                    &schedule,
                    date,
                    &request.existing,
                    min_minutes,
                ),
                None => available_slots(&schedule, date, &request.existing, min_minutes),
            };
            let pretty = serde_json::to_string_pretty(&slots)?;
            write_output(None, &pretty)?;
        }
        Commands::CheckSchedule { input } => {
            let raw = read_input(input.as_deref())?;
            let schedule =
                OperatingSchedule::from_json(&raw).context("Failed to parse operating schedule")?;
            print!("{}", schedule_table(&schedule));
        }
    }

    Ok(())
}

fn schedule_table(schedule: &OperatingSchedule) -> String {
    let mut out = format!("timezone: {}\n", schedule.timezone().name());
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        let hours = match schedule.hours_for(weekday) {
            Some(h) => {
                let close = match h.close() {
                    Some(close) => close.format("%H:%M").to_string(),
                    None => "24:00".to_string(),
                };
                format!("{}-{}", h.open().format("%H:%M"), close)
            }
            None => "closed".to_string(),
        };
        out.push_str(&format!("{}: {}\n", weekday, hours));
    }
    out
}

fn read_request(path: Option<&str>) -> Result<BookingRequest> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse booking request")
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
            println!("{}", content);
        }
    }
    Ok(())
}
