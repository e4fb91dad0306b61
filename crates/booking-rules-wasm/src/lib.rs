//! WASM bindings for booking-rules.
//!
//! Exposes reservation validation, conflict detection, and free-slot listing
//! to the web client via `wasm-bindgen`, so the booking form runs the same
//! rules the server re-checks at commit time. All complex types are passed as
//! JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-rules-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_rules_wasm.wasm
//! ```

use booking_rules::{
    ExistingReservation, MalformedSchedule, OperatingSchedule, ReservationPolicyConfig,
    ReservationStatus, ReservationValidator, TimeRange,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Candidate range as entered in the booking form.
#[derive(Deserialize)]
struct RangeInput {
    start: String,
    end: String,
}

/// A stored reservation as returned by the REST API.
///
/// A record without `resource_id` belongs to the resource the request is
/// about.
#[derive(Deserialize)]
struct ReservationInput {
    id: String,
    #[serde(default)]
    resource_id: Option<String>,
    start: String,
    end: String,
    status: String,
}

#[derive(Deserialize)]
struct ValidationRequest {
    #[serde(default)]
    resource_id: Option<String>,
    candidate: RangeInput,
    /// Stored schedule: either the JSON object or the serialized JSON text.
    #[serde(default)]
    schedule: Option<serde_json::Value>,
    #[serde(default)]
    policy: ReservationPolicyConfig,
    #[serde(default)]
    existing: Vec<ReservationInput>,
    #[serde(default)]
    malformed_schedule: MalformedSchedule,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2025-03-01T14:00:00-03:00")
/// and naive local time (e.g., "2025-03-01T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn to_js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_range(input: &RangeInput) -> Result<TimeRange, JsValue> {
    let start = parse_datetime(&input.start)?;
    let end = parse_datetime(&input.end)?;
    TimeRange::new(start, end).map_err(to_js_err)
}

fn convert_reservations(
    inputs: Vec<ReservationInput>,
    owner: Option<&str>,
) -> Result<Vec<ExistingReservation>, JsValue> {
    inputs
        .into_iter()
        .map(|input| {
            let range = parse_range(&RangeInput {
                start: input.start,
                end: input.end,
            })?;
            let status: ReservationStatus = input.status.parse().map_err(to_js_err)?;
            Ok(ExistingReservation {
                id: input.id,
                resource_id: input
                    .resource_id
                    .or_else(|| owner.map(str::to_string))
                    .unwrap_or_default(),
                range,
                status,
            })
        })
        .collect()
}

/// Convert a JSON array of reservation records into `Vec<ExistingReservation>`.
fn parse_reservations_json(json: &str) -> Result<Vec<ExistingReservation>, JsValue> {
    let inputs: Vec<ReservationInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid reservations JSON: {}", e)))?;
    convert_reservations(inputs, None)
}

fn schedule_text(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Validate a candidate reservation and return the verdict as JSON.
///
/// `request_json` is `{resource_id?, candidate: {start, end}, schedule?,
/// policy?, existing?, malformed_schedule?}`. `now` is the client's current
/// time as an ISO 8601 string. Returns `{valid, violations, conflicts}`, each
/// violation carrying `code`, `severity` and `message`.
#[wasm_bindgen(js_name = "validateReservation")]
pub fn validate_reservation(request_json: &str, now: &str) -> Result<String, JsValue> {
    let request: ValidationRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request JSON: {}", e)))?;
    let now = parse_datetime(now)?;

    let candidate = parse_range(&request.candidate)?;
    let existing = convert_reservations(request.existing, request.resource_id.as_deref())?;
    let schedule = OperatingSchedule::from_raw(
        schedule_text(request.schedule).as_deref(),
        request.malformed_schedule,
    );

    let mut validator = ReservationValidator::new(request.policy)
        .map_err(to_js_err)?
        .with_schedule(schedule);
    if let Some(resource_id) = request.resource_id {
        validator = validator.for_resource(resource_id);
    }

    let verdict = validator.validate(&candidate, &existing, now);
    to_json(&verdict.report())
}

/// Find active reservations overlapping a candidate range.
///
/// `candidate_json` is `{start, end}`; `existing_json` is an array of
/// `{id, resource_id, start, end, status}`. Returns the overlapping entries as
/// a JSON array, in input order.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(candidate_json: &str, existing_json: &str) -> Result<String, JsValue> {
    let candidate: RangeInput = serde_json::from_str(candidate_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid candidate JSON: {}", e)))?;
    let candidate = parse_range(&candidate)?;
    let existing = parse_reservations_json(existing_json)?;

    to_json(&booking_rules::find_conflicts(&candidate, &existing))
}

/// List free slots on a local date (`YYYY-MM-DD`) of at least `min_minutes`.
///
/// `schedule_json` is the stored operating schedule; `existing_json` an array
/// of reservations. Returns a JSON array of `{start, end, duration_minutes}`.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots(
    schedule_json: &str,
    date: &str,
    existing_json: &str,
    min_minutes: i32,
) -> Result<String, JsValue> {
    let schedule = OperatingSchedule::from_json(schedule_json).map_err(to_js_err)?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", date, e)))?;
    let existing = parse_reservations_json(existing_json)?;

    let slots = booking_rules::available_slots(&schedule, date, &existing, i64::from(min_minutes));
    to_json(&slots)
}
