//! Integration tests for the `booking-rules` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the validate,
//! slots and check-schedule subcommands through the actual binary, including
//! stdin/stdout piping, file I/O and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const NOW: &str = "2025-02-22T09:00:00Z";

/// Helper: absolute path to a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: run a subcommand and parse its stdout as JSON.
fn run_json(args: &[&str]) -> Value {
    let output = Command::cargo_bin("booking-rules")
        .unwrap()
        .args(args)
        .output()
        .expect("binary should run");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// validate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_reports_conflict() {
    let path = fixture("conflict_request.json");
    let verdict = run_json(&["validate", "-i", &path, "--now", NOW]);

    assert_eq!(verdict["valid"], false);
    let violations = verdict["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["code"], "schedule_conflict");
    assert_eq!(violations[0]["severity"], "blocking");
    assert_eq!(violations[0]["reservation_ids"][0], "rsv-42");
    assert!(violations[0]["message"].as_str().unwrap().contains("conflicts"));

    // The cancelled reservation does not appear.
    let conflicts = verdict["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["id"], "rsv-42");
}

#[test]
fn validate_accepts_back_to_back_booking() {
    // Schedule stored as serialized JSON text, as the API keeps it.
    let path = fixture("valid_request.json");
    let verdict = run_json(&["validate", "-i", &path, "--now", NOW]);

    assert_eq!(verdict["valid"], true);
    assert!(verdict["violations"].as_array().unwrap().is_empty());
    assert!(verdict["conflicts"].as_array().unwrap().is_empty());
}

#[test]
fn validate_reads_stdin() {
    let input = std::fs::read_to_string(fixture("conflict_request.json")).unwrap();

    Command::cargo_bin("booking-rules")
        .unwrap()
        .args(["validate", "--now", NOW])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": false"));
}

#[test]
fn validate_writes_output_file() {
    let output_path = "/tmp/booking-rules-test-verdict.json";
    let _ = std::fs::remove_file(output_path);

    Command::cargo_bin("booking-rules")
        .unwrap()
        .args([
            "validate",
            "-i",
            &fixture("valid_request.json"),
            "-o",
            output_path,
            "--now",
            NOW,
        ])
        .assert()
        .success();

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    let verdict: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(verdict["valid"], true);

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn exit_code_flag_fails_on_invalid_verdict() {
    Command::cargo_bin("booking-rules")
        .unwrap()
        .args([
            "validate",
            "-i",
            &fixture("conflict_request.json"),
            "--now",
            NOW,
            "--exit-code",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("schedule_conflict"));
}

#[test]
fn malformed_schedule_is_skipped_by_default() {
    let path = fixture("malformed_schedule_request.json");
    let verdict = run_json(&["validate", "-i", &path, "--now", NOW]);

    assert_eq!(verdict["valid"], true);
    assert!(verdict["violations"].as_array().unwrap().is_empty());
}

#[test]
fn strict_schedule_turns_malformed_data_into_warning() {
    let path = fixture("malformed_schedule_request.json");
    let verdict = run_json(&["validate", "-i", &path, "--now", NOW, "--strict-schedule"]);

    assert_eq!(verdict["valid"], true);
    assert_eq!(verdict["violations"][0]["code"], "outside_operating_hours");
    assert_eq!(verdict["violations"][0]["severity"], "warning");
}

#[test]
fn validate_scopes_to_resource_and_reads_capitalized_status() {
    let path = fixture("mixed_resources_request.json");
    let verdict = run_json(&["validate", "-i", &path, "--now", NOW]);

    assert_eq!(verdict["valid"], true);
    assert!(verdict["conflicts"].as_array().unwrap().is_empty());
}

#[test]
fn past_booking_is_invalid() {
    let path = fixture("valid_request.json");
    let verdict = run_json(&["validate", "-i", &path, "--now", "2025-03-02T00:00:00Z"]);

    assert_eq!(verdict["valid"], false);
    assert_eq!(verdict["violations"][0]["code"], "past_start_time");
}

#[test]
fn inverted_candidate_range_fails() {
    let input = r#"{"candidate":{"start":"2025-03-01T12:00:00Z","end":"2025-03-01T10:00:00Z"}}"#;

    Command::cargo_bin("booking-rules")
        .unwrap()
        .args(["validate", "--now", NOW])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid candidate"));
}

#[test]
fn invalid_json_request_fails() {
    Command::cargo_bin("booking-rules")
        .unwrap()
        .arg("validate")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse booking request"));
}

#[test]
fn invalid_now_fails() {
    Command::cargo_bin("booking-rules")
        .unwrap()
        .args([
            "validate",
            "-i",
            &fixture("valid_request.json"),
            "--now",
            "yesterday",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --now"));
}

#[test]
fn missing_input_file_fails() {
    Command::cargo_bin("booking-rules")
        .unwrap()
        .args(["validate", "-i", "/tmp/definitely-not-a-real-request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// slots
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_lists_gaps_around_active_reservations() {
    let path = fixture("conflict_request.json");
    let slots = run_json(&["slots", "-i", &path, "--date", "2025-03-01"]);

    let slots = slots.as_array().unwrap();
    // Open 08:00-22:00, approved 14:00-16:00, cancelled one ignored.
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["start"], "2025-03-01T08:00:00Z");
    assert_eq!(slots[0]["duration_minutes"], 360);
    assert_eq!(slots[1]["start"], "2025-03-01T16:00:00Z");
    assert_eq!(slots[1]["end"], "2025-03-01T22:00:00Z");
}

#[test]
fn slots_only_count_the_requested_resource() {
    let path = fixture("mixed_resources_request.json");
    let slots = run_json(&["slots", "-i", &path, "--date", "2025-03-01"]);

    let slots = slots.as_array().unwrap();
    // The gym's 10:00-12:00 booking leaves the party room free.
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["start"], "2025-03-01T08:00:00Z");
    assert_eq!(slots[0]["end"], "2025-03-01T14:00:00Z");
    assert_eq!(slots[1]["start"], "2025-03-01T15:00:00Z");
    assert_eq!(slots[1]["end"], "2025-03-01T17:00:00Z");
}

#[test]
fn slots_on_closed_day_is_empty() {
    let path = fixture("conflict_request.json");
    let slots = run_json(&["slots", "-i", &path, "--date", "2025-03-02"]);
    assert!(slots.as_array().unwrap().is_empty());
}

#[test]
fn slots_without_schedule_fails() {
    let path = fixture("malformed_schedule_request.json");

    Command::cargo_bin("booking-rules")
        .unwrap()
        .args(["slots", "-i", &path, "--date", "2025-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no usable operating schedule"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check-schedule
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_schedule_prints_weekly_table() {
    Command::cargo_bin("booking-rules")
        .unwrap()
        .args(["check-schedule", "-i", &fixture("schedule.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("timezone: America/Sao_Paulo"))
        .stdout(predicate::str::contains("Mon: 08:00-22:00"))
        .stdout(predicate::str::contains("Sat: 10:00-18:30"))
        .stdout(predicate::str::contains("Sun: closed"))
        .stdout(predicate::str::contains("Tue: closed"));
}

#[test]
fn check_schedule_shows_midnight_close() {
    Command::cargo_bin("booking-rules")
        .unwrap()
        .arg("check-schedule")
        .write_stdin(r#"{"friday":{"open":"00:00","close":"24:00"}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fri: 00:00-24:00"));
}

#[test]
fn check_schedule_rejects_inverted_hours() {
    Command::cargo_bin("booking-rules")
        .unwrap()
        .arg("check-schedule")
        .write_stdin(r#"{"monday":{"open":"22:00","close":"08:00"}}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse operating schedule"));
}
