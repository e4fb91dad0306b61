//! Tests for conflict detection against existing reservations.

use booking_rules::{
    find_conflicts, find_conflicts_for, ExistingReservation, ReservationStatus, TimeRange,
};
use chrono::{TimeZone, Utc};

/// Helper to create a TimeRange from hour ranges on 2025-03-01.
fn range(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> TimeRange {
    TimeRange::new(
        Utc.with_ymd_and_hms(2025, 3, 1, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 1, end_hour, end_min, 0)
            .unwrap(),
    )
    .unwrap()
}

fn reservation(id: &str, range: TimeRange, status: ReservationStatus) -> ExistingReservation {
    ExistingReservation {
        id: id.to_string(),
        resource_id: "party-room".to_string(),
        range,
        status,
    }
}

#[test]
fn overlapping_approved_reservation_is_a_conflict() {
    let existing = vec![reservation("a", range(14, 0, 16, 0), ReservationStatus::Approved)];
    let conflicts = find_conflicts(&range(15, 0, 17, 0), &existing);
    assert_eq!(conflicts, existing);
}

#[test]
fn pending_reservation_blocks_too() {
    let existing = vec![reservation("a", range(14, 0, 16, 0), ReservationStatus::Pending)];
    assert_eq!(find_conflicts(&range(15, 0, 17, 0), &existing).len(), 1);
}

#[test]
fn adjacent_reservation_not_a_conflict() {
    // Existing 14:00-16:00, candidate 16:00-18:00 → back-to-back
    let existing = vec![reservation("a", range(14, 0, 16, 0), ReservationStatus::Approved)];
    assert!(find_conflicts(&range(16, 0, 18, 0), &existing).is_empty());
    // And the other side: candidate 12:00-14:00
    assert!(find_conflicts(&range(12, 0, 14, 0), &existing).is_empty());
}

#[test]
fn terminal_statuses_never_conflict() {
    let existing = vec![
        reservation("c", range(14, 0, 16, 0), ReservationStatus::Cancelled),
        reservation("r", range(14, 0, 16, 0), ReservationStatus::Rejected),
        reservation("d", range(14, 0, 16, 0), ReservationStatus::Completed),
    ];
    assert!(find_conflicts(&range(14, 0, 16, 0), &existing).is_empty());
}

#[test]
fn conflicts_keep_snapshot_order() {
    let existing = vec![
        reservation("late", range(17, 0, 18, 0), ReservationStatus::Pending),
        reservation("free", range(9, 0, 10, 0), ReservationStatus::Approved),
        reservation("early", range(12, 0, 13, 0), ReservationStatus::Approved),
        reservation("gone", range(12, 0, 18, 0), ReservationStatus::Cancelled),
    ];
    let ids: Vec<String> = find_conflicts(&range(11, 0, 17, 30), &existing)
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["late", "early"]);
}

#[test]
fn empty_snapshot_no_conflicts() {
    assert!(find_conflicts(&range(9, 0, 10, 0), &[]).is_empty());
}

#[test]
fn other_resources_ignored_when_scoped() {
    let mut gym = reservation("g", range(14, 0, 16, 0), ReservationStatus::Approved);
    gym.resource_id = "gym".to_string();
    let room = reservation("p", range(15, 0, 16, 0), ReservationStatus::Approved);
    let existing = vec![gym, room];

    let conflicts = find_conflicts_for("party-room", &range(14, 0, 16, 0), &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].id, "p");

    // Unscoped detection sees both.
    assert_eq!(find_conflicts(&range(14, 0, 16, 0), &existing).len(), 2);
}
