//! Tests for half-open time ranges.

use booking_rules::{BookingError, TimeRange};
use chrono::{TimeZone, Utc};

/// Helper to create a TimeRange from hour/minute bounds on a given day.
fn range(day: u32, start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> TimeRange {
    TimeRange::new(
        Utc.with_ymd_and_hms(2025, 1, day, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2025, 1, day, end_hour, end_min, 0)
            .unwrap(),
    )
    .unwrap()
}

#[test]
fn negative_duration_is_invalid_range() {
    let result = TimeRange::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 1, 11, 0, 0).unwrap(),
    );
    assert!(matches!(result, Err(BookingError::InvalidRange { .. })));
}

#[test]
fn duration_hours_four_hour_booking() {
    // 2025-01-01T10:00 → 14:00 is exactly 4 hours
    assert_eq!(range(1, 10, 0, 14, 0).duration_hours(), 4.0);
}

#[test]
fn duration_hours_is_fractional() {
    assert_eq!(range(1, 10, 0, 11, 30).duration_hours(), 1.5);
    assert_eq!(range(1, 10, 0, 10, 15).duration_hours(), 0.25);
}

#[test]
fn back_to_back_ranges_do_not_overlap() {
    // [10:00, 11:00) and [11:00, 12:00)
    let a = range(1, 10, 0, 11, 0);
    let b = range(1, 11, 0, 12, 0);
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
}

#[test]
fn partial_overlap_detected_both_ways() {
    let a = range(1, 9, 0, 10, 0);
    let b = range(1, 9, 30, 10, 30);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    assert_eq!(a.overlap_minutes(&b), 30);
}

#[test]
fn range_overlaps_itself() {
    let a = range(1, 9, 0, 10, 0);
    assert!(a.overlaps(&a));
    assert_eq!(a.overlap_minutes(&a), 60);
}

#[test]
fn fully_contained_range() {
    let outer = range(1, 9, 0, 12, 0);
    let inner = range(1, 10, 0, 11, 0);
    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
    assert!(outer.overlaps(&inner));
    assert_eq!(outer.overlap_minutes(&inner), 60);
}

#[test]
fn disjoint_ranges_share_zero_minutes() {
    let a = range(1, 9, 0, 10, 0);
    let b = range(2, 9, 0, 10, 0);
    assert!(!a.overlaps(&b));
    assert_eq!(a.overlap_minutes(&b), 0);
}
