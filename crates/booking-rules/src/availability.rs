//! Free bookable slots of a resource on a given day.
//!
//! The day's open window (from the operating schedule) minus the active
//! reservations. Busy periods are clipped to the window, sorted, and merged
//! when they overlap or touch; the gaps between them are the free slots.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::ExistingReservation;
use crate::range::TimeRange;
use crate::schedule::OperatingSchedule;

/// A free time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Merge overlapping or adjacent busy ranges, clipped to `window`.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
fn merge_busy_periods(
    busy: &[TimeRange],
    window: &TimeRange,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = busy
        .iter()
        .filter(|r| r.overlaps(window))
        .map(|r| (r.start().max(window.start()), r.end().min(window.end())))
        .collect();

    intervals.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Gaps between `busy` ranges within `window`, sorted by start time.
pub fn find_free_slots(busy: &[TimeRange], window: &TimeRange) -> Vec<FreeSlot> {
    let mut free_slots = Vec::new();
    let mut cursor = window.start();

    for (busy_start, busy_end) in merge_busy_periods(busy, window) {
        if cursor < busy_start {
            free_slots.push(FreeSlot::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window.end() {
        free_slots.push(FreeSlot::new(cursor, window.end()));
    }

    free_slots
}

/// Free slots of at least `min_duration_minutes` on local date `date`.
///
/// Only active reservations occupy time. A closed day yields no slots.
pub fn available_slots(
    schedule: &OperatingSchedule,
    date: NaiveDate,
    existing: &[ExistingReservation],
    min_duration_minutes: i64,
) -> Vec<FreeSlot> {
    slots_excluding(
        schedule,
        date,
        existing.iter().filter(|r| r.status.is_active()),
        min_duration_minutes,
    )
}

/// Like [`available_slots`], ignoring reservations of other resources.
pub fn available_slots_for(
    resource_id: &str,
    schedule: &OperatingSchedule,
    date: NaiveDate,
    existing: &[ExistingReservation],
    min_duration_minutes: i64,
) -> Vec<FreeSlot> {
    slots_excluding(
        schedule,
        date,
        existing
            .iter()
            .filter(|r| r.resource_id == resource_id && r.status.is_active()),
        min_duration_minutes,
    )
}

fn slots_excluding<'a>(
    schedule: &OperatingSchedule,
    date: NaiveDate,
    busy: impl Iterator<Item = &'a ExistingReservation>,
    min_duration_minutes: i64,
) -> Vec<FreeSlot> {
    let Some(window) = schedule.open_window(date) else {
        return Vec::new();
    };

    let busy: Vec<TimeRange> = busy.map(|r| r.range).collect();

    find_free_slots(&busy, &window)
        .into_iter()
        .filter(|slot| slot.duration_minutes >= min_duration_minutes)
        .collect()
}
