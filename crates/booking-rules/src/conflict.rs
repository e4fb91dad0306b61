//! Detect existing reservations that overlap a candidate range.
//!
//! Only active reservations (pending or approved) can block a new booking, so
//! a slot freed by a cancellation or rejection is immediately bookable again.
//! Adjacent reservations (one ends exactly when the other starts) are NOT
//! conflicts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::range::TimeRange;

/// Lifecycle state of a stored reservation.
///
/// Written lowercase; read through [`FromStr`], so `"Approved"` and
/// `" pending "` are accepted wherever a status is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
    Rejected,
}

impl ReservationStatus {
    /// Whether a reservation in this state occupies its time slot.
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Approved)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Approved => write!(f, "approved"),
            ReservationStatus::Completed => write!(f, "completed"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
            ReservationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "approved" => Ok(ReservationStatus::Approved),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            "rejected" => Ok(ReservationStatus::Rejected),
            other => Err(BookingError::InvalidStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = BookingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A reservation already stored for a resource, as fetched by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingReservation {
    pub id: String,
    pub resource_id: String,
    #[serde(flatten)]
    pub range: TimeRange,
    pub status: ReservationStatus,
}

/// Find the active reservations in `existing` that overlap `candidate`.
///
/// Two ranges overlap when `a.start < b.end && b.start < a.end`. The result
/// keeps the relative order of `existing`.
pub fn find_conflicts(
    candidate: &TimeRange,
    existing: &[ExistingReservation],
) -> Vec<ExistingReservation> {
    existing
        .iter()
        .filter(|r| r.status.is_active() && r.range.overlaps(candidate))
        .cloned()
        .collect()
}

/// Like [`find_conflicts`], ignoring reservations of other resources.
pub fn find_conflicts_for(
    resource_id: &str,
    candidate: &TimeRange,
    existing: &[ExistingReservation],
) -> Vec<ExistingReservation> {
    existing
        .iter()
        .filter(|r| {
            r.resource_id == resource_id && r.status.is_active() && r.range.overlaps(candidate)
        })
        .cloned()
        .collect()
}
