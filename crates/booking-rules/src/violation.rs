//! Rule failures reported by the validator, tagged by severity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a violation must prevent submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Submission must be refused.
    Blocking,
    /// Shown to the user; submission is still allowed.
    Warning,
}

/// A single rule failure for a candidate reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Violation {
    /// The candidate starts before `now`.
    PastStartTime,
    /// The candidate starts sooner than the resource's minimum notice.
    LeadTimeNotMet { lead_minutes: u32 },
    /// The candidate is longer than the resource allows.
    DurationExceeded { limit_hours: f64, actual_hours: f64 },
    /// The candidate starts beyond the booking horizon.
    AdvanceWindowExceeded { limit_days: u32 },
    /// The candidate falls (partly) outside the resource's open hours.
    OutsideOperatingHours,
    /// One or more active reservations overlap the candidate.
    ScheduleConflict { reservation_ids: Vec<String> },
}

impl Violation {
    pub fn severity(&self) -> Severity {
        match self {
            Violation::OutsideOperatingHours => Severity::Warning,
            Violation::PastStartTime
            | Violation::LeadTimeNotMet { .. }
            | Violation::DurationExceeded { .. }
            | Violation::AdvanceWindowExceeded { .. }
            | Violation::ScheduleConflict { .. } => Severity::Blocking,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity() == Severity::Blocking
    }

    /// Stable machine-readable code, matching the serialized `code` tag.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::PastStartTime => "past_start_time",
            Violation::LeadTimeNotMet { .. } => "lead_time_not_met",
            Violation::DurationExceeded { .. } => "duration_exceeded",
            Violation::AdvanceWindowExceeded { .. } => "advance_window_exceeded",
            Violation::OutsideOperatingHours => "outside_operating_hours",
            Violation::ScheduleConflict { .. } => "schedule_conflict",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PastStartTime => write!(f, "reservation starts in the past"),
            Violation::LeadTimeNotMet { lead_minutes } => write!(
                f,
                "reservation must be made at least {} minutes in advance",
                lead_minutes
            ),
            Violation::DurationExceeded {
                limit_hours,
                actual_hours,
            } => write!(
                f,
                "reservation lasts {:.2} hours, limit is {} hours",
                actual_hours, limit_hours
            ),
            Violation::AdvanceWindowExceeded { limit_days } => write!(
                f,
                "reservation starts more than {} days ahead",
                limit_days
            ),
            Violation::OutsideOperatingHours => {
                write!(f, "reservation is outside operating hours")
            }
            Violation::ScheduleConflict { reservation_ids } => write!(
                f,
                "reservation conflicts with {} existing reservation(s)",
                reservation_ids.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_operating_hours_is_a_warning() {
        assert_eq!(
            Violation::OutsideOperatingHours.severity(),
            Severity::Warning
        );
        assert!(Violation::PastStartTime.is_blocking());
        assert!(Violation::ScheduleConflict {
            reservation_ids: vec![]
        }
        .is_blocking());
    }

    #[test]
    fn serialized_tag_matches_code() {
        let v = Violation::AdvanceWindowExceeded { limit_days: 30 };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["code"], v.code());
        assert_eq!(json["limit_days"], 30);
    }
}
