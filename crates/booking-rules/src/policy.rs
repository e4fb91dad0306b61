//! Duration and advance-notice constraints for a resource.
//!
//! The policy never reads a clock: `now` is always passed in by the caller.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::range::TimeRange;
use crate::violation::Violation;

/// Booking limits configured on a resource. Unset bounds are unlimited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationPolicyConfig {
    /// Longest allowed reservation, in hours.
    #[serde(alias = "max_booking_hours")]
    pub max_duration_hours: Option<f64>,
    /// How many days ahead a reservation may start.
    pub advance_booking_days: Option<u32>,
    /// Minimum notice between `now` and the start of a reservation.
    pub min_lead_minutes: u32,
}

impl ReservationPolicyConfig {
    /// # Errors
    /// Returns `BookingError::InvalidPolicy` when `max_duration_hours` is set
    /// but not a positive, finite number.
    pub fn check(&self) -> Result<()> {
        if let Some(hours) = self.max_duration_hours {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(BookingError::InvalidPolicy(format!(
                    "max_duration_hours must be positive, got {}",
                    hours
                )));
            }
        }
        Ok(())
    }

    /// Check `range` against every bound, collecting all failures.
    ///
    /// A candidate in the past gets `PastStartTime` only; the lead-time check
    /// is reserved for future starts that come too soon.
    pub fn validate(&self, range: &TimeRange, now: DateTime<Utc>) -> Vec<Violation> {
        let mut violations = Vec::new();

        if range.start() < now {
            violations.push(Violation::PastStartTime);
        } else if self.min_lead_minutes > 0
            && range.start() < now + Duration::minutes(i64::from(self.min_lead_minutes))
        {
            violations.push(Violation::LeadTimeNotMet {
                lead_minutes: self.min_lead_minutes,
            });
        }

        if let Some(limit_hours) = self.max_duration_hours {
            let actual_hours = range.duration_hours();
            if actual_hours > limit_hours {
                violations.push(Violation::DurationExceeded {
                    limit_hours,
                    actual_hours,
                });
            }
        }

        if let Some(limit_days) = self.advance_booking_days {
            if range.start() > now + Duration::days(i64::from(limit_days)) {
                violations.push(Violation::AdvanceWindowExceeded { limit_days });
            }
        }

        violations
    }
}
