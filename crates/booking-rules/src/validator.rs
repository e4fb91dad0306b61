//! Single entry point combining policy, operating hours and conflicts.
//!
//! Every check runs on every call; nothing short-circuits, so the caller can
//! show all problems with a candidate at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::{find_conflicts, find_conflicts_for, ExistingReservation};
use crate::error::Result;
use crate::policy::ReservationPolicyConfig;
use crate::range::TimeRange;
use crate::schedule::OperatingSchedule;
use crate::violation::{Severity, Violation};

/// Outcome of validating one candidate range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// `true` when no blocking violation was found. Warnings do not affect it.
    pub valid: bool,
    /// Violations in check order: policy, operating hours, conflicts.
    pub violations: Vec<Violation>,
    /// Active reservations overlapping the candidate, in snapshot order.
    pub conflicts: Vec<ExistingReservation>,
}

impl ValidationVerdict {
    pub fn blocking(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity() == Severity::Blocking)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity() == Severity::Warning)
    }

    /// Display form for clients: each violation carries its severity and a
    /// human-readable message next to its code and fields.
    pub fn report(&self) -> VerdictReport<'_> {
        VerdictReport {
            valid: self.valid,
            violations: self
                .violations
                .iter()
                .map(|violation| ViolationReport {
                    violation,
                    severity: violation.severity(),
                    message: violation.to_string(),
                })
                .collect(),
            conflicts: &self.conflicts,
        }
    }
}

/// Serializable view of a [`ValidationVerdict`] for UI and API consumers.
#[derive(Debug, Serialize)]
pub struct VerdictReport<'a> {
    pub valid: bool,
    pub violations: Vec<ViolationReport<'a>>,
    pub conflicts: &'a [ExistingReservation],
}

#[derive(Debug, Serialize)]
pub struct ViolationReport<'a> {
    #[serde(flatten)]
    pub violation: &'a Violation,
    pub severity: Severity,
    pub message: String,
}

/// Validator bound to one resource's policy and (optional) schedule.
#[derive(Debug, Clone)]
pub struct ReservationValidator {
    policy: ReservationPolicyConfig,
    schedule: Option<OperatingSchedule>,
    resource_id: Option<String>,
}

impl ReservationValidator {
    /// # Errors
    /// Returns `BookingError::InvalidPolicy` when the policy bounds are invalid.
    pub fn new(policy: ReservationPolicyConfig) -> Result<Self> {
        policy.check()?;
        Ok(Self {
            policy,
            schedule: None,
            resource_id: None,
        })
    }

    /// Enable the operating-hours check. `None` skips it.
    pub fn with_schedule(mut self, schedule: Option<OperatingSchedule>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Only consider existing reservations of `resource_id` for conflicts.
    pub fn for_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn validate(
        &self,
        candidate: &TimeRange,
        existing: &[ExistingReservation],
        now: DateTime<Utc>,
    ) -> ValidationVerdict {
        let mut violations = self.policy.validate(candidate, now);

        if let Some(schedule) = &self.schedule {
            if !schedule.is_within_operating_hours(candidate) {
                violations.push(Violation::OutsideOperatingHours);
            }
        }

        let conflicts = match &self.resource_id {
            Some(resource_id) => find_conflicts_for(resource_id, candidate, existing),
            None => find_conflicts(candidate, existing),
        };
        if !conflicts.is_empty() {
            violations.push(Violation::ScheduleConflict {
                reservation_ids: conflicts.iter().map(|r| r.id.clone()).collect(),
            });
        }

        let valid = !violations.iter().any(Violation::is_blocking);

        debug!(
            start = %candidate.start(),
            end = %candidate.end(),
            resource = self.resource_id.as_deref().unwrap_or("-"),
            valid,
            violations = violations.len(),
            conflicts = conflicts.len(),
            "validated reservation candidate"
        );

        ValidationVerdict {
            valid,
            violations,
            conflicts,
        }
    }
}

/// Validate `candidate` in one call.
///
/// Equivalent to building a [`ReservationValidator`] with `policy` and
/// `schedule` and calling [`ReservationValidator::validate`].
///
/// # Errors
/// Returns `BookingError::InvalidPolicy` when the policy bounds are invalid.
pub fn validate(
    candidate: &TimeRange,
    schedule: Option<&OperatingSchedule>,
    policy: &ReservationPolicyConfig,
    existing: &[ExistingReservation],
    now: DateTime<Utc>,
) -> Result<ValidationVerdict> {
    let validator = ReservationValidator::new(policy.clone())?.with_schedule(schedule.cloned());
    Ok(validator.validate(candidate, existing, now))
}
