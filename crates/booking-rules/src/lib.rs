//! # booking-rules
//!
//! Deterministic validation of common-area reservations for condominium
//! management.
//!
//! Given a candidate time range, a resource's booking policy and operating
//! schedule, and a snapshot of the resource's existing reservations, the
//! validator returns one verdict listing every rule the candidate breaks.
//! Nothing here reads a clock or performs I/O: `now` and the snapshot are
//! always supplied by the caller.
//!
//! ## Modules
//!
//! - [`range`] - Half-open `[start, end)` time ranges
//! - [`schedule`] - Weekly operating hours in a resource timezone
//! - [`policy`] - Duration, lead-time and advance-window limits
//! - [`conflict`] - Overlap detection against active reservations
//! - [`validator`] - Combined verdict with blocking/warning violations
//! - [`availability`] - Free bookable slots for a day
//! - [`violation`] - Violation codes and severities
//! - [`error`] - Error types

pub mod availability;
pub mod conflict;
pub mod error;
pub mod policy;
pub mod range;
pub mod schedule;
pub mod validator;
pub mod violation;

pub use availability::{available_slots, available_slots_for, find_free_slots, FreeSlot};
pub use conflict::{find_conflicts, find_conflicts_for, ExistingReservation, ReservationStatus};
pub use error::BookingError;
pub use policy::ReservationPolicyConfig;
pub use range::TimeRange;
pub use schedule::{DayHours, MalformedSchedule, OperatingSchedule};
pub use validator::{
    validate, ReservationValidator, ValidationVerdict, VerdictReport, ViolationReport,
};
pub use violation::{Severity, Violation};
