//! Error types for booking-rules operations.
//!
//! Only malformed inputs are errors. Rule failures on a well-formed candidate
//! are reported as [`Violation`](crate::violation::Violation)s in the verdict.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid range: start {start} is not before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid reservation status: {0}")]
    InvalidStatus(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BookingError>;
