//! Weekly operating hours for a bookable resource.
//!
//! Each weekday is either closed or open between two local times on the same
//! day (no overnight wraparound). Weekday and time-of-day are derived in the
//! schedule's IANA timezone, so a resource in `America/Sao_Paulo` is judged by
//! São Paulo wall-clock time regardless of the UTC instants it is given.
//!
//! The stored form is the JSON object the REST API keeps on the resource:
//!
//! ```json
//! {
//!   "timezone": "America/Sao_Paulo",
//!   "monday": { "open": "08:00", "close": "22:00", "closed": false },
//!   "sunday": { "closed": true }
//! }
//! ```
//!
//! A missing weekday key means the resource is closed that day. A close time
//! of `"24:00"` keeps the resource open until the end of the local day.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BookingError, Result};
use crate::range::TimeRange;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Opening and closing time for one open day. `open < close` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayHours {
    open: NaiveTime,
    /// `None` closes at midnight ending the day.
    close: Option<NaiveTime>,
}

impl DayHours {
    /// # Errors
    /// Returns `BookingError::InvalidSchedule` when `open >= close`.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self> {
        if open >= close {
            return Err(BookingError::InvalidSchedule(format!(
                "open time {} is not before close time {}",
                open, close
            )));
        }
        Ok(Self {
            open,
            close: Some(close),
        })
    }

    /// Open from `open` until the end of the local day (`"24:00"`).
    pub fn until_midnight(open: NaiveTime) -> Self {
        Self { open, close: None }
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    /// Closing time, or `None` when the day runs until midnight.
    pub fn close(&self) -> Option<NaiveTime> {
        self.close
    }
}

/// What to do when a resource's stored schedule cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedSchedule {
    /// Skip the operating-hours check entirely.
    #[default]
    AlwaysOpen,
    /// Treat every weekday as closed, so every candidate gets the
    /// operating-hours warning.
    AlwaysClosed,
}

/// Per-weekday open hours in a fixed timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule", into = "RawSchedule")]
pub struct OperatingSchedule {
    timezone: Tz,
    /// Indexed by `Weekday::num_days_from_monday`. `None` is closed.
    days: [Option<DayHours>; 7],
}

impl OperatingSchedule {
    /// A schedule in `timezone` with every day closed. Open days are added
    /// with [`with_day`](Self::with_day).
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            days: [None; 7],
        }
    }

    /// The same hours on all seven days.
    pub fn every_day(timezone: Tz, hours: DayHours) -> Self {
        Self {
            timezone,
            days: [Some(hours); 7],
        }
    }

    pub fn with_day(mut self, weekday: Weekday, hours: DayHours) -> Self {
        self.days[weekday.num_days_from_monday() as usize] = Some(hours);
        self
    }

    pub fn closed_on(mut self, weekday: Weekday) -> Self {
        self.days[weekday.num_days_from_monday() as usize] = None;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Open hours for `weekday`, or `None` when closed.
    pub fn hours_for(&self, weekday: Weekday) -> Option<&DayHours> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }

    /// Parse the stored JSON form.
    ///
    /// # Errors
    /// `Json` for malformed JSON, `InvalidTimezone` for an unknown IANA name,
    /// `InvalidSchedule` for unparseable times or `open >= close`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSchedule = serde_json::from_str(json)?;
        raw.try_into()
    }

    /// Resolve a resource's stored schedule, applying `fallback` when the
    /// data is present but unusable.
    ///
    /// Returns `None` when the operating-hours check should be skipped: no
    /// schedule stored, or malformed data under
    /// [`MalformedSchedule::AlwaysOpen`].
    pub fn from_raw(raw: Option<&str>, fallback: MalformedSchedule) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
        match Self::from_json(raw) {
            Ok(schedule) => Some(schedule),
            Err(e) => {
                warn!(error = %e, ?fallback, "ignoring malformed operating schedule");
                match fallback {
                    MalformedSchedule::AlwaysOpen => None,
                    MalformedSchedule::AlwaysClosed => Some(Self::new(Tz::UTC)),
                }
            }
        }
    }

    /// Whether `range` lies within the open hours of the local day it starts
    /// on.
    ///
    /// A range that ends on a later local date than it starts is outside
    /// operating hours, since no day's hours extend past midnight.
    pub fn is_within_operating_hours(&self, range: &TimeRange) -> bool {
        let local_start = range.start().with_timezone(&self.timezone);
        let local_end = range.end().with_timezone(&self.timezone);

        let Some(hours) = self.hours_for(local_start.weekday()) else {
            return false;
        };
        if local_start.time() < hours.open {
            return false;
        }

        let date = local_start.date_naive();
        match hours.close {
            Some(close) => local_end.date_naive() == date && local_end.time() <= close,
            None => {
                local_end.date_naive() == date
                    || Some(local_end.naive_local()) == next_midnight(date)
            }
        }
    }

    /// The UTC range the resource is open on local date `date`.
    ///
    /// Returns `None` when the day is closed or when its opening or closing
    /// time does not exist locally (DST gap).
    pub fn open_window(&self, date: NaiveDate) -> Option<TimeRange> {
        let hours = self.hours_for(date.weekday())?;
        let open = self
            .timezone
            .from_local_datetime(&date.and_time(hours.open))
            .earliest()?;
        let close = match hours.close {
            Some(close) => date.and_time(close),
            None => next_midnight(date)?,
        };
        let close = self.timezone.from_local_datetime(&close).latest()?;
        TimeRange::new(open.with_timezone(&Utc), close.with_timezone(&Utc)).ok()
    }
}

// ---------------------------------------------------------------------------
// Stored JSON form
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monday: Option<RawDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tuesday: Option<RawDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wednesday: Option<RawDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thursday: Option<RawDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    friday: Option<RawDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saturday: Option<RawDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sunday: Option<RawDay>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    close: Option<String>,
    #[serde(default)]
    closed: bool,
}

impl RawSchedule {
    fn days(&self) -> [&Option<RawDay>; 7] {
        [
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
            &self.sunday,
        ]
    }
}

impl TryFrom<RawSchedule> for OperatingSchedule {
    type Error = BookingError;

    fn try_from(raw: RawSchedule) -> Result<Self> {
        let timezone: Tz = match raw.timezone.as_deref() {
            Some(name) => name
                .parse()
                .map_err(|_| BookingError::InvalidTimezone(name.to_string()))?,
            None => Tz::UTC,
        };

        let mut schedule = OperatingSchedule::new(timezone);
        for (weekday, day) in WEEKDAYS.iter().zip(raw.days()) {
            let Some(day) = day else { continue };
            if day.closed {
                continue;
            }
            let hours = match (&day.open, &day.close) {
                (Some(open), Some(close)) if is_midnight_close(close) => {
                    DayHours::until_midnight(parse_time(open)?)
                }
                (Some(open), Some(close)) => DayHours::new(parse_time(open)?, parse_time(close)?)?,
                _ => {
                    return Err(BookingError::InvalidSchedule(format!(
                        "{} is open but lacks open/close times",
                        weekday
                    )))
                }
            };
            schedule = schedule.with_day(*weekday, hours);
        }
        Ok(schedule)
    }
}

impl From<OperatingSchedule> for RawSchedule {
    fn from(schedule: OperatingSchedule) -> Self {
        let day = |weekday: Weekday| {
            Some(match schedule.hours_for(weekday) {
                Some(hours) => RawDay {
                    open: Some(format_time(hours.open)),
                    close: Some(match hours.close {
                        Some(close) => format_time(close),
                        None => MIDNIGHT_CLOSE.to_string(),
                    }),
                    closed: false,
                },
                None => RawDay {
                    open: None,
                    close: None,
                    closed: true,
                },
            })
        };
        RawSchedule {
            timezone: Some(schedule.timezone.name().to_string()),
            monday: day(Weekday::Mon),
            tuesday: day(Weekday::Tue),
            wednesday: day(Weekday::Wed),
            thursday: day(Weekday::Thu),
            friday: day(Weekday::Fri),
            saturday: day(Weekday::Sat),
            sunday: day(Weekday::Sun),
        }
    }
}

const MIDNIGHT_CLOSE: &str = "24:00";

fn is_midnight_close(s: &str) -> bool {
    matches!(s.trim(), "24:00" | "24:00:00")
}

fn next_midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.succ_opt().map(|next| next.and_time(NaiveTime::MIN))
}

/// Parse `HH:MM` or `HH:MM:SS`.
fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| BookingError::InvalidSchedule(format!("invalid time of day '{}'", s)))
}

fn format_time(t: NaiveTime) -> String {
    if t.second() == 0 {
        t.format("%H:%M").to_string()
    } else {
        t.format("%H:%M:%S").to_string()
    }
}
