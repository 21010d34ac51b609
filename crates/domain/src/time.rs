//! Local wall-clock helpers: hours of the day, date keys and month-days.
//!
//! The planner works in local wall-clock time only, so every instant is a
//! [`NaiveDateTime`] read from the host's local timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Local wall-clock instant.
pub type LocalDateTime = NaiveDateTime;

/// Number of hourly slots in a day.
pub const HOURS_PER_DAY: usize = 24;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Return the current local wall-clock time.
#[must_use]
pub fn now_local() -> LocalDateTime {
    Local::now().naive_local()
}

/// Format a date as its `YYYY-MM-DD` key.
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDateKey`] when the text is not a valid
/// calendar date in that format.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|_| ValidationError::InvalidDateKey(key.to_string()))
}

/// An hour of the day, always within `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Hour(u8);

impl Hour {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Build an hour, rejecting anything outside `0..=23`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::HourOutOfRange`].
    pub fn new(hour: u32) -> Result<Self, ValidationError> {
        u8::try_from(hour)
            .ok()
            .filter(|h| usize::from(*h) < HOURS_PER_DAY)
            .map(Self)
            .ok_or(ValidationError::HourOutOfRange(hour))
    }

    /// The hour component of a local instant.
    #[must_use]
    pub fn of(at: &LocalDateTime) -> Self {
        // chrono guarantees hour() < 24
        Self(u8::try_from(at.hour()).unwrap_or(0))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Slot index into a 24-entry table.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Every hour of the day, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..24u8).map(Self)
    }
}

impl TryFrom<u32> for Hour {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hour> for u32 {
    fn from(hour: Hour) -> Self {
        u32::from(hour.0)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h", self.0)
    }
}

/// A year-independent calendar day, written `MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Build a month-day, accepting 02-29.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMonthDay`] if the pair does not
    /// exist in a leap year.
    pub fn new(month: u32, day: u32) -> Result<Self, ValidationError> {
        // 2000 is a leap year, so 02-29 is accepted
        NaiveDate::from_ymd_opt(2000, month, day)
            .map(|_| Self { month, day })
            .ok_or_else(|| ValidationError::InvalidMonthDay(format!("{month:02}-{day:02}")))
    }

    /// The month-day of a calendar date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.day
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonthDay(s.to_string());
        let (month, day) = s.trim().split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }
        let month = month.parse().map_err(|_| invalid())?;
        let day = day.parse().map_err(|_| invalid())?;
        Self::new(month, day).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}
