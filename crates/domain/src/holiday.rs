//! Holiday calendar: year-independent days that force the holiday mode.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::MonthDay;

/// A read-only set of `MM-DD` days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayCalendar {
    days: BTreeSet<MonthDay>,
}

impl HolidayCalendar {
    /// Parse a calendar from `MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMonthDay`] for the first entry that
    /// is not a valid month-day.
    pub fn parse<I, S>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .map(|entry| entry.as_ref().parse::<MonthDay>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|days| Self { days })
    }

    /// New Year, Labour Day, Bastille Day and Christmas.
    #[must_use]
    pub fn standard() -> Self {
        Self::parse(STANDARD_HOLIDAYS).unwrap_or_default()
    }

    /// Whether `date` falls on one of the calendar's days, whatever the year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&MonthDay::of(date))
    }

    pub fn iter(&self) -> impl Iterator<Item = MonthDay> + '_ {
        self.days.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Days used by [`HolidayCalendar::standard`].
pub const STANDARD_HOLIDAYS: [&str; 4] = ["01-01", "05-01", "07-14", "12-25"];
