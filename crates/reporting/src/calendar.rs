//! Calendar bucketing: day and month enumeration over a date range.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use pulse_core::range::{start_of_day, DateRangeFilter};

/// Every calendar day in the range, inclusive, in order.
pub fn days_in_range(range: &DateRangeFilter) -> Vec<NaiveDate> {
    let last = range.last_day();
    range
        .first_day()
        .iter_days()
        .take_while(|d| *d <= last)
        .collect()
}

/// A calendar month as a half-open instant interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub first_day: NaiveDate,
    pub start: DateTime<Utc>,
    /// Start of the following month.
    pub end_exclusive: DateTime<Utc>,
}

impl CalendarMonth {
    fn containing(day: NaiveDate) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(day.year(), day.month(), 1)?;
        let next = first_day.checked_add_months(Months::new(1))?;
        Some(Self {
            first_day,
            start: start_of_day(first_day),
            end_exclusive: start_of_day(next),
        })
    }

    /// Display label, e.g. `Mar 2024`.
    pub fn label(&self) -> String {
        self.first_day.format("%b %Y").to_string()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end_exclusive
    }
}

/// Every calendar month the range touches, in order.
pub fn months_in_range(range: &DateRangeFilter) -> Vec<CalendarMonth> {
    let last = range.last_day();
    std::iter::successors(CalendarMonth::containing(range.first_day()), |m| {
        CalendarMonth::containing(m.end_exclusive.date_naive())
    })
    .take_while(|m| m.first_day <= last)
    .collect()
}

/// Zero-padded `YYYY-MM` key; sorts chronologically as a string.
pub fn month_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m").to_string()
}
