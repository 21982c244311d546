//! Inclusive date ranges and the dashboard's preset vocabulary.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PulseError, PulseResult};

/// Inclusive `[start_date, end_date]` bounds. Deserializing goes through
/// [`DateRangeFilter::new`], so inverted bounds are rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRangeFilter {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRangeFilter {
    type Error = PulseError;

    fn try_from(raw: RawDateRange) -> PulseResult<Self> {
        Self::new(raw.start_date, raw.end_date)
    }
}

impl DateRangeFilter {
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> PulseResult<Self> {
        if start_date > end_date {
            return Err(PulseError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Whole calendar days, from the start of `first` to the end of `last`.
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> PulseResult<Self> {
        Self::new(start_of_day(first), end_of_day(last))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start_date.date_naive()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end_date.date_naive()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_date && instant <= self.end_date
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        day >= self.first_day() && day <= self.last_day()
    }
}

pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

/// Last millisecond of `day`.
pub fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    start_of_day(day) + Duration::days(1) - Duration::milliseconds(1)
}

/// Named lookback windows offered by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRangePreset {
    #[serde(rename = "7d")]
    SevenDays,
    #[default]
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

impl DateRangePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangePreset::SevenDays => "7d",
            DateRangePreset::ThirtyDays => "30d",
            DateRangePreset::NinetyDays => "90d",
            DateRangePreset::OneYear => "1y",
            DateRangePreset::All => "all",
        }
    }

    /// Unrecognized input falls back to the 30 day window.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Resolve against `reference`: the window ends at the end of the
    /// reference day and starts at the beginning of the day the lookback
    /// lands on. `all` is bounded by `all_history_years`.
    pub fn resolve(&self, reference: DateTime<Utc>, all_history_years: u32) -> DateRangeFilter {
        let end_date = end_of_day(reference.date_naive());
        let start = match self {
            DateRangePreset::SevenDays => Some(end_date - Duration::days(7)),
            DateRangePreset::ThirtyDays => Some(end_date - Duration::days(30)),
            DateRangePreset::NinetyDays => Some(end_date - Duration::days(90)),
            DateRangePreset::OneYear => end_date.checked_sub_months(Months::new(12)),
            DateRangePreset::All => {
                end_date.checked_sub_months(Months::new(all_history_years.saturating_mul(12)))
            }
        };
        let start_date = start
            .map(|s| start_of_day(s.date_naive()))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        DateRangeFilter {
            start_date,
            end_date,
        }
    }
}

impl std::str::FromStr for DateRangePreset {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Self::SevenDays),
            "30d" => Ok(Self::ThirtyDays),
            "90d" => Ok(Self::NinetyDays),
            "1y" => Ok(Self::OneYear),
            "all" => Ok(Self::All),
            other => Err(PulseError::Config(format!("unknown date range preset: {other}"))),
        }
    }
}

impl std::fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
