use crate::error::TrendsError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Calendar period used as the aggregation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    /// Truncate a date to the start of its period.
    pub fn key(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            // Day 1 and January 1 exist for every valid year/month.
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => date
                .with_day(1)
                .and_then(|d| d.with_month(1))
                .unwrap_or(date),
        }
    }

    /// Suffix used in artifact file names (`by_month`).
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "by_day",
            Granularity::Month => "by_month",
            Granularity::Year => "by_year",
        }
    }

    /// Human-readable period name for chart subtitles.
    pub fn period_name(&self) -> &'static str {
        match self {
            Granularity::Day => "Day",
            Granularity::Month => "Month",
            Granularity::Year => "Year",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = TrendsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(Granularity::Day),
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            "year" | "yearly" | "y" => Ok(Granularity::Year),
            other => Err(TrendsError::InvalidArgument(format!(
                "unknown granularity '{}' (expected day, month or year)",
                other
            ))),
        }
    }
}
