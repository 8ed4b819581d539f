use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PeriodRecord
// ---------------------------------------------------------------------------

/// One observation over `[date_start, date_end]`.
///
/// A raw daily row has `date_start == date_end`; an aggregate spans the
/// dates of the records folded into it. Both have the same shape, so an
/// aggregate can be folded again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub price_close: f64,
    pub price_open: f64,
    pub price_high: f64,
    pub price_low: f64,
    /// Volume in millions of units.
    #[serde(rename = "volume_m")]
    pub volume: f64,
}

impl PeriodRecord {
    /// A single-day record.
    pub fn daily(
        date: NaiveDate,
        price_open: f64,
        price_close: f64,
        price_high: f64,
        price_low: f64,
        volume: f64,
    ) -> Self {
        Self {
            date_start: date,
            date_end: date,
            price_close,
            price_open,
            price_high,
            price_low,
            volume,
        }
    }

    /// Fractional price change over the interval, `(close - open) / open`.
    ///
    /// Returns `None` when `price_open` is zero.
    pub fn change(&self) -> Option<f64> {
        if self.price_open == 0.0 {
            None
        } else {
            Some((self.price_close - self.price_open) / self.price_open)
        }
    }

    pub fn is_single_day(&self) -> bool {
        self.date_start == self.date_end
    }
}
