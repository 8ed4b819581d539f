//! Cross-currency conversion against an exchange-rate series.

use crate::error::{Result, TrendsError};
use crate::models::PeriodRecord;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Which price of a record to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSide {
    /// `price_open`, converted at the rate on `date_start`.
    Open,
    /// `price_close`, converted at the rate on `date_end`.
    Close,
}

/// Exchange-rate records keyed by `date_start`.
#[derive(Debug, Clone)]
pub struct RateIndex {
    series: String,
    by_date: HashMap<NaiveDate, PeriodRecord>,
}

impl RateIndex {
    /// Index `records` of the rate series `series_id`. Later records win on
    /// duplicate dates.
    pub fn new(series_id: &str, records: &[PeriodRecord]) -> Self {
        let mut by_date = HashMap::with_capacity(records.len());
        for record in records {
            by_date.insert(record.date_start, record.clone());
        }
        Self {
            series: series_id.to_string(),
            by_date,
        }
    }

    pub fn series_id(&self) -> &str {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&PeriodRecord> {
        self.by_date.get(&date)
    }

    /// Closing rate on `date`. There is no fallback to a neighbouring date.
    pub fn rate(&self, date: NaiveDate) -> Result<f64> {
        self.get(date)
            .map(|r| r.price_close)
            .ok_or_else(|| TrendsError::RateNotFound {
                series: self.series.clone(),
                date,
            })
    }
}

/// Convert one price of `record` into the rate index's currency.
pub fn usd_value(record: &PeriodRecord, side: PriceSide, index: &RateIndex) -> Result<f64> {
    let (price, date) = match side {
        PriceSide::Open => (record.price_open, record.date_start),
        PriceSide::Close => (record.price_close, record.date_end),
    };
    let rate = index.rate(date)?;
    if rate == 0.0 {
        return Err(TrendsError::DivisionByZero {
            series: index.series.clone(),
            date,
        });
    }
    Ok(price / rate)
}

/// Return over the record's interval measured in the converted currency.
pub fn usd_change(record: &PeriodRecord, series_id: &str, index: &RateIndex) -> Result<f64> {
    let open = usd_value(record, PriceSide::Open, index)?;
    let close = usd_value(record, PriceSide::Close, index)?;
    if open == 0.0 {
        return Err(TrendsError::DivisionByZero {
            series: series_id.to_string(),
            date: record.date_start,
        });
    }
    Ok((close - open) / open)
}
