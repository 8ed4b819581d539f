//! Selection of the return metric plotted on a chart.

use crate::error::{Result, TrendsError};
use crate::join::{self, RateIndex};
use crate::models::PeriodRecord;
use std::fmt;
use std::str::FromStr;

/// Which return a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReturnMetric {
    /// `(close - open) / open` in the series' own currency.
    #[default]
    Local,
    /// Return after converting open and close through the auxiliary rate series.
    Usd,
}

impl ReturnMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnMetric::Local => "local",
            ReturnMetric::Usd => "usd",
        }
    }
}

impl fmt::Display for ReturnMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReturnMetric {
    type Err = TrendsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "lkr" => Ok(ReturnMetric::Local),
            "usd" => Ok(ReturnMetric::Usd),
            other => Err(TrendsError::InvalidArgument(format!(
                "unknown metric '{}' (expected local or usd)",
                other
            ))),
        }
    }
}

/// A record paired with the value a chart places it by.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableRecord {
    pub record: PeriodRecord,
    pub value: f64,
}

/// Plain return of a record, failing on a zero open price.
pub fn local_change(record: &PeriodRecord, series_id: &str) -> Result<f64> {
    record.change().ok_or_else(|| TrendsError::DivisionByZero {
        series: series_id.to_string(),
        date: record.date_start,
    })
}

/// Compute the chosen metric for every record, preserving order.
///
/// `rates` is required for [`ReturnMetric::Usd`].
pub fn renderable(
    records: &[PeriodRecord],
    series_id: &str,
    metric: ReturnMetric,
    rates: Option<&RateIndex>,
) -> Result<Vec<RenderableRecord>> {
    records
        .iter()
        .map(|record| {
            let value = match metric {
                ReturnMetric::Local => local_change(record, series_id)?,
                ReturnMetric::Usd => {
                    let index = rates.ok_or_else(|| {
                        TrendsError::InvalidArgument(format!(
                            "series '{}' has no exchange-rate series for the USD metric",
                            series_id
                        ))
                    })?;
                    join::usd_change(record, series_id, index)?
                }
            };
            Ok(RenderableRecord {
                record: record.clone(),
                value,
            })
        })
        .collect()
}
