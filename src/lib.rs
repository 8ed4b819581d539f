//! Price-history trends for the Colombo Stock Exchange.
//!
//! Parses daily price exports, caches them locally as JSON, aggregates them
//! into monthly or yearly periods, and renders a box-plot chart of period
//! returns (optionally converted to USD through an exchange-rate series).
//!
//! # Quick start
//!
//! ```no_run
//! use cse_trends::{Granularity, ReturnMetric, SeriesConfig, Trends};
//!
//! let trends = Trends::builder()
//!     .raw_dir("data/raw")
//!     .cache_dir("data")
//!     .build()
//!     .unwrap();
//!
//! let series = SeriesConfig::cse_aspi();
//! let yearly = trends.aggregate(&series, Granularity::Year).unwrap();
//! let svg = trends.render(&series, Granularity::Year, ReturnMetric::Usd).unwrap();
//! ```

pub mod aggregate;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod join;
pub mod models;
pub mod parser;
pub mod returns;

pub use aggregate::Aggregator;
pub use cache::CacheStore;
pub use chart::{ChartTitle, Scene, Style};
pub use config::SeriesConfig;
pub use error::{Result, TrendsError};
pub use join::{PriceSide, RateIndex};
pub use models::{Granularity, PeriodRecord};
pub use returns::{RenderableRecord, ReturnMetric};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// TrendsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Trends`] instance.
pub struct TrendsBuilder {
    raw_dir: PathBuf,
    cache_dir: Option<PathBuf>,
    charts_dir: PathBuf,
    style: Style,
}

impl Default for TrendsBuilder {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(config::DEFAULT_RAW_DIR),
            cache_dir: None,
            charts_dir: PathBuf::from(config::DEFAULT_CHARTS_DIR),
            style: Style::default(),
        }
    }
}

impl TrendsBuilder {
    /// Directory holding the raw price-history exports. Defaults to `data/raw`.
    pub fn raw_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.raw_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/cse-trends` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Directory charts are written to. Defaults to `charts`.
    pub fn charts_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.charts_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Build, creating the cache directory if needed.
    pub fn build(self) -> Result<Trends> {
        self.style.validate()?;
        let cache = CacheStore::new(self.cache_dir)?;
        Ok(Trends {
            raw_dir: self.raw_dir,
            charts_dir: self.charts_dir,
            style: self.style,
            cache: RefCell::new(cache),
            aggregator: RefCell::new(Aggregator::new()),
            rates: RefCell::new(HashMap::new()),
        })
    }
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// Entry point tying together parsing, caching, aggregation, currency
/// conversion, and chart rendering for one run.
///
/// Holds the in-process memo tables; not meant to be shared across threads.
pub struct Trends {
    raw_dir: PathBuf,
    charts_dir: PathBuf,
    style: Style,
    cache: RefCell<CacheStore>,
    aggregator: RefCell<Aggregator>,
    rates: RefCell<HashMap<String, RateIndex>>,
}

impl Trends {
    /// Create a new builder for configuring the instance.
    pub fn builder() -> TrendsBuilder {
        TrendsBuilder::default()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache.borrow().cache_dir.clone()
    }

    /// Daily records of a series, from the cache if present, otherwise
    /// parsed from the raw directory and cached.
    pub fn records(&self, series: &SeriesConfig) -> Result<Vec<PeriodRecord>> {
        if let Some(records) = self.cache.borrow_mut().load(&series.id)? {
            return Ok(records);
        }

        let records = parser::parse_dir(&self.raw_dir, &series.raw_prefix)?;
        if records.is_empty() {
            return Err(TrendsError::NotFound(format!(
                "no records for series '{}' in {}",
                series.id,
                self.raw_dir.display()
            )));
        }
        self.cache.borrow_mut().save(&series.id, &records)?;
        Ok(records)
    }

    /// Records of a series aggregated at `granularity`, ascending by period.
    pub fn aggregate(&self, series: &SeriesConfig, granularity: Granularity) -> Result<Vec<PeriodRecord>> {
        let cached = self.aggregator.borrow().is_cached(&series.id, granularity);
        let records = if cached { Vec::new() } else { self.records(series)? };
        let mut aggregator = self.aggregator.borrow_mut();
        Ok(aggregator.aggregate(&series.id, &records, granularity).to_vec())
    }

    /// Aggregate a series and write the result next to the series cache.
    pub fn build(&self, series: &SeriesConfig, granularity: Granularity) -> Result<PathBuf> {
        let aggregated = self.aggregate(series, granularity)?;
        self.cache
            .borrow()
            .save_aggregate(&series.id, granularity, &aggregated)
    }

    /// Date index of an exchange-rate series, built once per run.
    pub fn rate_index(&self, series_id: &str) -> Result<RateIndex> {
        if let Some(index) = self.rates.borrow().get(series_id) {
            return Ok(index.clone());
        }
        let rate_series =
            SeriesConfig::by_id(series_id).unwrap_or_else(|| SeriesConfig::new(series_id, series_id));
        let index = RateIndex::new(series_id, &self.records(&rate_series)?);
        self.rates
            .borrow_mut()
            .insert(series_id.to_string(), index.clone());
        Ok(index)
    }

    /// Aggregated records paired with the metric a chart plots.
    pub fn chart_records(
        &self,
        series: &SeriesConfig,
        granularity: Granularity,
        metric: ReturnMetric,
    ) -> Result<Vec<RenderableRecord>> {
        let aggregated = self.aggregate(series, granularity)?;
        let rates = match (metric, &series.aux_series) {
            (ReturnMetric::Usd, Some(aux)) => Some(self.rate_index(aux)?),
            _ => None,
        };
        returns::renderable(&aggregated, &series.id, metric, rates.as_ref())
    }

    /// Lay out the box-plot chart for a series.
    pub fn chart(
        &self,
        series: &SeriesConfig,
        granularity: Granularity,
        metric: ReturnMetric,
    ) -> Result<Scene> {
        let records = self.chart_records(series, granularity, metric)?;
        let outside = chart::out_of_range(&records, &self.style);
        if outside > 0 {
            warn!(
                "{} of {} {} records fall outside the chart range {}..{}",
                outside,
                records.len(),
                series.id,
                self.style.min_val,
                self.style.max_val
            );
        }
        let title = chart_title(series, granularity, metric);
        Ok(chart::layout(&records, &self.style, &title))
    }

    /// Output path of a chart.
    pub fn chart_path(&self, series: &SeriesConfig, granularity: Granularity, metric: ReturnMetric) -> PathBuf {
        let suffix = match metric {
            ReturnMetric::Local => "",
            ReturnMetric::Usd => ".usd",
        };
        self.charts_dir
            .join(format!("{}.{}{}.svg", series.id, granularity.label(), suffix))
    }

    /// Render the chart to SVG under the charts directory.
    pub fn render(
        &self,
        series: &SeriesConfig,
        granularity: Granularity,
        metric: ReturnMetric,
    ) -> Result<PathBuf> {
        let scene = self.chart(series, granularity, metric)?;
        let path = self.chart_path(series, granularity, metric);
        cache::write_atomic(&path, scene.to_svg().as_bytes())?;
        info!("Wrote chart to {}", path.display());
        Ok(path)
    }

    /// Delete the cache of a series and forget every memoized result
    /// derived from it.
    pub fn invalidate(&self, series_id: &str) -> Result<bool> {
        self.aggregator.borrow_mut().clear();
        self.rates.borrow_mut().remove(series_id);
        self.cache.borrow_mut().invalidate(series_id)
    }
}

fn chart_title(series: &SeriesConfig, granularity: Granularity, metric: ReturnMetric) -> ChartTitle {
    let mut subtitle = format!("Performance by {}", granularity.period_name());
    if metric == ReturnMetric::Usd {
        subtitle.push_str(" (USD)");
    }
    ChartTitle::new(&series.title, &subtitle)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Trends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trends(raw_dir={}, cache_dir={}, charts_dir={})",
            self.raw_dir.display(),
            self.cache.borrow().cache_dir.display(),
            self.charts_dir.display()
        )
    }
}
