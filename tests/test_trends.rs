//! End-to-end tests through the `Trends` entry point.

mod common;

use common::{assert_close, date};
use cse_trends::{Granularity, ReturnMetric, SeriesConfig, Style, Trends, TrendsError};
use std::fs;

#[test]
fn records_are_parsed_then_cached() {
    let raw = common::setup_raw_dir();
    let work = tempfile::tempdir().unwrap();
    let cache_dir = work.path().join("cache");
    let trends = common::trends(raw.path(), &cache_dir, &work.path().join("charts"));

    let records = trends.records(&SeriesConfig::cse_aspi()).unwrap();
    assert_eq!(records.len(), 4);
    assert!(cache_dir.join("cse-aspi.json").exists());

    // A new instance reads the cache even after the raw files are gone.
    fs::remove_dir_all(raw.path()).unwrap();
    let fresh = common::trends(raw.path(), &cache_dir, &work.path().join("charts"));
    assert_eq!(fresh.records(&SeriesConfig::cse_aspi()).unwrap(), records);
}

#[test]
fn series_without_raw_files_is_not_found() {
    let raw = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let trends = common::trends(raw.path(), work.path(), work.path());

    let err = trends.records(&SeriesConfig::cse_aspi()).unwrap_err();
    assert!(matches!(err, TrendsError::NotFound(_)));
}

#[test]
fn monthly_aggregate_matches_raw_rows() {
    let raw = common::setup_raw_dir();
    let work = tempfile::tempdir().unwrap();
    let trends = common::trends(raw.path(), work.path(), work.path());

    let monthly = trends
        .aggregate(&SeriesConfig::cse_aspi(), Granularity::Month)
        .unwrap();
    assert_eq!(monthly.len(), 3);

    let january = &monthly[1];
    assert_eq!(january.date_start, date(2020, 1, 2));
    assert_eq!(january.date_end, date(2020, 1, 3));
    assert_eq!(january.price_open, 90.0);
    assert_eq!(january.price_close, 120.0);
    assert_eq!(january.price_high, 125.0);
    assert_eq!(january.price_low, 85.0);
    assert_close(january.volume, 3.0);
}

#[test]
fn build_writes_aggregate_artifact() {
    let raw = common::setup_raw_dir();
    let work = tempfile::tempdir().unwrap();
    let trends = common::trends(raw.path(), work.path(), work.path());

    let path = trends
        .build(&SeriesConfig::cse_aspi(), Granularity::Year)
        .unwrap();
    assert_eq!(path, work.path().join("cse-aspi.by_year.json"));

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let years = value.as_array().unwrap();
    assert_eq!(years.len(), 2);
    assert_eq!(years[1]["date_start"], "2020-01-02");
    assert_eq!(years[1]["date_end"], "2020-02-03");
    assert_eq!(years[1]["price_open"], 90.0);
    assert_eq!(years[1]["price_close"], 110.0);
}

#[test]
fn usd_chart_records_use_exchange_rates() {
    let raw = common::setup_raw_dir();
    let work = tempfile::tempdir().unwrap();
    let trends = common::trends(raw.path(), work.path(), work.path());

    let local = trends
        .chart_records(&SeriesConfig::cse_aspi(), Granularity::Year, ReturnMetric::Local)
        .unwrap();
    let usd = trends
        .chart_records(&SeriesConfig::cse_aspi(), Granularity::Year, ReturnMetric::Usd)
        .unwrap();

    assert_close(local[1].value, (110.0 - 90.0) / 90.0);
    let open = 90.0 / 181.0;
    let close = 110.0 / 184.0;
    assert_close(usd[1].value, (close - open) / open);
    assert!(work.path().join("usd-lkr.json").exists());
}

#[test]
fn usd_metric_requires_an_exchange_rate_series() {
    let raw = common::setup_raw_dir();
    let work = tempfile::tempdir().unwrap();
    let trends = common::trends(raw.path(), work.path(), work.path());

    let err = trends
        .chart_records(&SeriesConfig::usd_lkr(), Granularity::Year, ReturnMetric::Usd)
        .unwrap_err();
    assert!(matches!(err, TrendsError::InvalidArgument(_)));
}

#[test]
fn missing_rate_date_aborts_the_usd_chart() {
    let raw = common::setup_raw_dir();
    common::write_raw(
        raw.path(),
        "cse-aspi-2020-03.csv",
        &[r#""03/02/2020","100.00","110.00","111.00","99.00","1.00M","-9.09%""#],
    );
    let work = tempfile::tempdir().unwrap();
    let trends = common::trends(raw.path(), work.path(), work.path());

    let err = trends
        .chart(&SeriesConfig::cse_aspi(), Granularity::Month, ReturnMetric::Usd)
        .unwrap_err();
    match err {
        TrendsError::RateNotFound { series, date: missing } => {
            assert_eq!(series, "usd-lkr");
            assert_eq!(missing, date(2020, 3, 2));
        }
        other => panic!("expected RateNotFound, got {other:?}"),
    }
}

#[test]
fn render_writes_svg_under_charts_dir() {
    let raw = common::setup_raw_dir();
    let work = tempfile::tempdir().unwrap();
    let charts = work.path().join("charts");
    let trends = common::trends(raw.path(), &work.path().join("cache"), &charts);

    let series = SeriesConfig::cse_aspi();
    let path = trends
        .render(&series, Granularity::Year, ReturnMetric::Usd)
        .unwrap();
    assert_eq!(path, charts.join("cse-aspi.by_year.usd.svg"));

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Colombo Stock Exchange (CSE) - All Share Index (ASPI)"));
    assert!(svg.contains("Performance by Year (USD)"));
    assert!(svg.contains(">19DEC31<"));
    assert!(svg.contains(">20<"));
}

#[test]
fn invalidate_forces_a_reparse() {
    let raw = common::setup_raw_dir();
    let work = tempfile::tempdir().unwrap();
    let trends = common::trends(raw.path(), work.path(), work.path());
    let series = SeriesConfig::cse_aspi();

    assert_eq!(trends.aggregate(&series, Granularity::Month).unwrap().len(), 3);

    common::write_raw(
        raw.path(),
        "cse-aspi-2020-03.csv",
        &[r#""03/02/2020","100.00","110.00","111.00","99.00","1.00M","-9.09%""#],
    );
    // Cached and memoized: the new file is not seen.
    assert_eq!(trends.aggregate(&series, Granularity::Month).unwrap().len(), 3);

    assert!(trends.invalidate(&series.id).unwrap());
    assert_eq!(trends.aggregate(&series, Granularity::Month).unwrap().len(), 4);
}

#[test]
fn builder_rejects_degenerate_style() {
    let style = Style {
        span: 0.0,
        ..Style::default()
    };
    let work = tempfile::tempdir().unwrap();
    let result = Trends::builder().cache_dir(work.path()).style(style).build();
    assert!(matches!(result, Err(TrendsError::InvalidArgument(_))));
}

#[test]
fn builder_rejects_non_finite_style() {
    let style = Style {
        max_val: f64::INFINITY,
        ..Style::default()
    };
    let work = tempfile::tempdir().unwrap();
    let result = Trends::builder().cache_dir(work.path()).style(style).build();
    assert!(matches!(result, Err(TrendsError::InvalidArgument(_))));
}

#[test]
fn series_presets_are_found_by_id() {
    let aspi = SeriesConfig::by_id("cse-aspi").unwrap();
    assert_eq!(aspi.raw_prefix, "cse-aspi");
    assert_eq!(aspi.aux_series.as_deref(), Some("usd-lkr"));
    assert!(SeriesConfig::by_id("usd-lkr").unwrap().aux_series.is_none());
    assert!(SeriesConfig::by_id("spx").is_none());
}
