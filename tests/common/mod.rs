//! Shared test fixtures for the cse-trends integration tests.
//!
//! Provides `setup_raw_dir()` which writes small raw price-history exports
//! for `cse-aspi` and `usd-lkr` into a temporary directory.

#![allow(dead_code)]

use chrono::NaiveDate;
use cse_trends::{PeriodRecord, Trends};
use std::fs;
use std::path::Path;

pub const HEADER: &str = r#""Date","Price","Open","High","Low","Vol.","Change %""#;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(
    start: NaiveDate,
    end: NaiveDate,
    open: f64,
    close: f64,
    high: f64,
    low: f64,
    volume: f64,
) -> PeriodRecord {
    PeriodRecord {
        date_start: start,
        date_end: end,
        price_close: close,
        price_open: open,
        price_high: high,
        price_low: low,
        volume,
    }
}

pub fn daily(d: NaiveDate, open: f64, close: f64, high: f64, low: f64, volume: f64) -> PeriodRecord {
    record(d, d, open, close, high, low, volume)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Write a raw export with the standard header.
pub fn write_raw(dir: &Path, name: &str, rows: &[&str]) {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(dir.join(name), contents).unwrap();
}

/// Temp directory with two `cse-aspi` files (newest row first, as exported)
/// and one `usd-lkr` file covering the same dates.
///
/// Monthly `cse-aspi` aggregates:
/// - 2019-12: open 80, close 90
/// - 2020-01: open 90, close 120, high 125, low 85, volume 3.0
/// - 2020-02: open 120, close 110
pub fn setup_raw_dir() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();

    write_raw(
        tmp.path(),
        "cse-aspi-2020.csv",
        &[
            r#""02/03/2020","110.00","120.00","130.00","100.00","1.50M","-8.33%""#,
            r#""01/03/2020","120.00","100.00","125.00","95.00","2.00M","20.00%""#,
            r#""01/02/2020","100.00","90.00","105.00","85.00","1.00M","11.11%""#,
        ],
    );
    write_raw(
        tmp.path(),
        "cse-aspi-2019.csv",
        &[r#""12/31/2019","90.00","80.00","95.00","75.00","0.50M","12.50%""#],
    );
    write_raw(
        tmp.path(),
        "usd-lkr-2020.csv",
        &[
            r#""02/03/2020","184.00","183.50","184.50","183.00","-","0.27%""#,
            r#""01/03/2020","182.00","181.50","182.50","181.00","-","0.55%""#,
            r#""01/02/2020","181.00","180.50","181.50","180.00","-","0.56%""#,
            r#""12/31/2019","180.00","179.50","180.50","179.00","-","0.28%""#,
        ],
    );

    tmp
}

/// `Trends` over `raw`, caching into `cache` and writing charts to `charts`.
pub fn trends(raw: &Path, cache: &Path, charts: &Path) -> Trends {
    Trends::builder()
        .raw_dir(raw)
        .cache_dir(cache)
        .charts_dir(charts)
        .build()
        .unwrap()
}
