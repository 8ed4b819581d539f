//! Raw price-history file parser.
//!
//! Raw files are comma-delimited exports with the header
//! `Date, Price, Open, High, Low, Vol., Change %`. Dates use `MM/DD/YYYY`;
//! numeric columns may carry thousands separators, a percent sign, or (for
//! volume) a trailing unit suffix.
//!
//! Numeric parsing is lenient: a field that still fails to parse after
//! cleanup becomes `0` and is counted in the file's [`FileReport`]. Dates and
//! column counts are strict and fail the whole run.

use crate::config;
use crate::error::{Result, TrendsError};
use crate::models::PeriodRecord;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const COL_DATE: usize = 0;
const COL_CLOSE: usize = 1;
const COL_OPEN: usize = 2;
const COL_HIGH: usize = 3;
const COL_LOW: usize = 4;
const COL_VOLUME: usize = 5;
const MIN_COLUMNS: usize = 6;

/// Per-file parse statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub rows: usize,
    /// Numeric fields that failed to parse and were replaced by `0`.
    pub degraded_fields: usize,
}

/// Strip thousands separators and percent signs, then parse. Non-finite
/// values (`NaN`, `inf`) are rejected like any other unparseable text.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Strip a trailing unit suffix (`"1.25M"` -> `"1.25"`) and parse.
pub fn parse_volume(raw: &str) -> Option<f64> {
    parse_number(raw.trim().trim_end_matches(|c: char| c.is_ascii_alphabetic()))
}

/// Lenient conversion: unparseable values become `0` and bump `degraded`.
fn lenient(value: Option<f64>, degraded: &mut usize) -> f64 {
    match value {
        Some(v) => v,
        None => {
            *degraded += 1;
            0.0
        }
    }
}

fn parse_row(row: &StringRecord, path: &Path, degraded: &mut usize) -> Result<PeriodRecord> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    if row.len() < MIN_COLUMNS {
        return Err(TrendsError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("expected at least {} columns, found {}", MIN_COLUMNS, row.len()),
        });
    }

    let raw_date = row[COL_DATE].trim();
    let date = NaiveDate::parse_from_str(raw_date, config::RAW_DATE_FORMAT).map_err(|e| {
        TrendsError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("invalid date '{}': {}", raw_date, e),
        }
    })?;

    let price_close = lenient(parse_number(&row[COL_CLOSE]), degraded);
    let price_open = lenient(parse_number(&row[COL_OPEN]), degraded);
    let price_high = lenient(parse_number(&row[COL_HIGH]), degraded);
    let price_low = lenient(parse_number(&row[COL_LOW]), degraded);
    let volume = lenient(parse_volume(&row[COL_VOLUME]), degraded);

    Ok(PeriodRecord::daily(
        date,
        price_open,
        price_close,
        price_high,
        price_low,
        volume,
    ))
}

/// Parse one raw file from any reader. `path` is used for diagnostics only.
pub fn parse_reader<R: Read>(reader: R, path: &Path) -> Result<(Vec<PeriodRecord>, FileReport)> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut degraded = 0;
    for row in csv_reader.records() {
        let row = row?;
        records.push(parse_row(&row, path, &mut degraded)?);
    }

    let report = FileReport {
        path: path.to_path_buf(),
        rows: records.len(),
        degraded_fields: degraded,
    };
    Ok((records, report))
}

/// Parse one raw file.
pub fn parse_file(path: &Path) -> Result<(Vec<PeriodRecord>, FileReport)> {
    let file = fs::File::open(path)?;
    parse_reader(file, path)
}

/// List the files in `dir` whose name starts with `prefix`, sorted by name.
pub fn matching_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TrendsError::NotFound(format!(
            "raw data directory {} does not exist",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with(prefix))
            .unwrap_or(false);
        if matches {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Parse every raw file in `dir` belonging to `prefix`, sorted by `date_start`.
pub fn parse_dir(dir: &Path, prefix: &str) -> Result<Vec<PeriodRecord>> {
    let files = matching_files(dir, prefix)?;
    if files.is_empty() {
        warn!("No raw files starting with '{}' in {}", prefix, dir.display());
    }

    let mut records = Vec::new();
    for path in &files {
        let (mut file_records, report) = parse_file(path)?;
        if report.degraded_fields > 0 {
            warn!(
                "{}: {} numeric field(s) could not be parsed and were set to 0",
                report.path.display(),
                report.degraded_fields
            );
        }
        info!("Parsed {} rows from {}", report.rows, report.path.display());
        records.append(&mut file_records);
    }

    records.sort_by_key(|r| r.date_start);
    Ok(records)
}
