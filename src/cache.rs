//! Local JSON cache of parsed series.
//!
//! Each series is stored as `<cache_dir>/<series_id>.json`, a JSON array of
//! records with `YYYY-MM-DD` dates. A present cache file is trusted as-is;
//! there is no staleness check against the raw files, so re-parsing requires
//! an explicit [`CacheStore::invalidate`].

use crate::config;
use crate::error::{Result, TrendsError};
use crate::models::{Granularity, PeriodRecord};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Reads and writes cached record lists, memoizing loads for the lifetime
/// of the store.
pub struct CacheStore {
    /// Directory where cache files are stored.
    pub cache_dir: PathBuf,
    memo: HashMap<String, Vec<PeriodRecord>>,
}

impl CacheStore {
    /// Create a new cache store.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            memo: HashMap::new(),
        })
    }

    /// Path of the cache file for a series.
    pub fn series_path(&self, series_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", series_id))
    }

    /// Path of the aggregate artifact for a series at a granularity.
    pub fn aggregate_path(&self, series_id: &str, granularity: Granularity) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}.json", series_id, granularity.label()))
    }

    /// Load a cached series, or `None` if it has never been saved.
    ///
    /// The first successful load is memoized; later calls for the same id
    /// do not touch the file system.
    pub fn load(&mut self, series_id: &str) -> Result<Option<Vec<PeriodRecord>>> {
        if let Some(records) = self.memo.get(series_id) {
            debug!("Cache memo hit for {}", series_id);
            return Ok(Some(records.clone()));
        }

        let path = self.series_path(series_id);
        if !path.exists() {
            return Ok(None);
        }

        let records = read_records(&path)?;
        info!("Read {} records from {}", records.len(), path.display());
        self.memo.insert(series_id.to_string(), records.clone());
        Ok(Some(records))
    }

    /// Save a series, replacing any existing cache file atomically.
    pub fn save(&mut self, series_id: &str, records: &[PeriodRecord]) -> Result<PathBuf> {
        let path = self.series_path(series_id);
        write_records(&path, records)?;
        info!("Wrote {} records to {}", records.len(), path.display());
        self.memo.insert(series_id.to_string(), records.to_vec());
        Ok(path)
    }

    /// Load an aggregate artifact written by [`save_aggregate`](Self::save_aggregate).
    pub fn load_aggregate(
        &self,
        series_id: &str,
        granularity: Granularity,
    ) -> Result<Option<Vec<PeriodRecord>>> {
        let path = self.aggregate_path(series_id, granularity);
        if !path.exists() {
            return Ok(None);
        }
        read_records(&path).map(Some)
    }

    /// Write an aggregate artifact for inspection.
    pub fn save_aggregate(
        &self,
        series_id: &str,
        granularity: Granularity,
        records: &[PeriodRecord],
    ) -> Result<PathBuf> {
        let path = self.aggregate_path(series_id, granularity);
        write_records(&path, records)?;
        info!("Wrote {} aggregated records to {}", records.len(), path.display());
        Ok(path)
    }

    /// Delete a series' cache file and any aggregate artifacts, and forget
    /// the memoized copy. Returns `true` if the series cache file existed.
    pub fn invalidate(&mut self, series_id: &str) -> Result<bool> {
        self.memo.remove(series_id);
        for granularity in [Granularity::Day, Granularity::Month, Granularity::Year] {
            let path = self.aggregate_path(series_id, granularity);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }

        let path = self.series_path(series_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Removed {}", path.display());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&mut self) -> Result<()> {
        self.memo.clear();
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

/// Read a JSON record list.
///
/// A file that does not deserialize is removed so the next run re-parses
/// the raw data.
fn read_records(path: &Path) -> Result<Vec<PeriodRecord>> {
    let contents = fs::read_to_string(path)?;
    match serde_json::from_str(&contents) {
        Ok(records) => Ok(records),
        Err(e) => {
            warn!("Corrupt cache file {}: {} -- removing", path.display(), e);
            let _ = fs::remove_file(path);
            Err(TrendsError::CorruptCache {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}

/// Write a JSON record list to a temp file in the target directory, then
/// rename it over `path`, so an interrupted write never leaves a truncated
/// cache behind.
fn write_records(path: &Path, records: &[PeriodRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    write_atomic(path, json.as_bytes())
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}
