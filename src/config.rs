use std::path::PathBuf;

/// Date format of the `Date` column in raw price-history files.
pub const RAW_DATE_FORMAT: &str = "%m/%d/%Y";

/// Date format whose common prefix labels a chart cell (`20JAN02`).
pub const LABEL_DATE_FORMAT: &str = "%y%b%d";

pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_CHARTS_DIR: &str = "charts";

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("cse-trends")
    } else {
        PathBuf::from(".cse-trends-cache")
    }
}

// ---------------------------------------------------------------------------
// SeriesConfig
// ---------------------------------------------------------------------------

/// Per-instrument settings, selected at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesConfig {
    /// Stable id naming the cache artifact (e.g. `"cse-aspi"`).
    pub id: String,
    /// Raw files whose name starts with this prefix belong to the series.
    pub raw_prefix: String,
    /// Id of the exchange-rate series used for the USD view, if any.
    pub aux_series: Option<String>,
    /// Chart heading.
    pub title: String,
}

impl SeriesConfig {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            raw_prefix: id.to_string(),
            aux_series: None,
            title: title.to_string(),
        }
    }

    /// Designate an exchange-rate series for the cross-currency view.
    pub fn with_aux_series(mut self, aux_id: &str) -> Self {
        self.aux_series = Some(aux_id.to_string());
        self
    }

    /// Colombo Stock Exchange All Share Index, convertible to USD via `usd-lkr`.
    pub fn cse_aspi() -> Self {
        Self::new(
            "cse-aspi",
            "Colombo Stock Exchange (CSE) - All Share Index (ASPI)",
        )
        .with_aux_series("usd-lkr")
    }

    /// US dollar to Sri Lankan rupee exchange rate.
    pub fn usd_lkr() -> Self {
        Self::new("usd-lkr", "USD/LKR Exchange Rate")
    }

    pub fn known() -> Vec<Self> {
        vec![Self::cse_aspi(), Self::usd_lkr()]
    }

    /// Look up a preset by id.
    pub fn by_id(id: &str) -> Option<Self> {
        Self::known().into_iter().find(|s| s.id == id)
    }
}
