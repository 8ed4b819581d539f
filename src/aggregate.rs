//! Grouping of period records by calendar key and folding of each group.

use crate::models::{Granularity, PeriodRecord};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Partition records by `key_fn(date_start)`.
///
/// Groups are keyed in ascending order and each group is sorted by
/// `date_start`.
pub fn group_by<K, F>(records: &[PeriodRecord], key_fn: F) -> BTreeMap<K, Vec<PeriodRecord>>
where
    K: Ord,
    F: Fn(&PeriodRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<PeriodRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key_fn(record)).or_default().push(record.clone());
    }
    for group in groups.values_mut() {
        group.sort_by_key(|r| r.date_start);
    }
    groups
}

/// Fold a group sorted by `date_start` into one record.
///
/// Returns `None` for an empty group.
pub fn fold(group: &[PeriodRecord]) -> Option<PeriodRecord> {
    let first = group.first()?;
    let last = group.last()?;

    let mut folded = PeriodRecord {
        date_start: first.date_start,
        date_end: first.date_end,
        price_close: last.price_close,
        price_open: first.price_open,
        price_high: f64::NEG_INFINITY,
        price_low: f64::INFINITY,
        volume: 0.0,
    };
    for record in group {
        folded.date_end = folded.date_end.max(record.date_end);
        folded.price_high = folded.price_high.max(record.price_high);
        folded.price_low = folded.price_low.min(record.price_low);
        folded.volume += record.volume;
    }
    Some(folded)
}

/// Group by an arbitrary key and fold each group, ascending by key.
pub fn aggregate_by<K, F>(records: &[PeriodRecord], key_fn: F) -> Vec<PeriodRecord>
where
    K: Ord,
    F: Fn(&PeriodRecord) -> K,
{
    group_by(records, key_fn)
        .values()
        .filter_map(|group| fold(group))
        .collect()
}

/// Aggregate at a calendar granularity.
pub fn aggregate(records: &[PeriodRecord], granularity: Granularity) -> Vec<PeriodRecord> {
    aggregate_by(records, |r| granularity.key(r.date_start))
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Memoizes aggregates per `(series id, granularity)`.
///
/// The series id stands in for the identity of the record list: callers
/// must pass the same records for the same id within one run.
#[derive(Default)]
pub struct Aggregator {
    memo: HashMap<(String, Granularity), Vec<PeriodRecord>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate `records` of `series_id`, reusing an earlier result for the
    /// same key.
    pub fn aggregate(
        &mut self,
        series_id: &str,
        records: &[PeriodRecord],
        granularity: Granularity,
    ) -> &[PeriodRecord] {
        let key = (series_id.to_string(), granularity);
        if self.memo.contains_key(&key) {
            debug!("Aggregate memo hit for {} {}", series_id, granularity);
        }
        self.memo
            .entry(key)
            .or_insert_with(|| aggregate(records, granularity))
    }

    pub fn is_cached(&self, series_id: &str, granularity: Granularity) -> bool {
        self.memo
            .contains_key(&(series_id.to_string(), granularity))
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }
}
