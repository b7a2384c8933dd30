//! Query filter over collected [`FileRecord`]s.
//!
//! Pure and order-preserving: the same `(records, query)` always gives the same subset, in input
//! order. An empty query selects nothing.

use crate::FileRecord;

/// True when the lowercase path or snippet contains `query_lower`.
fn record_matches(record: &FileRecord, query_lower: &str) -> bool {
    record
        .path
        .to_string_lossy()
        .to_lowercase()
        .contains(query_lower)
        || record.snippet.to_lowercase().contains(query_lower)
}

/// Indices into `records` of the entries matching `query`, ascending.
pub fn filter_indices(records: &[FileRecord], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    let query_lower = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| record_matches(r, &query_lower))
        .map(|(i, _)| i)
        .collect()
}

/// Records whose path or snippet contains `query`, case-insensitively.
pub fn filter_records<'a>(records: &'a [FileRecord], query: &str) -> Vec<&'a FileRecord> {
    filter_indices(records, query)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}
