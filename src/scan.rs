//! Scan entry points: batch snippet preload and streaming line search.

use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::extract::{Extractor, LineMatchExtractor, SnippetExtractor};
use crate::pipeline::{self, CancelToken};
use crate::{Collected, FileRecord, MatchRecord, ScanOpts, ScanStats};

/// Run any extractor over `root` and collect every record. Returns after all workers have exited.
pub fn scan<E: Extractor>(
    root: &Path,
    opts: &ScanOpts,
    extractor: E,
    cancel: &CancelToken,
) -> Result<Collected<E::Record>> {
    let handles = pipeline::run_pipeline(root, opts, extractor, cancel)?;
    pipeline::collect_records(handles)
}

/// Collect one [`FileRecord`] per file under `root`. `on_record` sees each record as it arrives.
pub fn scan_snippets_with<F>(
    root: &Path,
    opts: &ScanOpts,
    cancel: &CancelToken,
    on_record: F,
) -> Result<Collected<FileRecord>>
where
    F: FnMut(&FileRecord),
{
    let handles = pipeline::run_pipeline(root, opts, SnippetExtractor, cancel)?;
    let collected = pipeline::collect_records_with(handles, on_record)?;
    debug!(
        "snippets: {} records from {} paths",
        collected.records.len(),
        collected.stats.paths_walked
    );
    Ok(collected)
}

/// Collect one [`FileRecord`] per file under `root`.
pub fn scan_snippets(
    root: &Path,
    opts: &ScanOpts,
    cancel: &CancelToken,
) -> Result<Collected<FileRecord>> {
    scan_snippets_with(root, opts, cancel, |_| {})
}

/// Snippet preload without cancellation or stats, for callers that only want the records.
pub fn load_file_records(root: &Path, opts: &ScanOpts) -> Result<Vec<FileRecord>> {
    Ok(scan_snippets(root, opts, &CancelToken::new())?.records)
}

/// Stream every line under `root` that contains `query` (case-insensitive) to `on_match` as soon
/// as a worker finds it. Order across files is unspecified; within a file, lines arrive in order.
pub fn search<F>(
    root: &Path,
    query: &str,
    opts: &ScanOpts,
    cancel: &CancelToken,
    on_match: F,
) -> Result<ScanStats>
where
    F: FnMut(MatchRecord),
{
    let handles = pipeline::run_pipeline(root, opts, LineMatchExtractor::new(query), cancel)?;
    pipeline::stream_records(handles, on_match)
}
