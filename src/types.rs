//! Public and internal types for the seekr API and pipeline.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// One file discovered by a snippet scan: its path and a short preview of its leading content.
///
/// Unreadable files still get a record; their snippet is one of the sentinels in
/// [`Sentinels`](crate::utils::config::Sentinels).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub snippet: String,
}

/// How a line matched the query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The raw line contains the query verbatim (same case).
    Exact,
    /// The line contains the query only after lowercasing both.
    Partial,
}

/// One matching line from a line-match scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Serialized lossily: a non-UTF-8 name keeps its record, with U+FFFD for the bad bytes.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub file_path: PathBuf,
    /// 1-based line number.
    pub line_number: u64,
    /// The line as read from the file (not lowercased, line terminator stripped).
    pub match_text: String,
    pub match_kind: MatchKind,
}

fn serialize_path_lossy<S: Serializer>(path: &Path, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&path.to_string_lossy())
}

/// Per-scan accounting returned by every collector.
#[derive(Clone, Debug, Default)]
pub struct ScanStats {
    /// Paths the walker sent to the worker pool.
    pub paths_walked: usize,
    /// Paths a worker finished extracting. Equals `paths_walked` unless cancelled.
    pub files_processed: usize,
    /// Entries the walker could not visit, with the error message.
    pub skipped: Vec<(PathBuf, String)>,
    /// True when the scan stopped because its [`CancelToken`](crate::pipeline::CancelToken) fired.
    pub cancelled: bool,
}

/// Records gathered by a batch collect, plus the scan's accounting.
#[derive(Debug)]
pub struct Collected<R> {
    pub records: Vec<R>,
    pub stats: ScanStats,
}

/// Lib options for a scan. Every field has a usable default.
#[derive(Clone, Debug, Default)]
pub struct ScanOpts {
    /// Worker thread count. When None, [`DEFAULT_WORKERS`](crate::utils::config::DEFAULT_WORKERS).
    /// `Some(0)` is rejected.
    pub workers: Option<usize>,
    /// Capacity of the path and record channels. When None, [`DEFAULT_CHANNEL_CAP`](crate::utils::config::DEFAULT_CHANNEL_CAP).
    pub channel_cap: Option<usize>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `target`, `*.log`). Matching directories are pruned.
    pub exclude: Vec<String>,
}

/// Full options (CLI). Use [`ScanOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    pub scan: ScanOpts,
    /// Show debug logging and the preload progress counter.
    pub verbose: bool,
    /// Print match records as JSON lines instead of text blocks.
    pub json: bool,
}
