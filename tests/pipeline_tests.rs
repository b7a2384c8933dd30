//! End-to-end pipeline tests on temporary directory trees.

use crossbeam_channel::bounded;
use seekr::extract::{Extractor, LineMatchExtractor, SnippetExtractor};
use seekr::pipeline::{Interrupted, recv_or_cancel, resolve_workers, send_or_cancel};
use seekr::utils::config::{DEFAULT_WORKERS, Sentinels};
use seekr::{
    CancelToken, FileRecord, MatchKind, MatchRecord, ScanOpts, load_file_records, scan,
    scan_snippets, search,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Tree with nested dirs and an empty dir.
fn sample_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "a.txt", "hello world\n");
    write(root, "b.txt", "goodbye\n");
    write(root, "nested/c.md", "Hello again\nno match here\nsay HELLO\n");
    write(root, "nested/deeper/d.rs", "fn main() {}\n");
    fs::create_dir_all(root.join("empty")).unwrap();
    dir
}

fn opts(workers: usize) -> ScanOpts {
    ScanOpts {
        workers: Some(workers),
        ..Default::default()
    }
}

fn canonical(root: &Path, rel: &str) -> PathBuf {
    root.canonicalize().unwrap().join(rel)
}

fn search_all(root: &Path, query: &str, workers: usize) -> Vec<MatchRecord> {
    let mut out = Vec::new();
    search(root, query, &opts(workers), &CancelToken::new(), |m| {
        out.push(m)
    })
    .unwrap();
    out
}

// --- walker ---

#[test]
fn test_walk_emits_every_file_and_no_dirs() {
    let dir = sample_tree();
    let records = load_file_records(dir.path(), &ScanOpts::default()).unwrap();
    let got: BTreeSet<PathBuf> = records.into_iter().map(|r| r.path).collect();
    let want: BTreeSet<PathBuf> = ["a.txt", "b.txt", "nested/c.md", "nested/deeper/d.rs"]
        .iter()
        .map(|rel| canonical(dir.path(), rel))
        .collect();
    assert_eq!(got, want);
}

#[test]
fn test_walk_paths_are_absolute() {
    let dir = sample_tree();
    let records = load_file_records(dir.path(), &ScanOpts::default()).unwrap();
    assert!(records.iter().all(|r| r.path.is_absolute()));
}

#[test]
fn test_missing_root_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let collected = scan_snippets(&missing, &ScanOpts::default(), &CancelToken::new()).unwrap();
    assert!(collected.records.is_empty());
    assert_eq!(collected.stats.paths_walked, 0);
    assert_eq!(collected.stats.skipped.len(), 1);
    assert!(!collected.stats.cancelled);
}

#[test]
fn test_exclude_prunes_directories() {
    let dir = sample_tree();
    let scan_opts = ScanOpts {
        exclude: vec!["nested".to_string()],
        ..Default::default()
    };
    let records = load_file_records(dir.path(), &scan_opts).unwrap();
    let mut names: Vec<String> = records
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_root_may_be_a_file() {
    let dir = sample_tree();
    let records = load_file_records(&dir.path().join("a.txt"), &ScanOpts::default()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].snippet, "hello world");
}

// --- worker pool accounting ---

/// Counts extract calls and emits each path back.
struct CountingExtractor(Arc<AtomicUsize>);

impl Extractor for CountingExtractor {
    type Record = PathBuf;

    fn extract(&self, path: &Path, emit: &mut dyn FnMut(PathBuf) -> bool) {
        self.0.fetch_add(1, Ordering::SeqCst);
        emit(path.to_path_buf());
    }
}

#[test]
fn test_every_file_processed_exactly_once_for_any_pool_size() {
    let dir = tempfile::tempdir().unwrap();
    let file_count = 37;
    for i in 0..file_count {
        write(dir.path(), &format!("d{}/f{}.txt", i % 5, i), "x");
    }
    for workers in [1, 2, 3, 8, file_count] {
        let calls = Arc::new(AtomicUsize::new(0));
        let collected = scan(
            dir.path(),
            &opts(workers),
            CountingExtractor(Arc::clone(&calls)),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), file_count, "workers={}", workers);
        assert_eq!(collected.stats.paths_walked, file_count);
        assert_eq!(collected.stats.files_processed, file_count);
        let unique: BTreeSet<PathBuf> = collected.records.into_iter().collect();
        assert_eq!(unique.len(), file_count, "workers={}", workers);
    }
}

#[test]
fn test_small_channel_still_drains() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..50 {
        write(dir.path(), &format!("f{}.txt", i), "needle\nneedle\n");
    }
    let scan_opts = ScanOpts {
        workers: Some(2),
        channel_cap: Some(1),
        ..Default::default()
    };
    let mut count = 0;
    let stats = search(dir.path(), "needle", &scan_opts, &CancelToken::new(), |_| {
        count += 1
    })
    .unwrap();
    assert_eq!(count, 100);
    assert_eq!(stats.files_processed, 50);
}

#[test]
fn test_zero_workers_is_rejected() {
    let dir = sample_tree();
    assert!(load_file_records(dir.path(), &opts(0)).is_err());
}

#[test]
fn test_requested_worker_count_is_used_as_is() {
    assert_eq!(resolve_workers(&opts(512)).unwrap(), 512);
    assert_eq!(resolve_workers(&opts(1)).unwrap(), 1);
    assert_eq!(
        resolve_workers(&ScanOpts::default()).unwrap(),
        DEFAULT_WORKERS
    );
}

#[test]
fn test_zero_channel_cap_is_rejected() {
    let dir = sample_tree();
    let scan_opts = ScanOpts {
        channel_cap: Some(0),
        ..Default::default()
    };
    assert!(load_file_records(dir.path(), &scan_opts).is_err());
}

// --- cancellation ---

#[test]
fn test_recv_reports_disconnect_after_drain() {
    let (tx, rx) = bounded::<u8>(2);
    tx.send(1).unwrap();
    drop(tx);
    let cancel = CancelToken::new();
    assert_eq!(recv_or_cancel(&rx, &cancel), Ok(1));
    assert_eq!(recv_or_cancel(&rx, &cancel), Err(Interrupted::Disconnected));
}

#[test]
fn test_send_on_full_channel_gives_up_when_cancelled() {
    let (tx, _rx) = bounded::<u8>(1);
    tx.send(1).unwrap();
    let cancel = CancelToken::new();
    let c = cancel.clone();
    let h = std::thread::spawn(move || send_or_cancel(&tx, 2, &c));
    cancel.cancel();
    assert_eq!(h.join().unwrap(), Err(Interrupted::Cancelled));
}

#[test]
fn test_cancel_before_start_returns_promptly() {
    let dir = sample_tree();
    let cancel = CancelToken::new();
    cancel.cancel();
    let collected = scan_snippets(dir.path(), &ScanOpts::default(), &cancel).unwrap();
    assert!(collected.stats.cancelled);
    assert!(collected.records.is_empty());
}

#[test]
fn test_cancel_from_sink_stops_scan() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..500 {
        write(dir.path(), &format!("f{}.txt", i), "hit\n");
    }
    let cancel = CancelToken::new();
    let mut seen = 0;
    let stats = search(dir.path(), "hit", &opts(2), &cancel, |_| {
        seen += 1;
        if seen == 3 {
            cancel.cancel();
        }
    })
    .unwrap();
    assert!(stats.cancelled);
    assert!(seen < 500);
}

// --- snippet extraction ---

#[test]
fn test_snippet_joins_lines_with_space() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "multi.txt", "first\nsecond\r\nthird");
    let records = load_file_records(dir.path(), &ScanOpts::default()).unwrap();
    assert_eq!(records[0].snippet, "first second third");
}

#[test]
fn test_snippet_long_file_is_cut() {
    let dir = tempfile::tempdir().unwrap();
    let body = (0..100).map(|i| format!("line {}\n", i)).collect::<String>();
    write(dir.path(), "long.txt", &body);
    let records = load_file_records(dir.path(), &ScanOpts::default()).unwrap();
    let snippet = &records[0].snippet;
    assert_eq!(snippet.chars().count(), 203);
    assert!(snippet.starts_with("line 0 line 1 "));
    assert!(snippet.ends_with("..."));
}

#[test]
fn test_snippet_one_record_per_file_even_when_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.txt");
    let mut records: Vec<FileRecord> = Vec::new();
    SnippetExtractor.extract(&path, &mut |r: FileRecord| {
        records.push(r);
        true
    });
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].snippet, Sentinels::OPEN_FAILED);
}

#[cfg(unix)]
#[test]
fn test_snippet_read_failure_uses_second_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    // Opening a directory succeeds on unix; reading it fails.
    let mut records: Vec<FileRecord> = Vec::new();
    SnippetExtractor.extract(dir.path(), &mut |r: FileRecord| {
        records.push(r);
        true
    });
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].snippet, Sentinels::READ_FAILED);
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_gets_sentinel_record() {
    let dir = sample_tree();
    std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling")).unwrap();
    let records = load_file_records(dir.path(), &ScanOpts::default()).unwrap();
    assert_eq!(records.len(), 5);
    let dangling = records
        .iter()
        .find(|r| r.path.ends_with("dangling"))
        .unwrap();
    assert_eq!(dangling.snippet, Sentinels::OPEN_FAILED);
}

// --- line-match search ---

#[test]
fn test_search_hello_finds_only_a_txt() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "hello world");
    write(dir.path(), "b.txt", "goodbye");
    let matches = search_all(dir.path(), "hello", 4);
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert!(m.file_path.ends_with("a.txt"));
    assert_eq!(m.line_number, 1);
    assert_eq!(m.match_text, "hello world");
    assert_eq!(m.match_kind, MatchKind::Exact);
}

#[test]
fn test_search_reports_each_matching_line_in_order() {
    let dir = sample_tree();
    let matches: Vec<MatchRecord> = search_all(dir.path(), "hello", 2)
        .into_iter()
        .filter(|m| m.file_path.ends_with("c.md"))
        .collect();
    let lines: Vec<(u64, &str, MatchKind)> = matches
        .iter()
        .map(|m| (m.line_number, m.match_text.as_str(), m.match_kind))
        .collect();
    assert_eq!(
        lines,
        vec![
            (1, "Hello again", MatchKind::Partial),
            (3, "say HELLO", MatchKind::Partial),
        ]
    );
}

#[test]
fn test_search_absent_query_yields_nothing() {
    let dir = sample_tree();
    assert!(search_all(dir.path(), "zzz-not-here", 3).is_empty());
}

#[test]
fn test_search_same_results_for_any_pool_size() {
    let dir = sample_tree();
    let key = |m: &MatchRecord| (m.file_path.clone(), m.line_number);
    let single: BTreeSet<_> = search_all(dir.path(), "e", 1).iter().map(key).collect();
    let many: BTreeSet<_> = search_all(dir.path(), "e", 8).iter().map(key).collect();
    assert!(!single.is_empty());
    assert_eq!(single, many);
}

#[cfg(unix)]
#[test]
fn test_search_skips_unreadable_file_and_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "good.txt", "a needle here\n");
    write(root, "sub/other.txt", "nothing\nNEEDLE too\n");
    // Open fails.
    std::os::unix::fs::symlink(root.join("nowhere"), root.join("dangling")).unwrap();
    // Not followed by the walker; opens as a directory, so the first read fails.
    std::os::unix::fs::symlink(root.join("sub"), root.join("dir-link")).unwrap();

    let mut found: Vec<(String, u64)> = Vec::new();
    let stats = search(root, "needle", &opts(2), &CancelToken::new(), |m| {
        let name = m.file_path.file_name().unwrap().to_string_lossy().into_owned();
        found.push((name, m.line_number));
    })
    .unwrap();
    found.sort();

    assert_eq!(
        found,
        vec![("good.txt".to_string(), 1), ("other.txt".to_string(), 2)]
    );
    assert_eq!(stats.paths_walked, 4);
    assert_eq!(stats.files_processed, 4);
    assert!(!stats.cancelled);
}

#[cfg(unix)]
#[test]
fn test_line_match_read_failure_yields_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut records: Vec<MatchRecord> = Vec::new();
    LineMatchExtractor::new("").extract(dir.path(), &mut |r: MatchRecord| {
        records.push(r);
        true
    });
    assert!(records.is_empty());
}
