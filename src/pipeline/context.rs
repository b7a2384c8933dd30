//! Pipeline context: channels, cancel token and shared state passed into the walk and worker threads.

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender, bounded};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::ScanOpts;
use crate::utils::config::CANCEL_POLL_INTERVAL;

/// Shared cancel flag. Clone it into a Ctrl+C handler (or anywhere) and call [`cancel`](Self::cancel);
/// every blocking point of the pipeline notices within [`CANCEL_POLL_INTERVAL`].
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a cancellable send or receive gave up.
#[derive(Debug, PartialEq, Eq)]
pub enum Interrupted {
    /// The other side of the channel is gone.
    Disconnected,
    /// The cancel token fired while blocked.
    Cancelled,
}

/// Blocking send that re-checks `cancel` every poll interval.
pub fn send_or_cancel<T>(
    tx: &Sender<T>,
    mut item: T,
    cancel: &CancelToken,
) -> Result<(), Interrupted> {
    loop {
        if cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match tx.send_timeout(item, CANCEL_POLL_INTERVAL) {
            Ok(()) => return Ok(()),
            Err(SendTimeoutError::Timeout(back)) => item = back,
            Err(SendTimeoutError::Disconnected(_)) => return Err(Interrupted::Disconnected),
        }
    }
}

/// Blocking receive that re-checks `cancel` every poll interval.
pub fn recv_or_cancel<T>(rx: &Receiver<T>, cancel: &CancelToken) -> Result<T, Interrupted> {
    loop {
        if cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
            Ok(item) => return Ok(item),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Err(Interrupted::Disconnected),
        }
    }
}

/// Shared context for the walk thread: root, walk options, cancel flag and skip log.
pub struct WalkContext {
    pub root: PathBuf,
    pub exclude: Vec<String>,
    pub follow_links: bool,
    pub cancel: CancelToken,
    pub skipped_paths: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

/// Shared context for the worker threads.
#[derive(Clone)]
pub struct WorkerContext {
    pub cancel: CancelToken,
    pub files_processed: Arc<AtomicUsize>,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): receive records, then join.
pub struct PipelineHandles<R> {
    pub record_rx: Receiver<R>,
    pub walk_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<()>>,
    pub cancel: CancelToken,
    pub files_processed: Arc<AtomicUsize>,
    pub skipped_paths: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

/// Channels and shared state for one scan. Walk thread gets path_tx + walk_ctx; workers get path_rx, record_tx, worker_ctx.
pub struct PipelineChannels<R> {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub record_tx: Sender<R>,
    pub record_rx: Receiver<R>,
    pub files_processed: Arc<AtomicUsize>,
    pub skipped_paths: Arc<Mutex<Vec<(PathBuf, String)>>>,
    pub walk_ctx: WalkContext,
    pub worker_ctx: WorkerContext,
}

pub fn create_pipeline_channels<R>(
    root: &Path,
    opts: &ScanOpts,
    channel_cap: usize,
    cancel: &CancelToken,
) -> PipelineChannels<R> {
    let (path_tx, path_rx) = bounded::<PathBuf>(channel_cap);
    let (record_tx, record_rx) = bounded::<R>(channel_cap);
    let files_processed = Arc::new(AtomicUsize::new(0));
    let skipped_paths: Arc<Mutex<Vec<(PathBuf, String)>>> = Arc::new(Mutex::new(Vec::new()));

    let walk_ctx = WalkContext {
        root: root.to_path_buf(),
        exclude: opts.exclude.clone(),
        follow_links: opts.follow_links,
        cancel: cancel.clone(),
        skipped_paths: Arc::clone(&skipped_paths),
    };
    let worker_ctx = WorkerContext {
        cancel: cancel.clone(),
        files_processed: Arc::clone(&files_processed),
    };

    PipelineChannels {
        path_tx,
        path_rx,
        record_tx,
        record_rx,
        files_processed,
        skipped_paths,
        walk_ctx,
        worker_ctx,
    }
}
