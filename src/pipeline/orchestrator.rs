use anyhow::{Result, bail};
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;

use crate::engine::tools::resolve_root;
use crate::extract::Extractor;
use crate::pipeline::{self, CancelToken, Interrupted, PipelineHandles, recv_or_cancel};
use crate::utils::config::{DEFAULT_CHANNEL_CAP, DEFAULT_WORKERS};
use crate::{Collected, ScanOpts, ScanStats};

/// Worker count for a scan: exactly the requested count, or the default. Zero is rejected.
pub fn resolve_workers(opts: &ScanOpts) -> Result<usize> {
    match opts.workers {
        Some(0) => bail!("worker count must be a positive integer"),
        Some(n) => Ok(n),
        None => Ok(DEFAULT_WORKERS),
    }
}

fn resolve_channel_cap(opts: &ScanOpts) -> Result<usize> {
    match opts.channel_cap {
        Some(0) => bail!("channel capacity must be a positive integer"),
        Some(n) => Ok(n),
        None => Ok(DEFAULT_CHANNEL_CAP),
    }
}

/// Start the walk + worker pipeline. Returns the record receiver and handles; the caller drains
/// `record_rx` (see [`collect_records`] / [`stream_records`]) which also joins the threads.
///
/// Walk → path channel → workers (extractor) → record channel.
pub fn run_pipeline<E: Extractor>(
    root: &Path,
    opts: &ScanOpts,
    extractor: E,
    cancel: &CancelToken,
) -> Result<PipelineHandles<E::Record>> {
    let num_workers = resolve_workers(opts)?;
    let channel_cap = resolve_channel_cap(opts)?;
    let root = resolve_root(root);
    if !root.exists() {
        warn!("{} does not exist; nothing to scan", root.display());
    }
    debug!(
        "pipeline: root={} workers={} channel_cap={}",
        root.display(),
        num_workers,
        channel_cap
    );

    let channels = pipeline::create_pipeline_channels(&root, opts, channel_cap, cancel);

    // Workers first: if spawning fails, dropping `channels` closes the path channel and the
    // workers already running exit.
    let worker_handles = pipeline::spawn_workers(
        channels.path_rx,
        &channels.record_tx,
        Arc::new(extractor),
        num_workers,
        &channels.worker_ctx,
    )?;

    // Dropping the last record sender held here lets the channel close once every worker exits.
    drop(channels.record_tx);

    let walk_handle = pipeline::spawn_walk_thread(channels.path_tx, channels.walk_ctx)?;

    Ok(PipelineHandles {
        record_rx: channels.record_rx,
        walk_handle,
        worker_handles,
        cancel: cancel.clone(),
        files_processed: channels.files_processed,
        skipped_paths: channels.skipped_paths,
    })
}

/// Join walk and worker threads (after the record stream is drained). Returns the walk's path count.
pub fn shutdown_pipeline_handles(
    walk_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<()>>,
) -> Result<usize> {
    let path_count = walk_handle
        .join()
        .map_err(|_| anyhow::anyhow!("walk thread panicked"))?;
    for (id, h) in worker_handles.into_iter().enumerate() {
        if h.join().is_err() {
            warn!("worker {} panicked", id);
        }
    }
    Ok(path_count)
}

/// Receive every record into `sink` until all workers have exited (or cancel), then join.
fn drain_records<R, F>(handles: PipelineHandles<R>, mut sink: F) -> Result<ScanStats>
where
    F: FnMut(R),
{
    let PipelineHandles {
        record_rx,
        walk_handle,
        worker_handles,
        cancel,
        files_processed,
        skipped_paths,
    } = handles;

    let mut received = 0_usize;
    let interrupted = loop {
        match recv_or_cancel(&record_rx, &cancel) {
            Ok(record) => {
                received += 1;
                sink(record);
            }
            Err(Interrupted::Disconnected) => break false,
            Err(Interrupted::Cancelled) => break true,
        }
    };
    // Workers still blocked on send see the disconnect and exit.
    drop(record_rx);
    debug!(
        "collector: channel closed, {} records (interrupted: {})",
        received, interrupted
    );

    let paths_walked = shutdown_pipeline_handles(walk_handle, worker_handles)?;
    let files_processed = files_processed.load(Ordering::Relaxed);
    let skipped = skipped_paths
        .lock()
        .map(|mut guard| std::mem::take(&mut *guard))
        .unwrap_or_default();

    Ok(ScanStats {
        paths_walked,
        files_processed,
        skipped,
        cancelled: interrupted || (cancel.is_cancelled() && files_processed < paths_walked),
    })
}

/// Batch collector: gather every record, returning only after all workers have finished.
pub fn collect_records<R>(handles: PipelineHandles<R>) -> Result<Collected<R>> {
    collect_records_with(handles, |_| {})
}

/// Like [`collect_records`], calling `on_record` for each record as it arrives (e.g. progress).
pub fn collect_records_with<R, F>(
    handles: PipelineHandles<R>,
    mut on_record: F,
) -> Result<Collected<R>>
where
    F: FnMut(&R),
{
    let mut records = Vec::new();
    let stats = drain_records(handles, |record| {
        on_record(&record);
        records.push(record);
    })?;
    Ok(Collected { records, stats })
}

/// Stream collector: forward each record to `sink` in arrival order, then join.
pub fn stream_records<R, F>(handles: PipelineHandles<R>, sink: F) -> Result<ScanStats>
where
    F: FnMut(R),
{
    drain_records(handles, sink)
}
