use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};

use crate::extract::Extractor;

use super::context::{Interrupted, WorkerContext, recv_or_cancel, send_or_cancel};

/// Single worker: take paths from path_rx until it closes (or cancel), extract, send records on record_tx.
fn worker_loop<E: Extractor>(
    id: usize,
    path_rx: Receiver<PathBuf>,
    record_tx: Sender<E::Record>,
    extractor: Arc<E>,
    ctx: WorkerContext,
) {
    let mut handled = 0_usize;
    let mut send_failed = false;
    while let Ok(path) = recv_or_cancel(&path_rx, &ctx.cancel) {
        extractor.extract(&path, &mut |record: E::Record| {
            match send_or_cancel(&record_tx, record, &ctx.cancel) {
                Ok(()) => true,
                Err(Interrupted::Cancelled | Interrupted::Disconnected) => {
                    send_failed = true;
                    false
                }
            }
        });
        if send_failed {
            break;
        }
        ctx.files_processed.fetch_add(1, Ordering::Relaxed);
        handled += 1;
    }
    debug!("worker {}: exiting after {} files", id, handled);
    drop(record_tx);
}

/// Spawn `num_workers` workers sharing one extractor. Each holds its own clone of `record_tx`;
/// the caller must drop its sender after this so the record channel closes when the last worker exits.
pub fn spawn_workers<E: Extractor>(
    path_rx: Receiver<PathBuf>,
    record_tx: &Sender<E::Record>,
    extractor: Arc<E>,
    num_workers: usize,
    ctx: &WorkerContext,
) -> Result<Vec<JoinHandle<()>>> {
    (0..num_workers)
        .map(|id| {
            let path_rx = path_rx.clone();
            let record_tx = record_tx.clone();
            let extractor = Arc::clone(&extractor);
            let ctx = ctx.clone();
            thread::Builder::new()
                .name(format!("{}-worker-{}", env!("CARGO_PKG_NAME"), id))
                .spawn(move || worker_loop(id, path_rx, record_tx, extractor, ctx))
                .with_context(|| format!("spawn worker {}", id))
        })
        .collect()
}
