//! Walk loop: visits the tree with walkdir and feeds every non-directory path to the worker pool.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use crate::engine::tools::is_excluded;

use super::context::{Interrupted, WalkContext, send_or_cancel};

/// One result from a directory walk: a path to emit, or an error with optional path.
pub enum WalkOutcome {
    Ok(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Directories are descended into, never emitted.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> Option<WalkOutcome> {
    match r {
        Ok(entry) if entry.file_type().is_dir() => None,
        Ok(entry) => Some(WalkOutcome::Ok(entry.into_path())),
        Err(err) => Some(WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

/// Walkdir iterator over `ctx.root`, pruning excluded entries (the root itself is never pruned).
fn walkdir_iter(ctx: &WalkContext) -> impl Iterator<Item = WalkOutcome> + '_ {
    let root: &Path = &ctx.root;
    WalkDir::new(root)
        .follow_links(ctx.follow_links)
        .into_iter()
        .filter_entry(move |e| e.depth() == 0 || !is_excluded(e.path(), &ctx.exclude))
        .filter_map(to_outcome_walkdir)
}

/// Spawn the walk thread. It returns the number of paths it sent.
pub fn spawn_walk_thread(path_tx: Sender<PathBuf>, ctx: WalkContext) -> Result<JoinHandle<usize>> {
    thread::Builder::new()
        .name(format!("{}-walk", env!("CARGO_PKG_NAME")))
        .spawn(move || {
            let iter = walkdir_iter(&ctx);
            run_walk_loop(path_tx, &ctx, iter)
        })
        .context("spawn walk thread")
}

/// Run the walk loop: consume `iter` of [`WalkOutcome`], send paths to `path_tx`, record errors
/// in `ctx.skipped_paths` and keep going. Drops `path_tx` when done so workers see the channel
/// close. Returns the count of paths sent.
pub fn run_walk_loop<I>(path_tx: Sender<PathBuf>, ctx: &WalkContext, iter: I) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok(path) => match send_or_cancel(&path_tx, path, &ctx.cancel) {
                Ok(()) => count += 1,
                Err(Interrupted::Cancelled) => {
                    debug!("walk: cancelled after {} paths", count);
                    break;
                }
                Err(Interrupted::Disconnected) => break,
            },
            WalkOutcome::Err { msg, path } => {
                warn!("Skipping entry: {}", msg);
                let to_push = path.unwrap_or_else(|| ctx.root.clone());
                ctx.skipped_paths.lock().unwrap().push((to_push, msg));
            }
        }
    }
    drop(path_tx);
    debug!("walk: done, {} paths sent", count);
    count
}
