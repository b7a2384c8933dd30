//! File descriptor limit detection for capping the CLI's worker count (Unix).

/// Descriptors a worker can hold at once: the file it is scanning plus slack for the walker's dir handles.
pub const FDS_PER_WORKER: usize = 2;

/// Fraction of the process FD limit the pool may use.
const FD_LIMIT_FRACTION: f64 = 0.5;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY is typically !0 or u64::MAX; treat as "no practical limit"
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Workers that fit in half the FD limit. `None` if no limit is available.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    if usable < FDS_PER_WORKER {
        return Some(1);
    }
    Some(usable / FDS_PER_WORKER)
}

/// Cap a requested worker count at `fd_cap`. Never returns 0 for a positive request.
pub fn cap_workers(requested: usize, fd_cap: Option<usize>) -> usize {
    match fd_cap {
        Some(cap) => requested.min(cap).max(1),
        None => requested,
    }
}

/// Cap a requested worker count at what the process FD limit allows.
pub fn cap_workers_by_fd_limit(requested: usize) -> usize {
    cap_workers(requested, max_workers_by_fd_limit())
}
