//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    workers_env_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                workers_env_key: format!("{}_WORKERS", pkg.to_uppercase()),
            }
        })
    }

    /// Per-directory config file, e.g. `.seekr.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable overriding the worker count, e.g. `SEEKR_WORKERS`.
    pub fn workers_env_key(&self) -> &str {
        &self.workers_env_key
    }
}

// ---- Worker threads ----

/// Worker count when the caller does not supply one.
pub const DEFAULT_WORKERS: usize = 4;

// ---- Channels ----

/// Capacity of the path and record channels. Bounded so a huge tree cannot run far ahead of the workers.
pub const DEFAULT_CHANNEL_CAP: usize = 100;

/// How long a blocking send/recv waits before re-checking the cancel token.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---- Snippets ----

/// Snippet extraction limits.
pub struct SnippetConsts;

impl SnippetConsts {
    /// Characters kept before the snippet is cut.
    pub const MAX_CHARS: usize = 200;
    /// Bytes read per line at most. Four bytes per char covers any UTF-8 text, so a line
    /// this long always passes the cut.
    pub const MAX_LINE_BYTES: u64 = (Self::MAX_CHARS as u64) * 4 + 4;
    /// Appended when the snippet was cut.
    pub const ELLIPSIS: &'static str = "...";
    /// Joins consecutive lines.
    pub const LINE_SEPARATOR: &'static str = " ";
}

/// Snippet text stored for files that could not be read.
pub struct Sentinels;

impl Sentinels {
    pub const OPEN_FAILED: &'static str = "(could not read file)";
    pub const READ_FAILED: &'static str = "(error while reading file)";
}

/// Exit status after Ctrl+C in the browse loop (128 + SIGINT).
pub const INTERRUPT_EXIT_CODE: i32 = 130;

// ---- Progress ----

/// Records between progress bar updates during the browse preload (reduce lock contention).
pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 50;
