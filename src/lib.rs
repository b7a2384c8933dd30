//! Seekr: concurrent directory content search.
//!
//! A walk thread feeds file paths through a bounded channel to a fixed worker pool; workers run
//! an [`Extractor`](extract::Extractor) on each file and send records through a second bounded
//! channel to a collector on the caller's thread.
//!
//! - [`search`] streams [`MatchRecord`]s for every line containing a query.
//! - [`scan_snippets`] / [`load_file_records`] collect one [`FileRecord`] per file, which
//!   [`filter_records`] (or a [`Session`]) narrows as the query changes.

pub mod engine;
pub mod extract;
pub mod filter;
pub mod pipeline;
pub mod scan;
pub mod session;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use filter::{filter_indices, filter_records};
pub use pipeline::CancelToken;
pub use scan::{load_file_records, scan, scan_snippets, scan_snippets_with, search};
pub use session::Session;

/// Result alias used by public seekr API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
