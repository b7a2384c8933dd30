use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Concurrent directory content search.
#[derive(Clone, Parser)]
#[command(name = "seekr")]
#[command(about = "Search file contents under a directory, or browse file snippets interactively.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Print every line containing QUERY (case-insensitive), as soon as it is found.
    Search {
        /// Text to look for. Matched as a plain substring.
        #[arg(value_name = "QUERY")]
        query: String,

        #[command(flatten)]
        common: CommonArgs,

        /// Print one JSON object per match instead of text blocks.
        #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
        json: Option<bool>,
    },
    /// Preload a snippet of every file, then filter them by queries read from stdin.
    Browse {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Clone, Args)]
pub struct CommonArgs {
    /// Directory to search. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Worker thread count. Default: 4 (or `workers` in .seekr.toml, or SEEKR_WORKERS).
    #[arg(long, short = 'j', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Capacity of the path and record channels.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub channel_cap: Option<usize>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file to use instead of `.seekr.toml` in DIR. Errors in this file are fatal.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}
