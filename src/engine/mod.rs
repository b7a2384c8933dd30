//! Engine module: CLI parsing, command handlers and terminal output

pub mod arg_parser;
pub mod cli;
pub mod handlers;
pub mod output;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, CommonArgs};
pub use cli::{build_opts, handle_run};
pub use handlers::{handle_browse, handle_search};
pub use output::{BLOCK_RULE, Colors, format_match_block, render_session, write_match};
pub use tools::{glob_match, is_excluded, resolve_root};
