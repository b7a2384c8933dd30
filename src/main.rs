//! Seekr CLI: `search` streams matching lines; `browse` filters preloaded file snippets.

use anyhow::Result;
use clap::Parser;
use seekr::engine::arg_parser::Cli;
use seekr::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
