//! Command handlers for search and browse

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::output::{render_session, write_match};
use crate::engine::progress::{batched_counter, create_counter, refresh_bar, update_progress_bar};
use crate::pipeline::{CancelToken, report_scan_problems};
use crate::session::Session;
use crate::utils::config::{INTERRUPT_EXIT_CODE, PROGRESS_UPDATE_BATCH_SIZE};
use crate::{Opts, scan_snippets_with, search};

/// Ctrl+C state for one run: cancels the scan, or ends the process once interactive.
#[derive(Clone)]
struct Interrupt {
    cancel: CancelToken,
    exit_on_signal: Arc<AtomicBool>,
}

impl Interrupt {
    fn new() -> Self {
        Self {
            cancel: CancelToken::new(),
            exit_on_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true when the process should exit; otherwise cancels the running scan.
    fn on_signal(&self) -> bool {
        if self.exit_on_signal.load(Ordering::SeqCst) {
            return true;
        }
        self.cancel.cancel();
        false
    }

    /// From now on Ctrl+C exits instead of cancelling.
    fn exit_on_next_signal(&self) {
        self.exit_on_signal.store(true, Ordering::SeqCst);
    }
}

fn install_interrupt() -> Result<Interrupt> {
    let interrupt = Interrupt::new();
    let handler = interrupt.clone();
    ctrlc::set_handler(move || {
        if handler.on_signal() {
            std::process::exit(INTERRUPT_EXIT_CODE);
        }
    })
    .context("set Ctrl+C handler")?;
    Ok(interrupt)
}

/// Handle search command: stream match blocks to stdout in arrival order.
pub fn handle_search(query: &str, dir: &Path, opts: &Opts) -> Result<()> {
    let cancel = install_interrupt()?.cancel;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_error: Option<io::Error> = None;
    let mut matches = 0_usize;

    let stats = search(dir, query, &opts.scan, &cancel, |m| {
        if write_error.is_some() {
            return;
        }
        match write_match(&mut out, &m, opts.json) {
            Ok(()) => matches += 1,
            Err(e) => {
                // Nobody is reading any more; stop the scan.
                cancel.cancel();
                write_error = Some(e);
            }
        }
    })?;
    let _ = out.flush();

    match write_error {
        Some(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
        Some(e) => return Err(e).context("write match to stdout"),
        None => {}
    }
    report_scan_problems(&stats, opts.verbose);
    debug!(
        "search: {} matches in {} files",
        matches, stats.files_processed
    );
    Ok(())
}

/// Browse commands read from stdin; anything else replaces the query.
enum BrowseInput<'a> {
    Next,
    Prev,
    Select,
    Quit,
    Query(&'a str),
}

fn parse_browse_input(line: &str) -> BrowseInput<'_> {
    match line {
        ":n" => BrowseInput::Next,
        ":p" => BrowseInput::Prev,
        ":s" => BrowseInput::Select,
        ":q" => BrowseInput::Quit,
        q => BrowseInput::Query(q),
    }
}

/// Handle browse command: preload snippets, then refilter on every query line from stdin.
pub fn handle_browse(dir: &Path, opts: &Opts) -> Result<()> {
    let interrupt = install_interrupt()?;
    let cancel = interrupt.cancel.clone();
    let bar = opts.verbose.then(|| {
        let b = create_counter("Scanning");
        refresh_bar(&b);
        b
    });
    let mut tick = bar
        .clone()
        .map(|b| batched_counter(b, PROGRESS_UPDATE_BATCH_SIZE));

    let collected = scan_snippets_with(dir, &opts.scan, &cancel, |_| {
        if let Some(tick) = tick.as_mut() {
            tick();
        }
    })?;
    if let Some(ref b) = bar {
        update_progress_bar(b, collected.records.len() % PROGRESS_UPDATE_BATCH_SIZE);
        eprintln!();
    }
    report_scan_problems(&collected.stats, opts.verbose);
    if collected.stats.cancelled {
        return Ok(());
    }
    info!(
        "{} files loaded. Type to filter; :n/:p move, :s select, :q quit.",
        collected.records.len()
    );

    // The stdin read below blocks; Ctrl+C from here on ends the process.
    interrupt.exit_on_next_signal();
    if cancel.is_cancelled() {
        return Ok(());
    }

    let mut session = Session::new(collected.records);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.context("read query from stdin")?;
        match parse_browse_input(&line) {
            BrowseInput::Next => session.cursor_down(),
            BrowseInput::Prev => session.cursor_up(),
            BrowseInput::Quit => break,
            BrowseInput::Select => {
                if let Some(file) = session.selected() {
                    writeln!(out, "Selected file: {}", file.path.display())?;
                    writeln!(out, "Match snippet: {}", file.snippet)?;
                }
                break;
            }
            BrowseInput::Query(q) => session.set_query(q),
        }
        render_session(&mut out, &session)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_commands_parse() {
        assert!(matches!(parse_browse_input(":n"), BrowseInput::Next));
        assert!(matches!(parse_browse_input(":q"), BrowseInput::Quit));
        assert!(matches!(parse_browse_input(":s"), BrowseInput::Select));
        assert!(matches!(parse_browse_input("foo"), BrowseInput::Query("foo")));
        assert!(matches!(parse_browse_input(""), BrowseInput::Query("")));
    }

    #[test]
    fn interrupt_cancels_scan_then_exits() {
        let interrupt = Interrupt::new();
        assert!(!interrupt.on_signal());
        assert!(interrupt.cancel.is_cancelled());

        let interactive = Interrupt::new();
        interactive.exit_on_next_signal();
        assert!(interactive.on_signal());
        assert!(!interactive.cancel.is_cancelled());
    }
}
