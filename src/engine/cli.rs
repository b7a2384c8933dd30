//! CLI entry: layer defaults < config file < env < flags into [`Opts`], then dispatch.

use anyhow::Result;
use log::{debug, warn};

use crate::Opts;
use crate::engine::arg_parser::{Cli, Commands, CommonArgs};
use crate::engine::handlers::{handle_browse, handle_search};
use crate::utils::seekr_toml::{SeekrToml, apply_file_to_opts, read_seekr_toml, seekr_toml_path};
use crate::utils::{cap_workers_by_fd_limit, setup_logging, workers_from_env};

/// Config file for this run. An explicit `--config` must load; the implicit per-dir file may be
/// broken, in which case the error is handed back for logging once the logger exists.
fn load_config_file(common: &CommonArgs) -> Result<(Option<SeekrToml>, Option<anyhow::Error>)> {
    match &common.config {
        Some(path) => match read_seekr_toml(path)? {
            Some(file) => Ok((Some(file), None)),
            None => Err(anyhow::anyhow!("config file {} not found", path.display())),
        },
        None => match read_seekr_toml(&seekr_toml_path(&common.dir)) {
            Ok(file) => Ok((file, None)),
            Err(e) => Ok((None, Some(e))),
        },
    }
}

/// Build opts from the config file, env and flags (later wins). Sets up logging.
pub fn build_opts(common: &CommonArgs, json_flag: Option<bool>) -> Result<Opts> {
    let (file, file_error) = load_config_file(common)?;
    let mut opts = Opts::default();
    if let Some(ref file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    if let Some(v) = common.verbose {
        opts.verbose = v;
    }
    setup_logging(opts.verbose);
    if let Some(e) = file_error {
        warn!("Ignoring config file: {:#}", e);
    }

    if let Some(n) = workers_from_env(&common.dir) {
        opts.scan.workers = Some(n);
    }
    if let Some(n) = common.workers {
        opts.scan.workers = Some(n);
    }
    if let Some(n) = opts.scan.workers
        && n > 0
    {
        let capped = cap_workers_by_fd_limit(n);
        if capped != n {
            warn!(
                "Requested {} workers; the open file limit allows {}",
                n, capped
            );
            opts.scan.workers = Some(capped);
        }
    }
    if let Some(n) = common.channel_cap {
        opts.scan.channel_cap = Some(n);
    }
    if !common.exclude.is_empty() {
        opts.scan.exclude = common.exclude.clone();
    }
    if let Some(v) = common.follow_links {
        opts.scan.follow_links = v;
    }
    if let Some(v) = json_flag {
        opts.json = v;
    }
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    Ok(opts)
}

/// Run the selected subcommand.
pub fn handle_run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Search {
            query,
            common,
            json,
        } => {
            let opts = build_opts(common, *json)?;
            handle_search(query, &common.dir, &opts)
        }
        Commands::Browse { common } => {
            let opts = build_opts(common, None)?;
            handle_browse(&common.dir, &opts)
        }
    }
}
