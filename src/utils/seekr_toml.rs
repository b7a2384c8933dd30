//! Load `.seekr.toml` from the searched directory (CLI only). Lib callers pass [`ScanOpts`](crate::ScanOpts) directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SeekrToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    workers: Option<usize>,
    channel_cap: Option<usize>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    verbose: Option<bool>,
    json: Option<bool>,
}

/// Parse config text. Errors are returned so the caller decides whether they matter.
pub(crate) fn parse_seekr_toml(s: &str) -> Result<SeekrToml, toml::de::Error> {
    toml::from_str(s)
}

/// Read and parse a config file. Missing file is `Ok(None)`; unreadable or invalid is an error.
pub(crate) fn read_seekr_toml(path: &Path) -> Result<Option<SeekrToml>> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let parsed = parse_seekr_toml(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(parsed))
}

/// Path of the per-directory config file for `dir`.
pub(crate) fn seekr_toml_path(dir: &Path) -> PathBuf {
    dir.join(PackagePaths::get().config_filename())
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $($opts_field:ident).+) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$($opts_field).+ = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub(crate) fn apply_file_to_opts(file: &SeekrToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(n) = s.workers {
        opts.scan.workers = Some(n);
    }
    if let Some(n) = s.channel_cap {
        opts.scan.channel_cap = Some(n);
    }
    apply_file_opt!(s, opts, follow_links => scan.follow_links);
    if let Some(ref v) = s.exclude {
        opts.scan.exclude = v.clone();
    }
    apply_file_opt!(s, opts, verbose => verbose);
    apply_file_opt!(s, opts, json => json);
}
