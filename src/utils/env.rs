//! Worker count override: env var → .env in the searched dir.

use log::warn;
use std::path::Path;

use crate::utils::config::PackagePaths;

fn parse_workers(key: &str, raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!("Ignoring {}={:?}: expected a positive integer", key, raw);
            None
        }
    }
}

/// Read `SEEKR_WORKERS` from the environment, then from `dir/.env`. None when unset or invalid.
pub fn workers_from_env(dir: &Path) -> Option<usize> {
    let key = PackagePaths::get().workers_env_key();
    if let Ok(s) = std::env::var(key) {
        return parse_workers(key, &s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Ok(s) = std::env::var(key) {
            return parse_workers(key, &s);
        }
    }
    None
}
