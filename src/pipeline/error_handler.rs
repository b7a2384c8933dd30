use log::warn;

use crate::ScanStats;

/// Log what the walk skipped and whether the scan was cut short. Call after the collector returns.
pub fn report_scan_problems(stats: &ScanStats, verbose: bool) {
    if stats.cancelled {
        warn!(
            "Scan cancelled: {} of {} discovered files processed",
            stats.files_processed, stats.paths_walked
        );
    }
    let skipped = stats.skipped.len();
    if skipped > 0 {
        warn!(
            "Skipped {} paths due to permission errors or access issues",
            skipped
        );
        if verbose {
            for (p, msg) in &stats.skipped {
                eprintln!("  skipped: {} ({})", p.display(), msg);
            }
        }
    }
    if stats.paths_walked == 0 && !stats.cancelled {
        warn!("No files found");
    }
}
