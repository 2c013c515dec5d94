//! JSON export, backups, and output file naming.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::error::ScraperError;
use crate::flashscore::MatchRecord;

/// File-name-friendly league name from the URL: the last two path segments
/// joined with `_`, dashes flattened; falls back to the last segment, then to
/// a generic name.
pub fn league_name_from_url(league_url: &str) -> String {
    let clean = league_url.trim_end_matches('/');
    let clean = clean.split('?').next().unwrap_or(clean);
    let parts: Vec<&str> = clean.split('/').collect();

    match parts.as_slice() {
        [.., second_last, last] if parts.len() >= 3 => {
            format!("{}_{}", second_last, last).replace('-', "_")
        }
        [.., last] if !last.is_empty() => last.replace('-', "_"),
        _ => "flashscore_data".to_string(),
    }
}

/// Default output base name: league name plus a run timestamp.
pub fn default_output_name(league_name: &str) -> String {
    format!("{}_{}", league_name, Local::now().format("%Y%m%d_%H%M%S"))
}

/// Write the records as a pretty-printed JSON array to
/// `<output_dir>/<base_name>.json`, creating the directory as needed.
pub fn export_to_json(
    records: &[MatchRecord],
    output_dir: &Path,
    base_name: &str,
) -> Result<PathBuf, ScraperError> {
    std::fs::create_dir_all(output_dir)?;
    let filepath = output_dir.join(format!("{}.json", base_name));

    let json = serde_json::to_string_pretty(records).map_err(|e| ScraperError::Json(e.to_string()))?;
    std::fs::write(&filepath, json)?;

    info!("Exported {} records to {:?}", records.len(), filepath);
    Ok(filepath)
}

/// Copy an existing output file into the backup directory under a timestamped
/// name before it gets overwritten. Backup failures are logged, not fatal.
pub fn create_backup(file: &Path, league_name: &str, backup_dir: &Path) {
    if !file.exists() {
        return;
    }

    let result = (|| -> Result<PathBuf, ScraperError> {
        std::fs::create_dir_all(backup_dir)?;
        let original_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path =
            backup_dir.join(format!("{}_{}_{}", league_name, timestamp, original_name));
        std::fs::copy(file, &backup_path)?;
        Ok(backup_path)
    })();

    match result {
        Ok(path) => info!("Backup created: {:?}", path),
        Err(e) => warn!("Failed to back up {:?}: {}", file, e),
    }
}
