//! Usage dataset loader
//!
//! Reads the tab-separated Wikimedia browser/OS dataset into [`UsageRecord`]s.
//! Malformed lines are skipped and counted; after parsing, the records are
//! trimmed to the year ending at the latest date present.

use super::LoadedDataset;
use crate::errors::{AppError, AppResult};
use crate::types::statistics::LoadStats;
use crate::types::UsageRecord;
use crate::utils::time::{date_range, one_year_before};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Source name used in [`AppError::SourceUnavailable`]
pub const USAGE_SOURCE: &str = "browser usage statistics";

/// Load and window the usage dataset at `path`
pub fn load_usage(path: &Path) -> AppResult<LoadedDataset<UsageRecord>> {
    let file = File::open(path).map_err(|e| {
        AppError::source_unavailable(USAGE_SOURCE, format!("{}: {}", path.display(), e))
    })?;

    info!("Loading usage statistics from {}", path.display());
    let loaded = read_usage(file)?;
    info!("Usage statistics: {}", loaded.stats.summary());
    Ok(loaded)
}

/// Parse usage lines from any reader and apply the one-year window
pub fn read_usage<R: Read>(reader: R) -> AppResult<LoadedDataset<UsageRecord>> {
    let mut stats = LoadStats::new();
    let mut records = Vec::new();

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut row = StringRecord::new();
    loop {
        match csv_reader.read_record(&mut row) {
            Ok(false) => break,
            Ok(true) => {
                stats.total_records += 1;
                let line = row.position().map(|p| p.line()).unwrap_or(0);
                match UsageRecord::from_fields(row.iter()) {
                    Ok(record) => records.push(record),
                    Err(reason) => {
                        stats.malformed_records += 1;
                        debug!("Skipping malformed usage line {}: {}", line, reason);
                    }
                }
            }
            Err(e) if e.is_io_error() => return Err(AppError::Csv(e)),
            Err(e) => {
                stats.total_records += 1;
                stats.malformed_records += 1;
                debug!("Skipping unreadable usage line: {}", e);
            }
        }
    }

    let records = apply_window(records, &mut stats);
    stats.records_loaded = records.len();
    stats.timing.finish();

    Ok(LoadedDataset { records, stats })
}

/// Keep records dated strictly after one year before the latest date
pub fn apply_window(records: Vec<UsageRecord>, stats: &mut LoadStats) -> Vec<UsageRecord> {
    let Some((_, latest)) = date_range(records.iter().map(|r| r.date)) else {
        return records;
    };
    let Some(cutoff) = one_year_before(latest) else {
        return records;
    };

    let before = records.len();
    let kept: Vec<UsageRecord> = records.into_iter().filter(|r| r.date > cutoff).collect();
    stats.outside_window += before - kept.len();

    debug!(
        "Usage window after {} keeps {} of {} records",
        cutoff,
        kept.len(),
        before
    );
    kept
}
