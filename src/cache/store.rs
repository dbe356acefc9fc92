//! Report persistence
//!
//! The current report lives in one file; superseded reports are renamed to a
//! dated archive name and never touched again.

use crate::config::DATE_FORMAT;
use crate::errors::{AppError, AppResult};
use crate::types::StatisticsReport;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// Filename of the current report inside the stats directory
pub const CURRENT_REPORT_FILE: &str = "tls-stats-current.json";

/// Storage for the current report and its archives
pub trait ReportStore {
    /// Read the current report
    ///
    /// `Ok(None)` when there is none; `Err` when it exists but cannot be read
    /// or parsed.
    fn load_current(&self) -> AppResult<Option<StatisticsReport>>;

    /// Move the current report aside under a name derived from its
    /// generation date, returning where it went (`None` if nothing to move)
    fn archive_current(&mut self, generation_date: NaiveDate) -> AppResult<Option<PathBuf>>;

    /// Persist `report` as the current report, replacing whatever is there
    fn save_current(&mut self, report: &StatisticsReport) -> AppResult<()>;
}

/// Archive filename for a report generated on `date`, with an optional
/// collision suffix
pub fn archive_file_name(date: NaiveDate, suffix: usize) -> String {
    let stamp = date.format(DATE_FORMAT);
    if suffix == 0 {
        format!("tls-stats-{}.json", stamp)
    } else {
        format!("tls-stats-{}-{}.json", stamp, suffix)
    }
}

/// [`ReportStore`] over a stats directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsReportStore {
    stats_dir: PathBuf,
}

impl FsReportStore {
    pub fn new(stats_dir: impl Into<PathBuf>) -> Self {
        Self {
            stats_dir: stats_dir.into(),
        }
    }

    pub fn current_path(&self) -> PathBuf {
        self.stats_dir.join(CURRENT_REPORT_FILE)
    }

    /// First archive path for `date` that does not exist yet
    pub fn next_archive_path(&self, date: NaiveDate) -> PathBuf {
        let mut suffix = 0;
        loop {
            let candidate = self.stats_dir.join(archive_file_name(date, suffix));
            if !candidate.exists() {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl ReportStore for FsReportStore {
    fn load_current(&self) -> AppResult<Option<StatisticsReport>> {
        let path = self.current_path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };

        let report = serde_json::from_slice(&data).map_err(|e| {
            AppError::InvalidData(format!("{} is not a valid report: {}", path.display(), e))
        })?;
        Ok(Some(report))
    }

    fn archive_current(&mut self, generation_date: NaiveDate) -> AppResult<Option<PathBuf>> {
        let current = self.current_path();
        if !current.exists() {
            return Ok(None);
        }

        let archive = self.next_archive_path(generation_date);
        fs::rename(&current, &archive)?;
        info!("Archived {} to {}", current.display(), archive.display());
        Ok(Some(archive))
    }

    fn save_current(&mut self, report: &StatisticsReport) -> AppResult<()> {
        fs::create_dir_all(&self.stats_dir)?;

        let current = self.current_path();
        let partial = current.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(report)?;
        fs::write(&partial, json)?;
        fs::rename(&partial, &current)?;

        debug!("Saved current report to {}", current.display());
        Ok(())
    }
}
