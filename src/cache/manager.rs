use super::store::ReportStore;
use crate::errors::AppResult;
use crate::types::StatisticsReport;
use crate::utils::time::is_older_than_months;
use chrono::NaiveDate;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What the store holds right now, judged against today
#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    /// Nothing usable: absent, unreadable or corrupt
    NoReport,
    FreshReport(StatisticsReport),
    StaleReport(StatisticsReport),
}

/// Why a report is being recomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Missing,
    Stale,
    Forced,
}

/// Result of a cache decision before any work is done
#[derive(Debug, Clone, PartialEq)]
pub enum CacheDecision {
    Serve(StatisticsReport),
    Recompute {
        reason: RefreshReason,
        /// Generation date of the report to archive first, if any
        archive: Option<NaiveDate>,
    },
}

/// Report handed back to the caller plus what it took to get it
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOutcome {
    pub report: StatisticsReport,
    /// `None` when the cached report was served as-is
    pub refreshed: Option<RefreshReason>,
    pub archived: Option<PathBuf>,
}

/// Staleness-aware front for a [`ReportStore`]
pub struct CacheManager<S: ReportStore> {
    store: S,
    today: NaiveDate,
    staleness_months: u32,
}

impl<S: ReportStore> CacheManager<S> {
    pub fn new(store: S, today: NaiveDate, staleness_months: u32) -> Self {
        Self {
            store,
            today,
            staleness_months,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// A report is stale once its generation date is on or before
    /// `today - staleness_months`
    pub fn is_stale(&self, report: &StatisticsReport) -> bool {
        is_older_than_months(report.generation_date, self.today, self.staleness_months)
    }

    /// Classify the current report
    pub fn state(&self) -> CacheState {
        match self.store.load_current() {
            Ok(None) => CacheState::NoReport,
            Ok(Some(report)) if self.is_stale(&report) => CacheState::StaleReport(report),
            Ok(Some(report)) => CacheState::FreshReport(report),
            Err(e) => {
                warn!("Ignoring unreadable cached report: {}", e);
                CacheState::NoReport
            }
        }
    }

    /// Decide between serving and recomputing
    pub fn decide(&self, force: bool) -> CacheDecision {
        match (self.state(), force) {
            (CacheState::FreshReport(report), false) => CacheDecision::Serve(report),
            (CacheState::FreshReport(report) | CacheState::StaleReport(report), true) => {
                CacheDecision::Recompute {
                    reason: RefreshReason::Forced,
                    archive: Some(report.generation_date),
                }
            }
            (CacheState::StaleReport(report), false) => CacheDecision::Recompute {
                reason: RefreshReason::Stale,
                archive: Some(report.generation_date),
            },
            (CacheState::NoReport, true) => CacheDecision::Recompute {
                reason: RefreshReason::Forced,
                archive: None,
            },
            (CacheState::NoReport, false) => CacheDecision::Recompute {
                reason: RefreshReason::Missing,
                archive: None,
            },
        }
    }

    /// Serve the cached report or archive it and run `compute`
    ///
    /// The old report is archived before `compute` runs; if `compute` fails
    /// nothing is saved and the next call starts from `NoReport`.
    pub async fn get_report<F, Fut>(&mut self, force: bool, compute: F) -> AppResult<CacheOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<StatisticsReport>>,
    {
        let (reason, archive_date) = match self.decide(force) {
            CacheDecision::Serve(report) => {
                debug!(
                    "Serving cached report generated {}",
                    report.generation_date
                );
                return Ok(CacheOutcome {
                    report,
                    refreshed: None,
                    archived: None,
                });
            }
            CacheDecision::Recompute { reason, archive } => (reason, archive),
        };

        let archived = match archive_date {
            Some(date) => self.store.archive_current(date)?,
            None => None,
        };

        info!("Recomputing report ({:?})", reason);
        let report = compute().await?;
        self.store.save_current(&report)?;

        Ok(CacheOutcome {
            report,
            refreshed: Some(reason),
            archived,
        })
    }
}
