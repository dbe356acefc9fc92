//! TLS support analysis
//!
//! The analysis module turns usage-share records and client capability
//! profiles into a ranked report of protocol, cipher suite and curve support.
//! It is organised around the [`StatisticsEngine`], which wires together:
//!
//! - **Key Normalisation** - browser family/version → join key ([`normaliser`])
//! - **Join & Aggregation** - weighted tallies plus unmatched diagnostics ([`aggregation`])
//! - **Report Building** - percentages, names and deterministic ordering ([`report_builder`])
//! - **Report Formatting** - console and JSON output ([`reports`])
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tls_stats::analysis::StatisticsEngine;
//! use tls_stats::errors::AppResult;
//! use tls_stats::types::{CapabilityProfile, UsageRecord};
//!
//! fn example(usage: &[UsageRecord], profiles: &[CapabilityProfile]) -> AppResult<()> {
//!     let engine = StatisticsEngine::new();
//!     let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!     let run = engine.run(usage, profiles, today)?;
//!     println!("{} keys unmatched", run.outcome.unmatched.len());
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod normaliser;
pub mod registry;
pub mod report_builder;
pub mod reports;

pub use aggregation::{aggregate, aggregate_parallel, FLOOR_PROTOCOL};
pub use normaliser::{join_key, KeyNormaliser};
pub use registry::CipherNames;
pub use report_builder::{build_report, ranked_counts, ReportWindow};
pub use reports::{OutputFormat, ReportFormatter};

use crate::errors::AppResult;
use crate::types::{CapabilityProfile, JoinOutcome, StatisticsReport, UsageRecord};
use crate::utils::time::date_range;
use chrono::NaiveDate;

/// Joined tallies and the report built from them
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub outcome: JoinOutcome,
    pub report: StatisticsReport,
}

/// Main analysis engine
///
/// Stateless apart from its normaliser and worker count: the same inputs
/// always give the same tallies.
pub struct StatisticsEngine<'n> {
    normaliser: &'n KeyNormaliser,
    workers: usize,
}

impl Default for StatisticsEngine<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsEngine<'static> {
    /// Engine over the built-in alias and version tables
    pub fn new() -> Self {
        Self {
            normaliser: KeyNormaliser::standard(),
            workers: 1,
        }
    }
}

impl<'n> StatisticsEngine<'n> {
    /// Engine over caller-supplied tables
    pub fn with_normaliser(normaliser: &'n KeyNormaliser) -> Self {
        Self {
            normaliser,
            workers: 1,
        }
    }

    /// Split the join across `workers` threads (1 = sequential)
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Join usage against capabilities and aggregate support weights
    pub fn analyse(
        &self,
        usage: &[UsageRecord],
        profiles: &[CapabilityProfile],
    ) -> AppResult<JoinOutcome> {
        let outcome = aggregate_parallel(usage, profiles, self.normaliser, self.workers)?;
        aggregation::log_outcome(&outcome);
        Ok(outcome)
    }

    /// Build the report for an outcome; the usage window comes from the
    /// records' own dates, falling back to `today` when there are none
    pub fn build_report(
        &self,
        outcome: &JoinOutcome,
        usage: &[UsageRecord],
        profiles: &[CapabilityProfile],
        today: NaiveDate,
    ) -> StatisticsReport {
        let (start_date, end_date) =
            date_range(usage.iter().map(|r| r.date)).unwrap_or((today, today));
        let cipher_names = CipherNames::from_profiles(profiles);

        build_report(
            &outcome.tally,
            &cipher_names,
            ReportWindow {
                generation_date: today,
                start_date,
                end_date,
            },
        )
    }

    /// Analyse and build the report in one step
    pub fn run(
        &self,
        usage: &[UsageRecord],
        profiles: &[CapabilityProfile],
        today: NaiveDate,
    ) -> AppResult<AnalysisRun> {
        let outcome = self.analyse(usage, profiles)?;
        let report = self.build_report(&outcome, usage, profiles, today);
        Ok(AnalysisRun { outcome, report })
    }
}
