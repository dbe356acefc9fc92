//! Report formatting and output generation
//!
//! Provides formatting for analysis results via the [`ReportFormatter`] facade.
//! Supports Console and JSON output formats.

pub mod diagnostics;
pub mod statistics;
pub mod utils;

use crate::analysis::AnalysisRun;
use crate::errors::AppResult;
use crate::types::{JoinOutcome, StatisticsReport};

pub use diagnostics::{JoinDiagnostics, UnmatchedEntry};

/// Output format options for analysis reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl OutputFormat {
    /// Parse a `--format` value; anything unrecognised falls back to console
    pub fn parse(format: &str) -> Self {
        match format.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Console,
        }
    }
}

/// Facade for all report formatting operations
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format_number(n: usize) -> String {
        utils::format_number(n)
    }

    pub fn format_statistics(r: &StatisticsReport, f: &OutputFormat) -> AppResult<String> {
        statistics::format_statistics(r, f)
    }

    pub fn format_join_diagnostics(
        o: &JoinOutcome,
        limit: usize,
        f: &OutputFormat,
    ) -> AppResult<String> {
        diagnostics::format_join_diagnostics(o, limit, f)
    }

    pub fn format_analysis(run: &AnalysisRun, limit: usize) -> AppResult<String> {
        diagnostics::format_analysis(run, limit)
    }
}
