//! Join diagnostics formatter
//!
//! Surfaces how much usage weight the report could not account for.

use super::utils::{export_json, format_number};
use super::OutputFormat;
use crate::analysis::AnalysisRun;
use crate::errors::AppResult;
use crate::types::{JoinOutcome, StatisticsReport};
use serde::{Deserialize, Serialize};

/// One unmatched key in the diagnostics output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub key: String,
    pub records: usize,
    pub weight: u64,
}

/// Serialisable summary of a [`JoinOutcome`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinDiagnostics {
    pub matched_records: usize,
    pub matched_keys: usize,
    pub matched_weight: u64,
    pub unmatched_records: usize,
    pub unmatched_keys: usize,
    pub unmatched_weight: u64,
    /// Matched share of all usage weight, in [0, 1]
    pub coverage: f64,
    pub top_unmatched: Vec<UnmatchedEntry>,
}

impl JoinDiagnostics {
    pub fn from_outcome(outcome: &JoinOutcome, limit: usize) -> Self {
        Self {
            matched_records: outcome.matched_records,
            matched_keys: outcome.matched_keys,
            matched_weight: outcome.tally.total_weight,
            unmatched_records: outcome.unmatched_records(),
            unmatched_keys: outcome.unmatched.len(),
            unmatched_weight: outcome.unmatched_weight,
            coverage: outcome.coverage(),
            top_unmatched: outcome
                .top_unmatched(limit)
                .into_iter()
                .map(|(key, diag)| UnmatchedEntry {
                    key: key.to_string(),
                    records: diag.records,
                    weight: diag.weight,
                })
                .collect(),
        }
    }
}

/// Format join diagnostics, listing at most `limit` unmatched keys
pub fn format_join_diagnostics(
    outcome: &JoinOutcome,
    limit: usize,
    format: &OutputFormat,
) -> AppResult<String> {
    let diagnostics = JoinDiagnostics::from_outcome(outcome, limit);

    match format {
        OutputFormat::Console => {
            let mut output = String::from("Join diagnostics\n=============\n");
            output.push_str(&format!(
                "Matched: {} records, {} keys, weight {}\n",
                format_number(diagnostics.matched_records),
                format_number(diagnostics.matched_keys),
                diagnostics.matched_weight
            ));
            output.push_str(&format!(
                "Unmatched: {} records, {} keys, weight {}\n",
                format_number(diagnostics.unmatched_records),
                format_number(diagnostics.unmatched_keys),
                diagnostics.unmatched_weight
            ));
            output.push_str(&format!("Coverage: {:.2}%\n", diagnostics.coverage * 100.0));

            if !diagnostics.top_unmatched.is_empty() {
                output.push_str("\nTop unmatched keys:\n");
                for entry in &diagnostics.top_unmatched {
                    output.push_str(&format!(
                        "\t{}\t{}\t{}\n",
                        entry.key, entry.records, entry.weight
                    ));
                }
            }

            Ok(output)
        }
        OutputFormat::Json => export_json(&diagnostics),
    }
}

#[derive(Serialize)]
struct AnalysisExport<'a> {
    diagnostics: JoinDiagnostics,
    report: &'a StatisticsReport,
}

/// JSON export of a full analysis run: diagnostics alongside the report
pub fn format_analysis(run: &AnalysisRun, limit: usize) -> AppResult<String> {
    export_json(&AnalysisExport {
        diagnostics: JoinDiagnostics::from_outcome(&run.outcome, limit),
        report: &run.report,
    })
}
