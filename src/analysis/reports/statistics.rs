//! Statistics report formatter
//!
//! Console output is three labelled sections (Protocols, Ciphers, Curves),
//! one tab-separated `id  percent  name` line per entry.

use super::utils::export_json;
use super::OutputFormat;
use crate::errors::AppResult;
use crate::types::{ReportEntry, StatisticsReport};

const SECTION_RULE: &str = "=============";

fn push_section(output: &mut String, title: &str, entries: &[ReportEntry]) {
    output.push_str(title);
    output.push('\n');
    output.push_str(SECTION_RULE);
    output.push('\n');
    for entry in entries {
        output.push_str(&format!(
            "\t{}\t{:.6}\t{}\n",
            entry.id, entry.percent, entry.name
        ));
    }
}

/// Render the three report sections without the date header
pub fn format_sections(report: &StatisticsReport) -> String {
    let mut output = String::new();
    push_section(&mut output, "Protocols", &report.protocols);
    push_section(&mut output, "Ciphers", &report.ciphers);
    push_section(&mut output, "Curves", &report.curves);
    output
}

/// Format a statistics report
pub fn format_statistics(report: &StatisticsReport, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = format!(
                "TLS support statistics generated {} (usage {} to {})\n",
                report.generation_date, report.start_date, report.end_date
            );
            output.push_str(&format_sections(report));
            Ok(output)
        }
        OutputFormat::Json => export_json(report),
    }
}
