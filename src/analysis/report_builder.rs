//! Report builder: turns raw tallies into ranked, named percentage entries

use super::registry::{curve_name, protocol_name, CipherNames};
use crate::types::{AggregateTally, ReportEntry, StatisticsReport};
use crate::utils::math::safe_fraction;
use chrono::NaiveDate;
use std::collections::HashMap;

/// `(id, count)` pairs by descending count, ascending id on ties
///
/// The map's iteration order never leaks into the result.
pub fn ranked_counts(counts: &HashMap<u32, u64>) -> Vec<(u32, u64)> {
    let mut ranked: Vec<(u32, u64)> = counts.iter().map(|(&id, &count)| (id, count)).collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

fn entries<F>(counts: &HashMap<u32, u64>, total: u64, name: F) -> Vec<ReportEntry>
where
    F: Fn(u32) -> String,
{
    ranked_counts(counts)
        .into_iter()
        .map(|(id, count)| ReportEntry {
            id,
            percent: safe_fraction(count, total),
            name: name(id),
        })
        .collect()
}

/// Date window and stamp a report is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub generation_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Build the report for `tally`, naming non-standard ciphers from `cipher_names`
pub fn build_report(
    tally: &AggregateTally,
    cipher_names: &CipherNames,
    window: ReportWindow,
) -> StatisticsReport {
    let total = tally.total_weight;

    StatisticsReport {
        generation_date: window.generation_date,
        start_date: window.start_date,
        end_date: window.end_date,
        protocols: entries(&tally.protocol_counts, total, |id| {
            protocol_name(id).to_string()
        }),
        ciphers: entries(&tally.cipher_counts, total, |id| {
            cipher_names.name(id).to_string()
        }),
        curves: entries(&tally.curve_counts, total, |id| curve_name(id).to_string()),
    }
}
