use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One ranked line of a report section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: u32,
    /// Fraction of matched usage weight, in [0, 1]
    pub percent: f64,
    pub name: String,
}

/// Persisted TLS support report
///
/// Superseded, never edited: a newer generation archives this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub generation_date: NaiveDate,
    /// Earliest usage date the report draws on
    pub start_date: NaiveDate,
    /// Latest usage date the report draws on
    pub end_date: NaiveDate,
    pub protocols: Vec<ReportEntry>,
    pub ciphers: Vec<ReportEntry>,
    pub curves: Vec<ReportEntry>,
}

/// A report indexed by id for lookups
#[derive(Debug, Default, Clone)]
pub struct MappedStatisticsReport {
    pub protocols: HashMap<u32, ReportEntry>,
    pub ciphers: HashMap<u32, ReportEntry>,
    pub curves: HashMap<u32, ReportEntry>,
}

impl StatisticsReport {
    /// Index every section by id
    pub fn to_mapped(&self) -> MappedStatisticsReport {
        let index = |entries: &[ReportEntry]| -> HashMap<u32, ReportEntry> {
            entries.iter().map(|e| (e.id, e.clone())).collect()
        };
        MappedStatisticsReport {
            protocols: index(&self.protocols),
            ciphers: index(&self.ciphers),
            curves: index(&self.curves),
        }
    }
}
