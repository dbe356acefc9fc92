use crate::config::DATE_FORMAT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tab-separated columns in a usage line
pub const USAGE_COLUMNS: usize = 6;

/// Browser/OS usage share observed on one date
///
/// One record per (date, browser, OS) combination in the Wikimedia
/// `all_sites_by_os_and_browser.tsv` dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub date: NaiveDate,
    pub browser_family: String,
    pub browser_major_version: String,
    pub os_family: String,
    pub os_major_version: String,
    /// View count; the weight this segment carries in every tally
    pub weight: u64,
}

impl UsageRecord {
    pub fn new(
        date: NaiveDate,
        browser_family: impl Into<String>,
        browser_major_version: impl Into<String>,
        weight: u64,
    ) -> Self {
        Self {
            date,
            browser_family: browser_family.into(),
            browser_major_version: browser_major_version.into(),
            os_family: String::new(),
            os_major_version: String::new(),
            weight,
        }
    }

    pub fn with_os(mut self, family: impl Into<String>, major: impl Into<String>) -> Self {
        self.os_family = family.into();
        self.os_major_version = major.into();
        self
    }

    /// Parse the columns of one usage line:
    /// `date, os_family, os_major, browser_family, browser_major, view_count`
    ///
    /// Returns the reason on failure so the loader can log and skip the line.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        if fields.len() < USAGE_COLUMNS {
            return Err(format!(
                "expected {} columns, found {}",
                USAGE_COLUMNS,
                fields.len()
            ));
        }

        let date = NaiveDate::parse_from_str(fields[0].trim(), DATE_FORMAT)
            .map_err(|e| format!("invalid date '{}': {}", fields[0], e))?;
        let weight = fields[5]
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid count '{}': {}", fields[5], e))?;

        Ok(Self {
            date,
            os_family: fields[1].to_string(),
            os_major_version: fields[2].to_string(),
            browser_family: fields[3].to_string(),
            browser_major_version: fields[4].to_string(),
            weight,
        })
    }
}

impl fmt::Display for UsageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UsageRecord{{date: {}, browser: {}, major: {}, os: {}, os_major: {}, weight: {}}}",
            self.date.format(DATE_FORMAT),
            self.browser_family,
            self.browser_major_version,
            self.os_family,
            self.os_major_version,
            self.weight
        )
    }
}
