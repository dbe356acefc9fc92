//! Weighted aggregation results and join diagnostics

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Canonical `family:version` key matching usage records to capability profiles
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinKey(String);

impl JoinKey {
    pub fn new(family: &str, version: &str) -> Self {
        JoinKey(format!("{}:{}", family, version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cumulative support weight per protocol, cipher suite and curve
///
/// `total_weight` counts matched usage weight only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateTally {
    pub protocol_counts: HashMap<u32, u64>,
    pub cipher_counts: HashMap<u32, u64>,
    pub curve_counts: HashMap<u32, u64>,
    pub total_weight: u64,
}

impl AggregateTally {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Usage that found no capability profile under its key
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedKey {
    /// Usage records that normalised to this key
    pub records: usize,
    pub weight: u64,
}

/// Result of joining usage against capabilities
///
/// Carries the tally plus the diagnostics that explain what it leaves out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub tally: AggregateTally,
    /// Usage records that found a profile
    pub matched_records: usize,
    /// Distinct keys that found a profile
    pub matched_keys: usize,
    /// One entry per distinct unmatched key
    pub unmatched: BTreeMap<JoinKey, UnmatchedKey>,
    /// Weight excluded from every percentage
    pub unmatched_weight: u64,
}

impl JoinOutcome {
    pub fn unmatched_records(&self) -> usize {
        self.unmatched.values().map(|u| u.records).sum()
    }

    /// Fraction of all usage weight that could be matched
    pub fn coverage(&self) -> f64 {
        crate::utils::math::safe_fraction(
            self.tally.total_weight,
            self.tally.total_weight + self.unmatched_weight,
        )
    }

    /// Unmatched keys ordered by descending weight, key ascending on ties
    pub fn top_unmatched(&self, limit: usize) -> Vec<(&JoinKey, &UnmatchedKey)> {
        let mut keys: Vec<_> = self.unmatched.iter().collect();
        keys.sort_by(|a, b| b.1.weight.cmp(&a.1.weight).then_with(|| a.0.cmp(b.0)));
        keys.truncate(limit);
        keys
    }
}
