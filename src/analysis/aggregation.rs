//! Join & aggregation engine
//!
//! Matches usage records to capability profiles by [`JoinKey`] and sums usage
//! weight into per-protocol, per-cipher and per-curve tallies.
//!
//! The work splits in two phases:
//!
//! 1. **Join** - every usage record is keyed and its weight folded into a
//!    per-key running total (several dated records share one key). Records
//!    without a profile land in the unmatched diagnostics instead.
//! 2. **Accumulate** - each matched key's combined weight is credited to every
//!    protocol in the profile's supported range and every cipher and curve it
//!    lists.
//!
//! Both phases are pure integer addition, so the join can be split across
//! workers and the partial results merged in any order.

use super::normaliser::KeyNormaliser;
use crate::errors::{AppError, AppResult};
use crate::types::{
    AggregateTally, CapabilityProfile, JoinKey, JoinOutcome, UnmatchedKey, UsageRecord,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Oldest protocol tracked (SSL v3.0); lower `lowest_protocol` values are
/// raised to this floor
pub const FLOOR_PROTOCOL: u32 = 0x0300;

/// Profiles by key, last profile wins on duplicate keys
pub type CapabilityIndex<'a> = HashMap<JoinKey, &'a CapabilityProfile>;

/// Index capability profiles by their `name:version` key
pub fn index_capabilities(profiles: &[CapabilityProfile]) -> CapabilityIndex<'_> {
    let mut index = HashMap::with_capacity(profiles.len());
    for profile in profiles {
        let key = KeyNormaliser::capability_key(profile);
        if let Some(previous) = index.insert(key, profile) {
            debug!(
                "Duplicate capability key {}:{} ({} replaced by {})",
                profile.device_name, profile.version, previous.platform, profile.platform
            );
        }
    }
    index
}

/// Per-key matched weights plus diagnostics from the join phase
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JoinedWeights {
    pub weights: HashMap<JoinKey, u64>,
    pub matched_records: usize,
    pub unmatched: BTreeMap<JoinKey, UnmatchedKey>,
}

impl JoinedWeights {
    /// Fold another partial join into this one
    pub fn merge(&mut self, other: JoinedWeights) {
        for (key, weight) in other.weights {
            *self.weights.entry(key).or_insert(0) += weight;
        }
        self.matched_records += other.matched_records;
        for (key, diag) in other.unmatched {
            let entry = self.unmatched.entry(key).or_default();
            entry.records += diag.records;
            entry.weight += diag.weight;
        }
    }
}

/// Join phase over one slice of usage records
pub fn join_weights(
    usage: &[UsageRecord],
    index: &CapabilityIndex<'_>,
    normaliser: &KeyNormaliser,
) -> JoinedWeights {
    let mut joined = JoinedWeights::default();

    for record in usage {
        let key = normaliser.join_key(&record.browser_family, &record.browser_major_version);
        if index.contains_key(&key) {
            joined.matched_records += 1;
            *joined.weights.entry(key).or_insert(0) += record.weight;
        } else {
            let entry = joined.unmatched.entry(key).or_default();
            entry.records += 1;
            entry.weight += record.weight;
        }
    }

    joined
}

/// Inclusive protocol range a profile supports after applying the floor;
/// empty when the highest protocol lies below the effective lowest
pub fn supported_protocols(profile: &CapabilityProfile) -> std::ops::RangeInclusive<u32> {
    profile.lowest_protocol.max(FLOOR_PROTOCOL)..=profile.highest_protocol
}

/// Accumulate phase: credit each matched key's weight to its profile
pub fn accumulate(joined: &JoinedWeights, index: &CapabilityIndex<'_>) -> AggregateTally {
    let mut tally = AggregateTally::new();

    for (key, &weight) in &joined.weights {
        let Some(profile) = index.get(key) else {
            continue;
        };

        for protocol in supported_protocols(profile) {
            *tally.protocol_counts.entry(protocol).or_insert(0) += weight;
        }
        for &cipher in &profile.cipher_suite_ids {
            *tally.cipher_counts.entry(cipher).or_insert(0) += weight;
        }
        for &curve in &profile.curve_ids {
            *tally.curve_counts.entry(curve).or_insert(0) += weight;
        }
        tally.total_weight += weight;
    }

    tally
}

fn into_outcome(joined: JoinedWeights, index: &CapabilityIndex<'_>) -> JoinOutcome {
    let tally = accumulate(&joined, index);
    let unmatched_weight = joined.unmatched.values().map(|u| u.weight).sum();

    JoinOutcome {
        tally,
        matched_records: joined.matched_records,
        matched_keys: joined.weights.len(),
        unmatched: joined.unmatched,
        unmatched_weight,
    }
}

/// Join `usage` against `profiles` and aggregate support weights
pub fn aggregate(
    usage: &[UsageRecord],
    profiles: &[CapabilityProfile],
    normaliser: &KeyNormaliser,
) -> JoinOutcome {
    let index = index_capabilities(profiles);
    let joined = join_weights(usage, &index, normaliser);
    into_outcome(joined, &index)
}

/// [`aggregate`] with the join phase split across `workers` scoped threads
///
/// Each worker joins a contiguous chunk of `usage` into its own partial
/// result; partials are merged by addition, so the outcome equals the
/// sequential one.
pub fn aggregate_parallel(
    usage: &[UsageRecord],
    profiles: &[CapabilityProfile],
    normaliser: &KeyNormaliser,
    workers: usize,
) -> AppResult<JoinOutcome> {
    if workers <= 1 || usage.len() < workers {
        return Ok(aggregate(usage, profiles, normaliser));
    }

    let index = index_capabilities(profiles);
    let chunk_size = usage.len().div_ceil(workers);

    let partials = crossbeam::scope(|scope| {
        let handles: Vec<_> = usage
            .chunks(chunk_size)
            .map(|chunk| {
                let index = &index;
                scope.spawn(move |_| join_weights(chunk, index, normaliser))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<_>, _>>()
    })
    .map_err(|_| AppError::Processing("join worker scope panicked".to_string()))?
    .map_err(|_| AppError::Processing("join worker panicked".to_string()))?;

    debug!("Merging {} partial joins", partials.len());
    let mut joined = JoinedWeights::default();
    for partial in partials {
        joined.merge(partial);
    }

    Ok(into_outcome(joined, &index))
}

/// Log the join diagnostics; unmatched weight must stay observable
pub fn log_outcome(outcome: &JoinOutcome) {
    info!(
        "Matched {} usage records over {} keys (weight {})",
        outcome.matched_records, outcome.matched_keys, outcome.tally.total_weight
    );

    if !outcome.unmatched.is_empty() {
        warn!(
            "{} usage records across {} keys had no capability profile (weight {}, coverage {:.1}%)",
            outcome.unmatched_records(),
            outcome.unmatched.len(),
            outcome.unmatched_weight,
            outcome.coverage() * 100.0
        );
        for (key, diag) in &outcome.unmatched {
            debug!(
                "Could not find device with browser profile: {} ({} records, weight {})",
                key, diag.records, diag.weight
            );
        }
    }
}
