//! Capability dataset loader
//!
//! The SSL Labs `getClients` response is a JSON array of client objects. Each
//! element is decoded on its own so one bad entry does not cost the rest.

use super::LoadedDataset;
use crate::errors::{AppError, AppResult};
use crate::types::statistics::LoadStats;
use crate::types::CapabilityProfile;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Source name used in [`AppError::SourceUnavailable`]
pub const CAPABILITY_SOURCE: &str = "client capability catalogue";

/// Load the capability catalogue at `path`
pub fn load_capabilities(path: &Path) -> AppResult<LoadedDataset<CapabilityProfile>> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::source_unavailable(CAPABILITY_SOURCE, format!("{}: {}", path.display(), e))
    })?;

    info!("Loading client capabilities from {}", path.display());
    let loaded = parse_capabilities(&bytes)?;
    info!("Client capabilities: {}", loaded.stats.summary());
    Ok(loaded)
}

/// Decode a capability catalogue; the document itself must be a JSON array
pub fn parse_capabilities(bytes: &[u8]) -> AppResult<LoadedDataset<CapabilityProfile>> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::source_unavailable(CAPABILITY_SOURCE, e))?;
    let Value::Array(entries) = document else {
        return Err(AppError::source_unavailable(
            CAPABILITY_SOURCE,
            "expected a JSON array of clients",
        ));
    };

    let mut stats = LoadStats::new();
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        stats.total_records += 1;
        match serde_json::from_value::<CapabilityProfile>(entry) {
            Ok(profile) if profile.is_aligned() => records.push(profile),
            Ok(profile) => {
                stats.malformed_records += 1;
                warn!(
                    "Skipping client {} {}: {} suite ids but {} suite names",
                    profile.device_name,
                    profile.version,
                    profile.cipher_suite_ids.len(),
                    profile.cipher_suite_names.len()
                );
            }
            Err(e) => {
                stats.malformed_records += 1;
                debug!("Skipping malformed client entry {}: {}", index, e);
            }
        }
    }

    stats.records_loaded = records.len();
    stats.timing.finish();
    Ok(LoadedDataset { records, stats })
}
