use serde::{Deserialize, Serialize};

/// TLS capabilities of one client (browser, OS build, library)
///
/// Deserialised from an SSL Labs `getClients` entry. Extra fields in the
/// source (handshake bytes, SNI support, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    #[serde(rename = "name")]
    pub device_name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "lowestProtocol")]
    pub lowest_protocol: u32,
    #[serde(rename = "highestProtocol")]
    pub highest_protocol: u32,
    #[serde(rename = "suiteIds", default)]
    pub cipher_suite_ids: Vec<u32>,
    /// Index-aligned with `cipher_suite_ids`
    #[serde(rename = "suiteNames", default)]
    pub cipher_suite_names: Vec<String>,
    #[serde(rename = "ellipticCurves", default)]
    pub curve_ids: Vec<u32>,
}

impl CapabilityProfile {
    /// Suite ids and names must pair up one-to-one
    pub fn is_aligned(&self) -> bool {
        self.cipher_suite_ids.len() == self.cipher_suite_names.len()
    }

    /// `(id, name)` pairs in dataset order
    pub fn cipher_suites(&self) -> impl Iterator<Item = (u32, &str)> {
        self.cipher_suite_ids
            .iter()
            .copied()
            .zip(self.cipher_suite_names.iter().map(String::as_str))
    }
}
