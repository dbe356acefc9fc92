//! Join key normalisation
//!
//! Usage data names browsers the way user-agent parsers do ("Chrome Mobile",
//! "Mobile Safari UI/WKWebView", major version "85"); the capability catalog
//! names a handful of reference clients ("Chrome", version "80"). The
//! normaliser maps the former onto the latter using two data tables:
//!
//! - [`FAMILY_ALIAS_TABLE`]: variant family → canonical family
//! - [`VERSION_RANGE_TABLE`]: canonical family → major-version ranges that
//!   share one capability profile version
//!
//! Anything not covered passes through unchanged, so an uncovered browser shows
//! up as an unmatched key rather than an error.

use crate::types::{CapabilityProfile, JoinKey};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Platform-specific or embedded browser families and the family whose
/// capability profiles they share
pub const FAMILY_ALIAS_TABLE: &[(&str, &str)] = &[
    ("Chrome Mobile", "Chrome"),
    ("Chrome Mobile WebView", "Chrome"),
    ("Chrome Mobile iOS", "Chrome"),
    ("Chromium", "Chrome"),
    ("Firefox Mobile", "Firefox"),
    ("Firefox iOS", "Firefox"),
    ("Thunderbird", "Firefox"),
    ("Opera Mini", "Opera"),
    ("Opera Mobile", "Opera"),
    ("Mobile Safari", "Safari"),
    ("Mobile Safari UIWebView", "Safari"),
    ("Mobile Safari UI/WKWebView", "Safari"),
    ("Samsung Internet", "Android"),
    ("IE Mobile", "IE"),
    ("Edge Mobile", "Edge"),
];

/// Inclusive range of major versions served by one capability profile version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub first: u32,
    pub last: u32,
    pub profile_version: &'static str,
}

const fn range(first: u32, last: u32, profile_version: &'static str) -> VersionRange {
    VersionRange {
        first,
        last,
        profile_version,
    }
}

/// Per canonical family, the major versions that collapse onto each
/// capability-profile version in the SSL Labs client list
pub const VERSION_RANGE_TABLE: &[(&str, &[VersionRange])] = &[
    (
        "Chrome",
        &[
            range(49, 68, "49"),
            range(69, 69, "69"),
            range(70, 74, "70"),
            range(75, 78, "75"),
            range(79, 79, "79"),
            range(80, 89, "80"),
        ],
    ),
    (
        "Firefox",
        &[
            range(31, 46, "31.3.0"),
            range(47, 48, "47"),
            range(49, 61, "49"),
            range(62, 72, "62"),
            range(73, 89, "73"),
        ],
    ),
    (
        "Android",
        &[
            range(2, 3, "2.3.7"),
            range(4, 4, "4.4.2"),
            range(5, 5, "5.0.0"),
            range(6, 6, "6.0"),
            range(7, 7, "7.0"),
            range(8, 8, "8.1"),
            range(9, 9, "9.0"),
        ],
    ),
    (
        "Safari",
        &[
            range(5, 5, "5.1.9"),
            range(6, 6, "6"),
            range(7, 7, "7"),
            range(8, 8, "8"),
            range(9, 9, "9"),
            range(10, 11, "10"),
            range(12, 13, "12.1.2"),
        ],
    ),
    (
        "Opera",
        &[range(12, 16, "12.15"), range(17, 66, "17")],
    ),
    (
        "Edge",
        &[
            range(12, 14, "13"),
            range(15, 15, "15"),
            range(16, 17, "16"),
            range(18, 18, "18"),
        ],
    ),
    (
        "IE",
        &[
            range(6, 6, "6"),
            range(7, 7, "7"),
            range(8, 8, "8"),
            range(9, 10, "8-10"),
            range(11, 11, "11"),
        ],
    ),
];

lazy_static! {
    static ref STANDARD: KeyNormaliser =
        KeyNormaliser::from_tables(FAMILY_ALIAS_TABLE, VERSION_RANGE_TABLE);
}

/// Canonicalises (family, version) pairs into [`JoinKey`]s
///
/// Holds the alias and version tables as plain maps so callers can extend or
/// replace them without touching the matching code.
#[derive(Debug, Clone, Default)]
pub struct KeyNormaliser {
    aliases: HashMap<String, String>,
    versions: HashMap<String, HashMap<String, String>>,
}

impl KeyNormaliser {
    /// Normaliser over the built-in tables
    pub fn standard() -> &'static KeyNormaliser {
        &STANDARD
    }

    /// Build from alias pairs and version ranges, expanding each range into
    /// one `raw major → profile version` entry per major
    pub fn from_tables(aliases: &[(&str, &str)], ranges: &[(&str, &[VersionRange])]) -> Self {
        let mut normaliser = Self::default();
        for (alias, family) in aliases {
            normaliser.add_alias(alias, family);
        }
        for (family, family_ranges) in ranges {
            for r in family_ranges.iter() {
                for major in r.first..=r.last {
                    normaliser.add_version(family, &major.to_string(), r.profile_version);
                }
            }
        }
        normaliser
    }

    pub fn add_alias(&mut self, alias: &str, family: &str) {
        self.aliases.insert(alias.to_string(), family.to_string());
    }

    pub fn add_version(&mut self, family: &str, raw: &str, normalised: &str) {
        self.versions
            .entry(family.to_string())
            .or_default()
            .insert(raw.to_string(), normalised.to_string());
    }

    /// Canonical family for `family`; identity when no alias exists
    pub fn canonical_family<'a>(&'a self, family: &'a str) -> &'a str {
        self.aliases.get(family).map(String::as_str).unwrap_or(family)
    }

    /// Profile version for `version` of canonical `family`; raw version when
    /// the family or version is not in the tables
    pub fn normalise_version<'a>(&'a self, family: &str, version: &'a str) -> &'a str {
        self.versions
            .get(family)
            .and_then(|table| table.get(version))
            .map(String::as_str)
            .unwrap_or(version)
    }

    /// Join key for a usage record's browser family and major version
    pub fn join_key(&self, family: &str, version: &str) -> JoinKey {
        let family = self.canonical_family(family);
        JoinKey::new(family, self.normalise_version(family, version))
    }

    /// Join key of a capability profile: its name and version verbatim
    pub fn capability_key(profile: &CapabilityProfile) -> JoinKey {
        JoinKey::new(&profile.device_name, &profile.version)
    }
}

/// Join key under the built-in tables
pub fn join_key(family: &str, version: &str) -> JoinKey {
    KeyNormaliser::standard().join_key(family, version)
}
