use tls_stats::analysis::normaliser::{
    KeyNormaliser, VersionRange, FAMILY_ALIAS_TABLE, VERSION_RANGE_TABLE,
};
use tls_stats::analysis::join_key;

/// Tests for join key derivation through the public API

#[test]
fn test_every_alias_maps_to_a_versioned_family() {
    let versioned: Vec<&str> = VERSION_RANGE_TABLE.iter().map(|(f, _)| *f).collect();
    for (alias, family) in FAMILY_ALIAS_TABLE {
        assert!(
            versioned.contains(family),
            "{} aliases to {} which has no version table",
            alias,
            family
        );
        let key = join_key(alias, "1");
        assert!(key.as_str().starts_with(&format!("{}:", family)));
    }
}

#[test]
fn test_aliases_share_canonical_key() {
    let desktop = join_key("Chrome", "75");
    for alias in ["Chrome Mobile", "Chrome Mobile WebView", "Chrome Mobile iOS", "Chromium"] {
        assert_eq!(join_key(alias, "75"), desktop);
    }
    assert_eq!(join_key("Opera Mini", "12"), join_key("Opera", "13"));
    assert_eq!(join_key("IE Mobile", "9"), join_key("IE", "10"));
}

#[test]
fn test_key_derivation_is_repeatable() {
    let normaliser = KeyNormaliser::standard();
    let first: Vec<_> = [("Firefox iOS", "66"), ("Edge", "15"), ("Opera", "12")]
        .iter()
        .map(|(f, v)| normaliser.join_key(f, v))
        .collect();
    let second: Vec<_> = [("Firefox iOS", "66"), ("Edge", "15"), ("Opera", "12")]
        .iter()
        .map(|(f, v)| normaliser.join_key(f, v))
        .collect();
    assert_eq!(first, second);
    assert_eq!(first[0].as_str(), "Firefox:62");
    assert_eq!(first[1].as_str(), "Edge:15");
    assert_eq!(first[2].as_str(), "Opera:12.15");
}

#[test]
fn test_tables_can_be_replaced() {
    const RANGES: &[VersionRange] = &[VersionRange {
        first: 1,
        last: 3,
        profile_version: "1.x",
    }];
    let normaliser = KeyNormaliser::from_tables(&[("Lynx Mobile", "Lynx")], &[("Lynx", RANGES)]);

    assert_eq!(normaliser.join_key("Lynx Mobile", "2").as_str(), "Lynx:1.x");
    assert_eq!(normaliser.join_key("Lynx", "4").as_str(), "Lynx:4");
    assert_eq!(normaliser.join_key("Chrome Mobile", "60").as_str(), "Chrome Mobile:60");
}
