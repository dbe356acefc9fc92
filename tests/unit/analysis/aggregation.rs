use tls_stats::analysis::{aggregate, aggregate_parallel, KeyNormaliser, StatisticsEngine};
use tls_stats::types::{JoinKey, UsageRecord};

use crate::common::{profile, usage, ymd};

/// Join & aggregation behaviour on hand-built records

#[test]
fn test_single_match_credits_full_protocol_range() {
    let profiles = vec![profile("Chrome", "90")
        .protocols(769, 772)
        .suite(4865, "TLS_AES_128_GCM_SHA256")
        .curves(&[29])
        .build()];
    let outcome = aggregate(
        &[usage("Chrome", "90", 100)],
        &profiles,
        KeyNormaliser::standard(),
    );

    let tally = &outcome.tally;
    assert_eq!(tally.protocol_counts.len(), 4);
    for protocol in 769..=772 {
        assert_eq!(tally.protocol_counts[&protocol], 100);
    }
    assert_eq!(tally.cipher_counts.len(), 1);
    assert_eq!(tally.cipher_counts[&4865], 100);
    assert_eq!(tally.curve_counts.len(), 1);
    assert_eq!(tally.curve_counts[&29], 100);
    assert_eq!(tally.total_weight, 100);
    assert!(outcome.unmatched.is_empty());
}

#[test]
fn test_records_sharing_a_key_combine() {
    let profiles = vec![profile("Chrome", "80")
        .protocols(771, 772)
        .suite(4865, "TLS_AES_128_GCM_SHA256")
        .curves(&[29])
        .build()];
    let records = vec![usage("Chrome", "85", 30), usage("Chrome Mobile", "81", 70)];

    let outcome = aggregate(&records, &profiles, KeyNormaliser::standard());

    assert_eq!(outcome.matched_records, 2);
    assert_eq!(outcome.matched_keys, 1);
    assert_eq!(outcome.tally.protocol_counts[&771], 100);
    assert_eq!(outcome.tally.protocol_counts[&772], 100);
    assert_eq!(outcome.tally.cipher_counts[&4865], 100);
    assert_eq!(outcome.tally.curve_counts[&29], 100);
    assert_eq!(outcome.tally.total_weight, 100);
}

#[test]
fn test_unmatched_records_are_excluded_and_diagnosed() {
    let profiles = vec![profile("Firefox", "73")
        .protocols(771, 772)
        .curves(&[29])
        .build()];
    let records = vec![
        usage("Firefox", "80", 40),
        usage("Yandex Browser", "23", 25),
        usage("Yandex Browser", "23", 5),
        usage("UC Browser", "12", 10),
    ];

    let outcome = aggregate(&records, &profiles, KeyNormaliser::standard());

    assert_eq!(outcome.tally.total_weight, 40);
    assert_eq!(outcome.tally.curve_counts[&29], 40);
    assert_eq!(outcome.unmatched.len(), 2);
    let yandex = outcome.unmatched[&JoinKey::new("Yandex Browser", "23")];
    assert_eq!(yandex.records, 2);
    assert_eq!(yandex.weight, 30);
    assert_eq!(outcome.unmatched_weight, 40);
    assert_eq!(outcome.unmatched_records(), 3);
    assert!((outcome.coverage() - 0.5).abs() < 1e-12);
}

#[test]
fn test_aggregation_is_idempotent() {
    let profiles = vec![
        profile("Chrome", "80").protocols(769, 772).curves(&[29, 23]).build(),
        profile("Safari", "12.1.2").protocols(769, 772).curves(&[29]).build(),
    ];
    let records = vec![
        usage("Chrome", "84", 11),
        usage("Mobile Safari", "12", 7),
        usage("Opera", "50", 3),
    ];

    let first = aggregate(&records, &profiles, KeyNormaliser::standard());
    let second = aggregate(&records, &profiles, KeyNormaliser::standard());
    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_sequential() {
    let profiles = vec![
        profile("Chrome", "80")
            .protocols(769, 772)
            .suite(4865, "TLS_AES_128_GCM_SHA256")
            .curves(&[29, 23])
            .build(),
        profile("Firefox", "73")
            .protocols(771, 772)
            .suite(4866, "TLS_AES_256_GCM_SHA384")
            .curves(&[29])
            .build(),
    ];
    let families = ["Chrome", "Chrome Mobile", "Firefox", "Firefox Mobile", "Yandex Browser"];
    let records: Vec<UsageRecord> = (0..500u64)
        .map(|i| {
            let family = families[(i % families.len() as u64) as usize];
            let version = if family.starts_with("Firefox") { "80" } else { "85" };
            UsageRecord::new(ymd(2024, 1, 1), family, version, i * 3 + 1)
        })
        .collect();

    let sequential = aggregate(&records, &profiles, KeyNormaliser::standard());
    for workers in [2, 3, 8] {
        let parallel =
            aggregate_parallel(&records, &profiles, KeyNormaliser::standard(), workers).unwrap();
        assert_eq!(parallel, sequential, "workers = {}", workers);
    }
}

#[test]
fn test_engine_with_workers_uses_same_tallies() {
    let profiles = vec![profile("IE", "11").protocols(769, 771).curves(&[23]).build()];
    let records: Vec<UsageRecord> = (0..40).map(|i| usage("IE", "11", i)).collect();

    let single = StatisticsEngine::new().analyse(&records, &profiles).unwrap();
    let multi = StatisticsEngine::new()
        .workers(4)
        .analyse(&records, &profiles)
        .unwrap();
    assert_eq!(single, multi);
    assert_eq!(multi.tally.total_weight, (0..40).sum::<u64>());
}
