use tls_stats::errors::AppError;
use tls_stats::processor::{load_capabilities, load_usage};

use crate::common::{profile, usage_line, write_capabilities_json, write_usage_tsv, ymd};

#[test]
fn test_usage_file_loads_and_windows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("browser-stats.tsv");
    write_usage_tsv(
        &path,
        &[
            usage_line("2023-01-15", "Windows", "Chrome", "80", 5),
            usage_line("2023-03-31", "Windows", "Chrome", "80", 5),
            usage_line("2023-04-01", "Windows", "Chrome", "80", 5),
            usage_line("2024-03-31", "Mac OS X", "Safari", "13", 7),
            usage_line("31/03/2024", "Mac OS X", "Safari", "13", 7),
            "2024-03-31\tMac OS X\t10\tSafari".to_string(),
        ],
    );

    let loaded = load_usage(&path).unwrap();

    assert_eq!(loaded.stats.total_records, 6);
    assert_eq!(loaded.stats.malformed_records, 2);
    assert_eq!(loaded.stats.outside_window, 2);
    assert_eq!(loaded.stats.records_loaded, 2);
    let dates: Vec<_> = loaded.records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![ymd(2023, 4, 1), ymd(2024, 3, 31)]);
    assert_eq!(loaded.records[1].browser_family, "Safari");
    assert_eq!(loaded.records[1].os_family, "Mac OS X");
}

#[test]
fn test_empty_usage_file_yields_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.tsv");
    std::fs::write(&path, "").unwrap();

    let loaded = load_usage(&path).unwrap();
    assert!(loaded.records.is_empty());
    assert_eq!(loaded.stats.total_records, 0);
}

#[test]
fn test_capability_file_round_trips_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device-ciphers.json");
    let written = vec![profile("Android", "4.4.2")
        .platform("")
        .protocols(0x0301, 0x0303)
        .suite(0xc02f, "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256")
        .curves(&[23, 24])
        .build()];
    write_capabilities_json(&path, &written);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"lowestProtocol\""));
    assert!(raw.contains("\"ellipticCurves\""));

    let loaded = load_capabilities(&path).unwrap();
    assert_eq!(loaded.records, written);
}

#[test]
fn test_missing_datasets_are_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_usage(&dir.path().join("missing.tsv")),
        Err(AppError::SourceUnavailable { .. })
    ));
    assert!(matches!(
        load_capabilities(&dir.path().join("missing.json")),
        Err(AppError::SourceUnavailable { .. })
    ));
}
