use tls_stats::cache::{
    CacheDecision, CacheManager, CacheState, FsReportStore, RefreshReason, ReportStore,
};
use tls_stats::errors::AppError;
use tls_stats::types::StatisticsReport;

use crate::common::{empty_report, ymd};

fn store_with(dir: &std::path::Path, report: Option<StatisticsReport>) -> FsReportStore {
    let mut store = FsReportStore::new(dir);
    if let Some(report) = report {
        store.save_current(&report).unwrap();
    }
    store
}

#[tokio::test]
async fn test_stale_report_is_archived_then_recomputed() {
    let dir = tempfile::tempdir().unwrap();
    let today = ymd(2024, 9, 1);
    let store = store_with(dir.path(), Some(empty_report(ymd(2024, 2, 1))));
    let mut cache = CacheManager::new(store, today, 6);

    assert!(matches!(cache.state(), CacheState::StaleReport(_)));

    let outcome = cache
        .get_report(false, || async { Ok::<_, AppError>(empty_report(today)) })
        .await
        .unwrap();

    assert_eq!(outcome.refreshed, Some(RefreshReason::Stale));
    assert_eq!(outcome.report.generation_date, today);
    let archived = outcome.archived.unwrap();
    assert!(archived.ends_with("tls-stats-2024-02-01.json"));
    assert!(archived.exists());
    assert!(matches!(cache.state(), CacheState::FreshReport(_)));
}

#[tokio::test]
async fn test_fresh_report_is_served_without_recompute() {
    let dir = tempfile::tempdir().unwrap();
    let cached = empty_report(ymd(2024, 6, 1));
    let store = store_with(dir.path(), Some(cached.clone()));
    let mut cache = CacheManager::new(store, ymd(2024, 9, 1), 6);

    let mut computed = false;
    let outcome = cache
        .get_report(false, || {
            computed = true;
            async { Ok::<_, AppError>(empty_report(ymd(2024, 9, 1))) }
        })
        .await
        .unwrap();

    assert!(!computed);
    assert_eq!(outcome.report, cached);
    assert_eq!(outcome.refreshed, None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_force_archives_fresh_report() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with(dir.path(), Some(empty_report(ymd(2024, 8, 20))));
    let mut cache = CacheManager::new(store, ymd(2024, 9, 1), 6);

    let outcome = cache
        .get_report(true, || async {
            Ok::<_, AppError>(empty_report(ymd(2024, 9, 1)))
        })
        .await
        .unwrap();

    assert_eq!(outcome.refreshed, Some(RefreshReason::Forced));
    assert!(dir.path().join("tls-stats-2024-08-20.json").exists());
}

#[tokio::test]
async fn test_corrupt_report_is_overwritten_not_archived() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsReportStore::new(dir.path());
    std::fs::write(store.current_path(), "{\"generationDate\": \"2024-0").unwrap();
    let mut cache = CacheManager::new(store, ymd(2024, 9, 1), 6);

    assert_eq!(cache.state(), CacheState::NoReport);
    assert_eq!(
        cache.decide(false),
        CacheDecision::Recompute {
            reason: RefreshReason::Missing,
            archive: None
        }
    );

    let outcome = cache
        .get_report(false, || async {
            Ok::<_, AppError>(empty_report(ymd(2024, 9, 1)))
        })
        .await
        .unwrap();

    assert_eq!(outcome.archived, None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(
        cache.store().load_current().unwrap(),
        Some(empty_report(ymd(2024, 9, 1)))
    );
}

#[test]
fn test_report_exactly_at_cutoff_is_stale() {
    let cases = [
        (ymd(2024, 1, 15), ymd(2024, 7, 15), true),
        (ymd(2024, 3, 1), ymd(2024, 8, 31), true),
        (ymd(2024, 2, 29), ymd(2024, 8, 31), true),
        (ymd(2024, 3, 3), ymd(2024, 8, 31), false),
    ];

    for (generated, today, stale) in cases {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(dir.path(), Some(empty_report(generated)));
        let cache = CacheManager::new(store, today, 6);
        assert_eq!(
            matches!(cache.state(), CacheState::StaleReport(_)),
            stale,
            "generated {} checked on {}",
            generated,
            today
        );
    }
}
