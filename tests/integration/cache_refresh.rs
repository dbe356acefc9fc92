//! Cache manager driving the real pipeline against a stats directory

use tls_stats::cache::{CacheManager, FsReportStore, RefreshReason, ReportStore};
use tls_stats::config::SourcesConfig;
use tls_stats::errors::AppError;
use tls_stats::fetch::DatasetFetcher;
use tls_stats::processor::StatsPipeline;
use tls_stats::types::StatisticsReport;

use crate::common::{empty_report, test_context, write_sample_datasets, ymd};

#[tokio::test]
async fn test_stale_cache_recomputes_from_datasets() {
    let home = tempfile::tempdir().unwrap();
    let ctx = test_context(home.path(), ymd(2024, 6, 1));
    write_sample_datasets(&ctx);

    let mut store = FsReportStore::new(&ctx.stats_dir);
    store.save_current(&empty_report(ymd(2023, 11, 30))).unwrap();

    let pipeline = &StatsPipeline::new(ctx.clone());
    let mut cache = CacheManager::new(store, ctx.today, ctx.staleness_months);
    let outcome = cache
        .get_report(false, move || async move { pipeline.analyse().map(|run| run.report) })
        .await
        .unwrap();

    assert_eq!(outcome.refreshed, Some(RefreshReason::Stale));
    assert_eq!(outcome.report.generation_date, ymd(2024, 6, 1));
    assert!(!outcome.report.protocols.is_empty());
    assert!(ctx.stats_dir.join("tls-stats-2023-11-30.json").exists());
    assert!(ctx.current_report.exists());

    // A second run on the same day serves what was just written
    let mut cache = CacheManager::new(
        FsReportStore::new(&ctx.stats_dir),
        ctx.today,
        ctx.staleness_months,
    );
    let again = cache
        .get_report(false, || async {
            Err::<StatisticsReport, _>(AppError::Processing("unexpected".into()))
        })
        .await
        .unwrap();
    assert_eq!(again.refreshed, None);
    assert_eq!(again.report, outcome.report);
}

#[tokio::test]
async fn test_failed_recompute_keeps_archive_and_reports_error() {
    let home = tempfile::tempdir().unwrap();
    let ctx = test_context(home.path(), ymd(2024, 6, 1));

    let mut store = FsReportStore::new(&ctx.stats_dir);
    store.save_current(&empty_report(ymd(2023, 1, 1))).unwrap();

    let pipeline = &StatsPipeline::new(ctx.clone());
    let mut cache = CacheManager::new(store, ctx.today, ctx.staleness_months);
    let result = cache
        .get_report(false, move || async move { pipeline.analyse().map(|run| run.report) })
        .await;

    assert!(result.is_err());
    assert!(ctx.stats_dir.join("tls-stats-2023-01-01.json").exists());
    assert!(!ctx.current_report.exists());
}

fn offline_fetcher() -> DatasetFetcher {
    DatasetFetcher::new(&SourcesConfig {
        usage_url: "http://127.0.0.1:9/usage.tsv".to_string(),
        capability_url: "http://127.0.0.1:9/clients".to_string(),
        timeout_seconds: 2,
        max_retries: 1,
        initial_backoff_ms: 1,
        ..SourcesConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_forced_refresh_offline_keeps_current_report() {
    let home = tempfile::tempdir().unwrap();
    let ctx = test_context(home.path(), ymd(2024, 6, 1));

    let mut store = FsReportStore::new(&ctx.stats_dir);
    let current = empty_report(ymd(2024, 5, 20));
    store.save_current(&current).unwrap();

    let pipeline = StatsPipeline::new(ctx.clone());
    let mut cache = CacheManager::new(store, ctx.today, ctx.staleness_months);
    let result = pipeline
        .cached_report(&mut cache, &offline_fetcher(), true)
        .await;

    assert!(matches!(result, Err(AppError::SourceUnavailable { .. })));
    assert_eq!(cache.store().load_current().unwrap(), Some(current));
    assert!(!ctx.stats_dir.join("tls-stats-2024-05-20.json").exists());
}

#[tokio::test]
async fn test_stale_refresh_reuses_datasets_on_disk() {
    let home = tempfile::tempdir().unwrap();
    let ctx = test_context(home.path(), ymd(2024, 6, 1));
    write_sample_datasets(&ctx);

    let mut store = FsReportStore::new(&ctx.stats_dir);
    store.save_current(&empty_report(ymd(2023, 12, 1))).unwrap();

    let pipeline = StatsPipeline::new(ctx.clone());
    let mut cache = CacheManager::new(store, ctx.today, ctx.staleness_months);
    let outcome = pipeline
        .cached_report(&mut cache, &offline_fetcher(), false)
        .await
        .unwrap();

    assert_eq!(outcome.refreshed, Some(RefreshReason::Stale));
    assert_eq!(outcome.report.generation_date, ymd(2024, 6, 1));
    assert!(ctx.stats_dir.join("tls-stats-2023-12-01.json").exists());
}
