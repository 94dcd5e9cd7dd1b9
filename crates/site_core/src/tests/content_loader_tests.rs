use super::*;
use crate::test_support::{article, case_study, sample_catalog, CountingSource};

const DELAY: Duration = Duration::from_millis(100);

#[test]
fn preview_picks_most_recent_case_study() {
    let studies = vec![
        case_study("mar", "2025-03"),
        case_study("nov", "2025-11"),
        case_study("jun", "2025-06"),
    ];
    assert_eq!(
        most_recent(&studies).map(|study| study.completed_date.as_str()),
        Some("2025-11")
    );
}

#[test]
fn preview_picks_most_recent_article() {
    let articles = vec![
        article("jan", "JAN 2026"),
        article("nov", "NOV 2025"),
        article("mar", "MAR 2025"),
    ];
    assert_eq!(
        most_recent(&articles).map(|article| article.date.as_str()),
        Some("JAN 2026")
    );
}

#[test]
fn sorting_is_descending_with_undated_records_last() {
    let articles = vec![
        article("undated", "someday"),
        article("mar", "MAR 2025"),
        article("jan", "Jan 2026"),
        article("nov", "nov 2025"),
    ];
    let sorted = sorted_by_recency(&articles);
    let order: Vec<&str> = sorted.iter().map(|article| article.id.as_str()).collect();
    assert_eq!(order, vec!["jan", "nov", "mar", "undated"]);
}

#[test]
fn empty_catalog_has_empty_preview() {
    assert_eq!(
        HomePreview::from_catalog(&ContentCatalog::default()),
        HomePreview::default()
    );
}

#[tokio::test(start_paused = true)]
async fn load_fires_once_after_delay() {
    let source = CountingSource::ok(sample_catalog());
    let mut loader = DeferredContentLoader::new(source.clone(), DELAY);
    let (tx, mut rx) = mpsc::unbounded_channel();

    assert!(loader.schedule(&tx));
    assert!(!loader.schedule(&tx));
    assert_eq!(loader.state(), LoadState::Scheduled);
    assert!(loader.catalog().is_empty());

    tokio::time::advance(Duration::from_millis(50)).await;
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
    assert_eq!(source.calls(), 0);

    let event = rx.recv().await.expect("load result");
    let SiteEvent::CatalogLoaded(result) = event else {
        panic!("unexpected event {event:?}");
    };
    assert!(loader.on_loaded(result));
    assert_eq!(source.calls(), 1);
    assert_eq!(loader.state(), LoadState::Loaded);
    assert_eq!(
        HomePreview::from_catalog(loader.catalog())
            .article
            .map(|article| article.id.as_str().to_string()),
        Some("a-jan".to_string())
    );
    assert!(!loader.schedule(&tx));
}

#[tokio::test(start_paused = true)]
async fn failed_load_is_not_retried() {
    let source = CountingSource::failing();
    let mut loader = DeferredContentLoader::new(source.clone(), DELAY);
    let (tx, mut rx) = mpsc::unbounded_channel();
    loader.schedule(&tx);

    let SiteEvent::CatalogLoaded(result) = rx.recv().await.expect("load result") else {
        panic!("expected catalog result");
    };
    assert!(!loader.on_loaded(result));
    assert_eq!(loader.state(), LoadState::Failed);
    assert!(loader.catalog().is_empty());
    assert_eq!(HomePreview::from_catalog(loader.catalog()), HomePreview::default());

    assert!(!loader.schedule(&tx));
    tokio::time::sleep(DELAY * 5).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_delay_prevents_load() {
    let source = CountingSource::ok(sample_catalog());
    let mut loader = DeferredContentLoader::new(source.clone(), DELAY);
    let (tx, mut rx) = mpsc::unbounded_channel();
    loader.schedule(&tx);
    loader.cancel();
    loader.cancel();

    tokio::time::sleep(DELAY * 3).await;
    assert_eq!(source.calls(), 0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn stray_result_is_ignored_when_nothing_was_scheduled() {
    let source = CountingSource::ok(sample_catalog());
    let mut loader = DeferredContentLoader::new(source, DELAY);
    assert!(!loader.on_loaded(Ok(sample_catalog())));
    assert_eq!(loader.state(), LoadState::Idle);
    assert!(loader.catalog().is_empty());
}
