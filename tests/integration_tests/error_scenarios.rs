//! Error handling scenarios
//!
//! Fetch failures never abort a run. Store and publish failures do, and
//! leave the counter untouched.

use quizharvest::error::{Error, StoreError};
use quizharvest::models::RunOutcome;
use quizharvest::storage::{MemoryProgressStore, ProgressStore, SqliteProgressStore};
use std::sync::Arc;
use tempfile::TempDir;

use super::fixtures::{
    article_url, mid_month, Harness, RecordingPublisher, StaticFetcher, LISTING_URL,
};

#[tokio::test]
async fn test_listing_fetch_failure_is_nothing_new() {
    // no listing page registered: every fetch fails
    let harness = Harness::new(StaticFetcher::new(), MemoryProgressStore::with_state(Vec::<String>::new(), 7));
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::NothingNew);
    assert_eq!(report.links_discovered, 0);
    assert_eq!(harness.store.get_counter().unwrap(), 7);
    assert_eq!(harness.fetcher.requests_for(LISTING_URL), 1);
}

#[tokio::test]
async fn test_article_fetch_failure_treated_as_empty() {
    let broken = article_url(17);
    let quiz = article_url(18);
    let fetcher = StaticFetcher::new()
        .listing(&[broken.clone(), quiz.clone()])
        .quiz_article(&quiz);

    let harness = Harness::new(fetcher, MemoryProgressStore::new());
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Published);
    assert_eq!(report.links_empty, 1);
    assert_eq!(report.questions, 2);

    let processed = harness.store.load_processed_urls().unwrap();
    assert!(!processed.contains(&broken));
    assert!(processed.contains(&quiz));
}

#[tokio::test]
async fn test_publish_failure_keeps_counter() {
    let quiz = article_url(18);
    let fetcher = StaticFetcher::new().listing(&[quiz.clone()]).quiz_article(&quiz);

    let harness = Harness::with_publisher(
        fetcher,
        MemoryProgressStore::with_state(Vec::<String>::new(), 40),
        RecordingPublisher::failing(),
    );

    let err = harness.pipeline.run(mid_month()).await.unwrap_err();
    assert!(matches!(err, Error::Channel(_)));

    assert_eq!(harness.store.get_counter().unwrap(), 40);
    // the link was marked before publishing
    assert!(harness.store.load_processed_urls().unwrap().contains(&quiz));
}

#[tokio::test]
async fn test_corrupt_counter_aborts_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.db");

    let store = SqliteProgressStore::new(&path).unwrap();
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO counters (key, value, updated_at) VALUES ('last_question_count', 'twelve', '2026-10-18T00:00:00Z')",
            [],
        )
        .unwrap();
    }

    assert!(matches!(
        store.get_counter(),
        Err(StoreError::CorruptValue { .. })
    ));

    let quiz = article_url(18);
    let fetcher = Arc::new(StaticFetcher::new().listing(&[quiz.clone()]).quiz_article(&quiz));
    let publisher = Arc::new(RecordingPublisher::default());
    let pipeline = quizharvest::crawler::QuizPipeline::new(
        LISTING_URL,
        fetcher.clone(),
        Arc::new(store),
        publisher.clone(),
    );

    let err = pipeline.run(mid_month()).await.unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::CorruptValue { .. })));
    assert!(publisher.published().is_empty());
    assert_eq!(fetcher.requests_for(&quiz), 0);
}
