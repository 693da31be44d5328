//! End-to-end pipeline run tests
//!
//! Tests the complete workflow:
//! 1. Link discovery on the listing page
//! 2. Dedup against processed links
//! 3. Question extraction per article
//! 4. Publishing the accumulated batch
//! 5. Counter bookkeeping and monthly reset

use quizharvest::models::RunOutcome;
use quizharvest::storage::{MemoryProgressStore, ProgressStore};

use super::fixtures::{article_url, first_of_month, mid_month, Harness, StaticFetcher};

// ============================================================================
// Complete Run Tests
// ============================================================================

#[tokio::test]
async fn test_run_publishes_new_questions() {
    let quiz = article_url(18);
    let empty = article_url(17);
    let fetcher = StaticFetcher::new()
        .listing(&[quiz.clone(), empty.clone()])
        .quiz_article(&quiz)
        .empty_article(&empty);

    let harness = Harness::new(fetcher, MemoryProgressStore::with_state(Vec::<String>::new(), 10));
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Published);
    assert_eq!(report.links_discovered, 2);
    assert_eq!(report.links_new, 2);
    assert_eq!(report.links_processed, 1);
    assert_eq!(report.links_empty, 1);
    assert_eq!(report.questions, 2);
    assert_eq!(report.counter_before, 10);
    assert_eq!(report.counter_after, 12);
    assert!(!report.reset_applied);

    let batches = harness.publisher.published();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].start_index, 10);
    assert_eq!(batches[0].source_url, quiz);

    assert_eq!(harness.store.get_counter().unwrap(), 12);
    let processed = harness.store.load_processed_urls().unwrap();
    assert!(processed.contains(&quiz));
    assert!(!processed.contains(&empty), "empty pages are retried later");
}

#[tokio::test]
async fn test_questions_accumulate_in_link_order() {
    let first = article_url(16);
    let second = article_url(17);
    let fetcher = StaticFetcher::new()
        .listing(&[first.clone(), second.clone()])
        .quiz_article(&first)
        .quiz_article(&second);

    let harness = Harness::new(fetcher, MemoryProgressStore::new());
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert_eq!(report.questions, 4);
    assert_eq!(report.counter_after, 4);

    let batch = &harness.publisher.published()[0];
    assert_eq!(batch.len(), 4);
    assert_eq!(batch.source_url, second, "title comes from the last successful link");
    assert!(batch.questions[0].question_text.starts_with("1."));
    assert!(batch.questions[2].question_text.starts_with("1."));
}

// ============================================================================
// Idempotence Tests
// ============================================================================

#[tokio::test]
async fn test_second_run_is_nothing_new() {
    let quiz = article_url(18);
    let fetcher = StaticFetcher::new().listing(&[quiz.clone()]).quiz_article(&quiz);

    let harness = Harness::new(fetcher, MemoryProgressStore::new());

    let first = harness.pipeline.run(mid_month()).await.unwrap();
    assert_eq!(first.outcome, RunOutcome::Published);

    let second = harness.pipeline.run(mid_month()).await.unwrap();
    assert_eq!(second.outcome, RunOutcome::NothingNew);
    assert_eq!(second.links_new, 0);
    assert_eq!(second.counter_before, 2);
    assert_eq!(second.counter_after, 2);

    assert_eq!(harness.publisher.published().len(), 1);
    assert_eq!(harness.fetcher.requests_for(&quiz), 1);
}

#[tokio::test]
async fn test_previously_processed_links_are_not_fetched() {
    let old = article_url(17);
    let new = article_url(18);
    let fetcher = StaticFetcher::new()
        .listing(&[new.clone(), old.clone()])
        .quiz_article(&new)
        .quiz_article(&old);

    let harness = Harness::new(fetcher, MemoryProgressStore::with_state([old.clone()], 30));
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert_eq!(report.links_new, 1);
    assert_eq!(report.counter_after, 32);
    assert_eq!(harness.fetcher.requests_for(&old), 0);
}

#[tokio::test]
async fn test_duplicate_listing_entries_processed_once() {
    let quiz = article_url(18);
    let fetcher = StaticFetcher::new()
        .listing(&[quiz.clone(), quiz.clone()])
        .quiz_article(&quiz);

    let harness = Harness::new(fetcher, MemoryProgressStore::new());
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert_eq!(report.links_discovered, 2);
    assert_eq!(report.links_new, 1);
    assert_eq!(report.questions, 2);
    assert_eq!(harness.fetcher.requests_for(&quiz), 1);
}

// ============================================================================
// Monthly Reset Tests
// ============================================================================

#[tokio::test]
async fn test_reset_on_first_of_month_without_new_links() {
    let quiz = article_url(31);
    let fetcher = StaticFetcher::new().listing(&[quiz.clone()]).quiz_article(&quiz);

    let harness = Harness::new(fetcher, MemoryProgressStore::with_state([quiz], 250));
    let report = harness.pipeline.run(first_of_month()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::NothingNew);
    assert!(report.reset_applied);
    assert_eq!(report.counter_before, 0);
    assert_eq!(harness.store.get_counter().unwrap(), 0);
    assert_eq!(harness.store.load_processed_urls().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reset_then_number_from_one() {
    let quiz = article_url(1);
    let fetcher = StaticFetcher::new().listing(&[quiz.clone()]).quiz_article(&quiz);

    let harness = Harness::new(fetcher, MemoryProgressStore::with_state(Vec::<String>::new(), 250));
    let report = harness.pipeline.run(first_of_month()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Published);
    assert_eq!(harness.publisher.published()[0].start_index, 0);
    assert_eq!(harness.store.get_counter().unwrap(), 2);
}

#[tokio::test]
async fn test_no_reset_mid_month() {
    let fetcher = StaticFetcher::new().listing(&[]);

    let harness = Harness::new(fetcher, MemoryProgressStore::with_state(Vec::<String>::new(), 250));
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert!(!report.reset_applied);
    assert_eq!(harness.store.get_counter().unwrap(), 250);
}

#[tokio::test]
async fn test_new_links_without_questions() {
    let empty = article_url(18);
    let fetcher = StaticFetcher::new().listing(&[empty.clone()]).empty_article(&empty);

    let harness = Harness::new(fetcher, MemoryProgressStore::with_state(Vec::<String>::new(), 5));
    let report = harness.pipeline.run(mid_month()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::NoQuestions);
    assert_eq!(report.links_empty, 1);
    assert_eq!(report.counter_after, 5);
    assert!(harness.publisher.published().is_empty());
    assert!(harness.store.load_processed_urls().unwrap().is_empty());
}
