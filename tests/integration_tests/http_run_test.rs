//! Full run over HTTP: mock listing, mock article, mock Bot API

use std::sync::Arc;

use quizharvest::crawler::{HttpFetcher, QuizPipeline};
use quizharvest::delivery::{TelegramChannel, TelegramConfig};
use quizharvest::models::RunOutcome;
use quizharvest::publisher::DocumentPublisher;
use quizharvest::render::DocumentRenderer;
use quizharvest::storage::{ProgressStore, SqliteProgressStore};
use quizharvest::translate::PassthroughTranslator;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::mid_month;
use crate::common::{listing_html, ARTICLE_HTML};

#[tokio::test]
async fn test_full_run_delivers_document() {
    let site = MockServer::start().await;
    let bot_api = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/gk-quiz/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&["/daily-current-affairs-quiz-october-18-2026/"])),
        )
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/daily-current-affairs-quiz-october-18-2026/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendDocument"))
        .and(body_string_contains(
            "Daily Current Affairs Quiz October 18 2026 ગુજરાતીમાં",
        ))
        .and(body_string_contains("Godavari"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "result": {"message_id": 7}})),
        )
        .expect(1)
        .mount(&bot_api)
        .await;

    let store = Arc::new(SqliteProgressStore::new(dir.path().join("progress.db")).unwrap());
    let output_dir = dir.path().join("output");

    let channel = TelegramChannel::new(
        TelegramConfig::new("123:abc", "@daily_quiz").with_api_base(bot_api.uri()),
    )
    .unwrap();
    let renderer = DocumentRenderer::new(&output_dir, "gu").unwrap();
    let publisher = DocumentPublisher::new(
        Arc::new(PassthroughTranslator),
        renderer,
        Arc::new(channel),
        "gu",
    );

    let listing_url = format!("{}/gk-quiz/", site.uri());
    let pipeline = QuizPipeline::new(
        listing_url,
        Arc::new(HttpFetcher::new(20).unwrap()),
        store.clone(),
        Arc::new(publisher),
    );

    let report = pipeline.run(mid_month()).await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Published);
    assert_eq!(report.questions, 2);
    assert_eq!(store.get_counter().unwrap(), 2);

    let document = report.document.unwrap();
    assert!(!document.exists(), "delivered document is removed");

    // second run: nothing new, no further article fetch or upload
    let second = pipeline.run(mid_month()).await.unwrap();
    assert_eq!(second.outcome, RunOutcome::NothingNew);
}
