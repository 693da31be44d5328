//! Test fixtures for integration tests
//!
//! In-memory collaborators for driving a pipeline run without network
//! access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use quizharvest::crawler::{BatchPublisher, PageFetcher, QuizPipeline};
use quizharvest::delivery::ChannelError;
use quizharvest::error::{Error, FetchError, Result};
use quizharvest::models::{PublishReceipt, QuizBatch};
use quizharvest::storage::{MemoryProgressStore, SharedProgressStore};

use crate::common::{listing_html, ARTICLE_HTML, NO_CONTAINER_HTML};

pub const LISTING_URL: &str = "https://quiz.example/gk-quiz/";

/// URL of the n-th quiz article
pub fn article_url(n: usize) -> String {
    format!("https://quiz.example/daily-quiz-october-{n}/")
}

/// A mid-month date: no counter reset
pub fn mid_month() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// First day of a month: the counter resets
pub fn first_of_month() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
}

/// Fetcher serving canned pages; unknown URLs fail with 404
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Listing page linking to `urls`
    pub fn listing(self, urls: &[String]) -> Self {
        let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        self.page(LISTING_URL, listing_html(&refs))
    }

    /// Article page with two valid questions
    pub fn quiz_article(self, url: impl Into<String>) -> Self {
        self.page(url, ARTICLE_HTML)
    }

    /// Article page without quiz content
    pub fn empty_article(self, url: impl Into<String>) -> Self {
        self.page(url, NO_CONTAINER_HTML)
    }

    pub fn requests_for(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

/// Publisher recording every batch it receives
#[derive(Default)]
pub struct RecordingPublisher {
    pub batches: Mutex<Vec<QuizBatch>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<QuizBatch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchPublisher for RecordingPublisher {
    async fn publish(&self, batch: &QuizBatch) -> Result<PublishReceipt> {
        if self.fail {
            return Err(Error::Channel(ChannelError::Rejected(
                "Forbidden: bot is not a member of the channel".into(),
            )));
        }

        self.batches.lock().unwrap().push(batch.clone());
        Ok(PublishReceipt {
            rendered: batch.len(),
            document: PathBuf::from("memory.md"),
            delivered: true,
        })
    }
}

/// Everything a test needs to run and inspect a pipeline
pub struct Harness {
    pub fetcher: Arc<StaticFetcher>,
    pub store: Arc<MemoryProgressStore>,
    pub publisher: Arc<RecordingPublisher>,
    pub pipeline: QuizPipeline,
}

impl Harness {
    pub fn new(fetcher: StaticFetcher, store: MemoryProgressStore) -> Self {
        Self::with_publisher(fetcher, store, RecordingPublisher::default())
    }

    pub fn with_publisher(
        fetcher: StaticFetcher,
        store: MemoryProgressStore,
        publisher: RecordingPublisher,
    ) -> Self {
        let fetcher = Arc::new(fetcher);
        let store = Arc::new(store);
        let publisher = Arc::new(publisher);

        let shared_store: SharedProgressStore = store.clone();
        let pipeline = QuizPipeline::new(
            LISTING_URL,
            fetcher.clone(),
            shared_store,
            publisher.clone(),
        );

        Self {
            fetcher,
            store,
            publisher,
            pipeline,
        }
    }
}
