//! Incremental quiz pipeline
//!
//! One run walks a fixed sequence of states:
//!
//! ```text
//! LOAD_LINKS ─▶ MAYBE_RESET ─▶ LOAD_COUNTER ─▶ FILTER_NEW_LINKS
//!                                                   │
//!                         ┌─────────────────────────┴──────────┐
//!                         ▼                                    ▼
//!                 (nothing new) DONE       PROCESS_EACH_LINK ─▶ PUBLISH ─▶ DONE
//! ```
//!
//! Links are processed strictly one after another. A link is marked as
//! processed right after it yields at least one question; the counter is
//! advanced once, after the batch has been published.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use quizharvest::crawler::{HttpFetcher, QuizPipeline};
//! use quizharvest::storage::SqliteProgressStore;
//! # use quizharvest::crawler::BatchPublisher;
//!
//! # async fn example(publisher: Arc<dyn BatchPublisher>) -> anyhow::Result<()> {
//! let pipeline = QuizPipeline::new(
//!     "https://www.gktoday.in/gk-current-affairs-quiz-questions-answers/",
//!     Arc::new(HttpFetcher::new(2)?),
//!     Arc::new(SqliteProgressStore::new("data/progress.db")?),
//!     publisher,
//! );
//!
//! let report = pipeline.run(chrono::Local::now().date_naive()).await?;
//! println!("{} new questions", report.questions);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::list::fetch_links;
use super::PageFetcher;
use crate::error::Result;
use crate::models::{LinkEntry, PublishReceipt, QuizBatch, QuizQuestion, RunOutcome, RunReport};
use crate::parser::QuestionExtractor;
use crate::storage::SharedProgressStore;

/// Consumer of the accumulated questions of a run
///
/// Implementations render and deliver the batch. An error aborts the run
/// before the counter is advanced.
#[async_trait]
pub trait BatchPublisher: Send + Sync {
    async fn publish(&self, batch: &QuizBatch) -> Result<PublishReceipt>;
}

/// Links not yet processed, in discovery order
///
/// Repeated URLs within the same listing are kept only once.
pub fn filter_new_links(links: &[LinkEntry], processed: &HashSet<String>) -> Vec<LinkEntry> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| !processed.contains(&link.url))
        .filter(|link| seen.insert(link.url.clone()))
        .cloned()
        .collect()
}

/// Orchestrates one incremental run
pub struct QuizPipeline {
    listing_url: String,
    fetcher: Arc<dyn PageFetcher>,
    store: SharedProgressStore,
    publisher: Arc<dyn BatchPublisher>,
    extractor: QuestionExtractor,
}

impl QuizPipeline {
    pub fn new(
        listing_url: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
        store: SharedProgressStore,
        publisher: Arc<dyn BatchPublisher>,
    ) -> Self {
        Self {
            listing_url: listing_url.into(),
            fetcher,
            store,
            publisher,
            extractor: QuestionExtractor::new(),
        }
    }

    /// Listing page this pipeline reads
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Execute one run
    ///
    /// `today` drives the monthly counter reset.
    ///
    /// # Errors
    ///
    /// Store failures and publishing failures abort the run. Fetch and
    /// parse failures never do: the affected page is treated as empty.
    pub async fn run(&self, today: NaiveDate) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id, listing = %self.listing_url);

        self.run_inner(today).instrument(span).await
    }

    async fn run_inner(&self, today: NaiveDate) -> Result<RunReport> {
        let links = fetch_links(self.fetcher.as_ref(), &self.listing_url).await;

        let reset_applied = self.store.maybe_reset(today)?;
        let counter = self.store.get_counter()?;
        let processed = self.store.load_processed_urls()?;

        let mut report = RunReport::new(counter, reset_applied);
        report.links_discovered = links.len();

        let new_links = filter_new_links(&links, &processed);
        report.links_new = new_links.len();

        if new_links.is_empty() {
            tracing::info!("No new links to scrape");
            return Ok(report);
        }

        tracing::info!(new = new_links.len(), counter, "Processing new links");

        let mut accumulated: Vec<QuizQuestion> = Vec::new();
        let mut last_success: Option<String> = None;

        for link in &new_links {
            let questions = self.scrape_link(link).await;

            if questions.is_empty() {
                tracing::info!(url = %link.url, "No questions found");
                report.links_empty += 1;
                continue;
            }

            tracing::info!(url = %link.url, count = questions.len(), "Extracted questions");
            accumulated.extend(questions);
            self.store.mark_processed(&link.url)?;
            last_success = Some(link.url.clone());
            report.links_processed += 1;
        }

        report.questions = accumulated.len();

        let Some(source_url) = last_success else {
            tracing::info!("No questions to process");
            report.outcome = RunOutcome::NoQuestions;
            return Ok(report);
        };

        let batch = QuizBatch {
            questions: accumulated,
            start_index: counter,
            source_url,
        };

        let receipt = self.publisher.publish(&batch).await?;

        let new_counter = counter + receipt.rendered as u64;
        self.store.set_counter(new_counter)?;

        tracing::info!(
            rendered = receipt.rendered,
            counter = new_counter,
            document = %receipt.document.display(),
            "Run published"
        );

        report.outcome = RunOutcome::Published;
        report.counter_after = new_counter;
        report.document = Some(receipt.document);

        Ok(report)
    }

    async fn scrape_link(&self, link: &LinkEntry) -> Vec<QuizQuestion> {
        tracing::debug!(position = link.position, url = %link.url, "Scraping link");

        match self.fetcher.fetch(&link.url).await {
            Ok(html) => self.extractor.extract_questions(&html),
            Err(e) => {
                tracing::warn!(url = %link.url, error = %e, "Failed to fetch article");
                Vec::new()
            }
        }
    }
}
