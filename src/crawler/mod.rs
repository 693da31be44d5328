//! Page fetching, link discovery and the run pipeline
//!
//! This module implements the incremental crawl: discover quiz links on the
//! listing page, skip the ones already processed, extract questions from
//! the rest and hand the accumulated batch to a publisher.

pub mod fetcher;
pub mod list;
pub mod pipeline;

use async_trait::async_trait;

use crate::utils::error::FetchError;

pub use fetcher::HttpFetcher;
pub use list::{discover_links, fetch_links};
pub use pipeline::{BatchPublisher, QuizPipeline};

/// Source of page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its decoded markup
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
