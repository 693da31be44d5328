//! quizharvest - Incremental current-affairs quiz harvester
//!
//! Discovers quiz articles on a listing page, extracts multiple-choice
//! questions from the ones not seen before, translates them and delivers
//! a rendered document to a Telegram channel.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Page fetching, link discovery and the run pipeline
//! - [`parser`] - Question extraction and answer resolution
//! - [`models`] - Core data structures and types
//! - [`storage`] - Processed links and the running question counter
//! - [`translate`] - Machine translation of question text
//! - [`render`] - Document rendering with Handlebars
//! - [`delivery`] - Document delivery channels (Telegram)
//! - [`publisher`] - Translate, render and deliver a batch
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use quizharvest::config::Config;
//! use quizharvest::parser::QuestionExtractor;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let html = std::fs::read_to_string("article.html")?;
//!     let questions = QuestionExtractor::new().extract_questions(&html);
//!     println!("{} questions from {}", questions.len(), config.source.listing_url);
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod crawler;
pub mod delivery;
pub mod error;
pub mod i18n;
pub mod models;
pub mod parser;
pub mod publisher;
pub mod render;
pub mod storage;
pub mod translate;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{BatchPublisher, HttpFetcher, PageFetcher, QuizPipeline};
    pub use crate::delivery::{Channel, TelegramChannel};
    pub use crate::error::{Error, Result};
    pub use crate::models::{LinkEntry, QuizBatch, QuizQuestion, RunOutcome, RunReport};
    pub use crate::parser::QuestionExtractor;
    pub use crate::publisher::DocumentPublisher;
    pub use crate::storage::{ProgressStore, SharedProgressStore, SqliteProgressStore};
    pub use crate::translate::Translator;
}

// Direct re-exports for convenience
pub use models::{LinkEntry, QuizQuestion, RunOutcome, RunReport};
