//! Error types for the quiz harvester
//!
//! This module defines the errors raised by fetching, parsing and the
//! progress store.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while extracting quiz content
///
/// Every variant is recovered locally: the offending scope (a page or a
/// single question block) is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Structural container not present on the page
    #[error("Quiz container not found")]
    ContainerNotFound,

    /// No options block follows the question
    #[error("Options block missing")]
    OptionsBlockMissing,

    /// No answer block follows the question
    #[error("Answer block missing")]
    AnswerBlockMissing,

    /// Neither answer strategy produced a letter
    #[error("Correct answer could not be resolved")]
    AnswerUnresolved,

    /// Fewer than two options were found
    #[error("Too few options: {0}")]
    TooFewOptions(usize),

    /// Resolved letter points past the option list
    #[error("Answer index {index} out of range for {options} options")]
    AnswerOutOfRange { index: usize, options: usize },
}

/// Errors raised by the progress store
///
/// These are not recovered: they abort the run.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem failure while opening the store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Persisted value could not be interpreted
    #[error("Corrupt value for '{key}': {value}")]
    CorruptValue { key: String, value: String },
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
