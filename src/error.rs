//! Unified error handling for the quizharvest crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! Nothing is retried: a run either absorbs an error locally (fetch, parse,
//! translation) or stops with it (store, render, delivery).

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::delivery::ChannelError;
pub use crate::render::RenderError;
pub use crate::translate::TranslateError;
pub use crate::utils::error::{FetchError, ParseError, StoreError};

/// Unified error type for the quizharvest crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse-specific errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Progress store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Translation errors
    #[error("Translation error: {0}")]
    Translate(#[from] TranslateError),

    /// Document rendering errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Delivery channel errors
    #[error("Delivery error: {0}")]
    Channel(#[from] ChannelError),
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
