//! Text translation
//!
//! [`GoogleTranslator`] talks to the public Google translate JSON endpoint
//! (`/translate_a/single`), detecting the source language automatically.
//! [`PassthroughTranslator`] returns text unchanged and is used when
//! translation is disabled.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::TranslationConfig;

/// Maximum characters sent in a single request
const MAX_CHUNK_CHARS: usize = 4500;

/// Errors raised by a translator
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Translation service returned status {0}")]
    Status(u16),

    /// Response body did not have the expected shape
    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

/// Translates text into a target language
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}

/// Translator that returns its input unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

/// Google translate client
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    /// Create a translator from configuration
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslateError> {
        Self::with_endpoint(&config.endpoint, Duration::from_secs(config.timeout_secs))
    }

    /// Create a translator against a specific endpoint
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn translate_chunk(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let url = format!("{}/translate_a/single", self.endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        parse_response(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let mut translated = String::new();
        for chunk in split_chunks(text, MAX_CHUNK_CHARS) {
            translated.push_str(&self.translate_chunk(&chunk, target_lang).await?);
        }

        tracing::trace!(chars = text.chars().count(), target_lang, "Translated text");
        Ok(translated)
    }
}

/// Join the translated segments of a `translate_a/single` response
///
/// The body looks like `[[["segment", "source", ...], ...], null, "en", ...]`.
fn parse_response(body: &serde_json::Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::MalformedResponse(truncate_body(body)))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
        .collect();

    if text.is_empty() {
        return Err(TranslateError::MalformedResponse(truncate_body(body)));
    }

    Ok(text)
}

fn truncate_body(body: &serde_json::Value) -> String {
    crate::utils::truncate_text(&body.to_string(), 200)
}

/// Split text on line boundaries into chunks of at most `max_chars`
fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if !current.is_empty() && current.chars().count() + line.chars().count() > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
