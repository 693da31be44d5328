//! Telegram delivery channel
//!
//! Uploads documents through the Bot API `sendDocument` method as a
//! multipart form.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::{Channel, ChannelError, ChannelResult, DeliveryStatus};
use crate::utils::truncate_text;

/// Telegram limits document captions to this many characters
pub const MAX_CAPTION_CHARS: usize = 1024;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: String,
    /// Target chat: `@channelusername` or a numeric chat id
    pub chat_id: String,
    /// Bot API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    60
}

impl TelegramConfig {
    /// Create a new Telegram configuration
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
        }
    }

    /// Override the Bot API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bot_token.trim().is_empty() {
            return Err("Bot token cannot be empty".to_string());
        }

        if self.chat_id.trim().is_empty() {
            return Err("Chat id cannot be empty".to_string());
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err("API base must start with http:// or https://".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

/// Telegram document channel
///
/// # Example
///
/// ```rust,ignore
/// use quizharvest::delivery::{Channel, TelegramChannel, TelegramConfig};
///
/// let config = TelegramConfig::new(token, "@daily_quiz");
/// let channel = TelegramChannel::new(config)?;
/// channel.send_document(Path::new("Quiz_1760000000.md"), "Quiz ગુજરાતીમાં").await?;
/// ```
pub struct TelegramChannel {
    config: TelegramConfig,
    client: Client,
}

impl TelegramChannel {
    /// Create a new Telegram channel
    pub fn new(config: TelegramConfig) -> ChannelResult<Self> {
        config.validate().map_err(ChannelError::InvalidConfig)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Target chat
    pub fn chat_id(&self) -> &str {
        &self.config.chat_id
    }

    async fn read_envelope(response: reqwest::Response) -> ChannelResult<ApiResponse> {
        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() == 429 {
            return Err(ChannelError::RateLimited(body));
        }

        let envelope: ApiResponse = serde_json::from_str(&body)?;
        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| format!("status {}", status.as_u16()));
            return Err(ChannelError::Rejected(description));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_document(&self, path: &Path, caption: &str) -> ChannelResult<DeliveryStatus> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.md".to_string());

        let document = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("text/markdown")?;

        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("caption", truncate_text(caption, MAX_CAPTION_CHARS))
            .part("document", document);

        tracing::debug!(chat = %self.config.chat_id, file = %file_name, "Uploading document");

        let response = self
            .client
            .post(self.config.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;

        let envelope = Self::read_envelope(response).await?;

        let message_id = envelope
            .result
            .as_ref()
            .and_then(|r| r.get("message_id"))
            .and_then(|id| id.as_i64());

        tracing::info!(chat = %self.config.chat_id, file = %file_name, ?message_id, "Sent document");

        Ok(match message_id {
            Some(id) => DeliveryStatus::success_with_message(self.name(), format!("message {id}")),
            None => DeliveryStatus::success(self.name()),
        })
    }

    async fn health_check(&self) -> ChannelResult<bool> {
        let response = self
            .client
            .get(self.config.method_url("getMe"))
            .send()
            .await?;

        Ok(Self::read_envelope(response).await.is_ok())
    }
}
