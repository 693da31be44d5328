//! Configuration management for the quiz harvester
//!
//! Configuration is read from an optional TOML file (or defaults) and then
//! overridden by environment variables. Delivery credentials are never read
//! from the file: they only come from `BOT_TOKEN` and
//! `TELEGRAM_CHANNEL_USERNAME`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::crawler::fetcher::DEFAULT_USER_AGENT;
use crate::delivery::TelegramConfig;

/// Listing page scraped by default
pub const DEFAULT_LISTING_URL: &str =
    "https://www.gktoday.in/gk-current-affairs-quiz-questions-answers/";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiz source configuration
    pub source: SourceConfig,

    /// Progress store configuration
    pub store: StoreConfig,

    /// Translation configuration
    pub translation: TranslationConfig,

    /// Rendered document output
    pub output: OutputConfig,

    /// Telegram delivery
    pub telegram: DeliveryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Quiz source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Listing page enumerating quiz articles
    pub listing_url: String,

    /// User agent string
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit (requests per second)
    pub requests_per_second: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            requests_per_second: 2,
        }
    }
}

/// Progress store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("data/progress.db"),
        }
    }
}

/// Translation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Translate questions before rendering
    pub enabled: bool,

    /// Target language code
    pub target_language: String,

    /// Translation service base URL
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_language: String::from("gu"),
            endpoint: String::from("https://translate.googleapis.com"),
            timeout_secs: 20,
        }
    }
}

/// Rendered document output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving rendered documents
    pub dir: PathBuf,

    /// Keep documents on disk after a successful delivery
    pub keep_documents: bool,

    /// Custom Handlebars template
    pub template: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            keep_documents: false,
            template: None,
        }
    }
}

/// Telegram delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Bot token (`BOT_TOKEN`)
    #[serde(skip)]
    pub bot_token: Option<String>,

    /// Target channel (`TELEGRAM_CHANNEL_USERNAME`)
    #[serde(skip)]
    pub channel: Option<String>,

    /// Bot API base URL
    pub api_base: String,

    /// Upload timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel: None,
            api_base: String::from("https://api.telegram.org"),
            timeout_secs: 60,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from defaults and environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Override values from environment variables
    pub fn apply_env(&mut self) {
        if let Some(v) = env_string("QUIZ_LISTING_URL") {
            self.source.listing_url = v;
        }
        if let Some(v) = env_string("QUIZ_USER_AGENT") {
            self.source.user_agent = v;
        }
        if let Some(v) = env_parse("QUIZ_REQUEST_TIMEOUT") {
            self.source.request_timeout_secs = v;
        }
        if let Some(v) = env_parse("QUIZ_RATE_LIMIT") {
            self.source.requests_per_second = v;
        }
        if let Some(v) = env_string("QUIZ_SQLITE_PATH") {
            self.store.sqlite_path = PathBuf::from(v);
        }
        if let Some(v) = env_parse("QUIZ_TRANSLATE") {
            self.translation.enabled = v;
        }
        if let Some(v) = env_string("QUIZ_TARGET_LANG") {
            self.translation.target_language = v;
        }
        if let Some(v) = env_string("QUIZ_TRANSLATE_ENDPOINT") {
            self.translation.endpoint = v;
        }
        if let Some(v) = env_string("QUIZ_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }
        if let Some(v) = env_parse("QUIZ_KEEP_DOCUMENTS") {
            self.output.keep_documents = v;
        }
        if let Some(v) = env_string("QUIZ_TELEGRAM_API") {
            self.telegram.api_base = v;
        }
        if let Some(v) = env_string("QUIZ_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = env_string("QUIZ_LOG_FORMAT") {
            self.logging.format = v;
        }

        self.telegram.bot_token = env_string("BOT_TOKEN");
        self.telegram.channel = env_string("TELEGRAM_CHANNEL_USERNAME");
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.listing_url)
            .with_context(|| format!("listing_url is not a valid URL: {}", self.source.listing_url))?;

        if self.source.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.source.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.translation.enabled && self.translation.target_language.trim().is_empty() {
            anyhow::bail!("target_language must be set when translation is enabled");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Telegram channel settings, requiring both credentials
    pub fn telegram_config(&self) -> Result<TelegramConfig> {
        let token = self
            .telegram
            .bot_token
            .clone()
            .context("BOT_TOKEN is not set")?;
        let channel = self
            .telegram
            .channel
            .clone()
            .context("TELEGRAM_CHANNEL_USERNAME is not set")?;

        Ok(TelegramConfig::new(token, channel)
            .with_api_base(self.telegram.api_base.clone())
            .with_timeout(self.telegram.timeout_secs))
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.request_timeout_secs)
    }
}
