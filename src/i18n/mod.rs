//! Internationalization (i18n) support
//!
//! Labels inside rendered documents and the delivery caption follow the
//! translation target language. Supported locales: English (en),
//! Gujarati (gu), Hindi (hi). Anything else falls back to English.
//!
//! # Environment Variables
//!
//! - `QUIZ_LANG`: Language for CLI output. Defaults to English.
//!
//! # Usage
//!
//! ```rust,ignore
//! use quizharvest::i18n::t;
//!
//! let label = t!("document.answer", locale = "gu");
//! ```

use std::sync::OnceLock;

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

static CURRENT_LOCALE: OnceLock<String> = OnceLock::new();

/// Locales shipped with the crate
pub const SUPPORTED_LOCALES: &[&str] = &["en", "gu", "hi"];

/// Set the current locale for translations
pub fn set_locale(locale: &str) {
    let normalized = normalize_locale(locale);
    rust_i18n::set_locale(&normalized);
    CURRENT_LOCALE.get_or_init(|| normalized.clone());
}

/// Get the current locale
///
/// Returns the currently active locale or the default fallback.
pub fn current_locale() -> &'static str {
    CURRENT_LOCALE.get().map(|s| s.as_str()).unwrap_or("en")
}

/// Initialize i18n from the `QUIZ_LANG` environment variable
pub fn init_from_env() {
    let locale = std::env::var("QUIZ_LANG").unwrap_or_else(|_| "en".to_string());
    set_locale(&locale);
}

/// Normalize a language code to a supported locale
///
/// - gu, gu-IN, gujarati -> gu
/// - hi, hi-IN, hindi -> hi
/// - anything else -> en
pub fn normalize_locale(locale: &str) -> String {
    let lower = locale.trim().to_lowercase();

    if lower.starts_with("gu") {
        "gu".to_string()
    } else if lower.starts_with("hi") {
        "hi".to_string()
    } else {
        "en".to_string()
    }
}

/// Translate a key with optional parameters
///
/// This is a re-export of rust_i18n::t! for convenience.
#[doc(inline)]
pub use rust_i18n::t;
