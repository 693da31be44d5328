//! Text cleanup for extracted quiz content

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::normalize_whitespace;

// Leading "[A]" style marker on an option line
static OPTION_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[.\]\s*").unwrap());

static NOTES_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Notes:").unwrap());

/// Placeholder used when a question has no explanation
pub const NO_EXPLANATION: &str = "No explanation available.";

/// Strip a leading bracketed single-character marker and trim
///
/// ```
/// use quizharvest::parser::sanitize::clean_option;
///
/// assert_eq!(clean_option("[A] Paris"), "Paris");
/// assert_eq!(clean_option("  Lyon "), "Lyon");
/// ```
pub fn clean_option(line: &str) -> String {
    OPTION_MARKER_REGEX.replace(line, "").trim().to_string()
}

/// Clean every option line, dropping the ones left empty
pub fn clean_options<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| clean_option(line.as_ref()))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Remove the "Notes:" label from an explanation
///
/// Returns the placeholder when nothing is left.
pub fn clean_explanation(text: Option<&str>) -> String {
    let cleaned = text
        .map(|t| normalize_whitespace(&NOTES_LABEL_REGEX.replace_all(t, "")))
        .unwrap_or_default();

    if cleaned.is_empty() {
        NO_EXPLANATION.to_string()
    } else {
        cleaned
    }
}

/// Trim question text, keeping its inner layout as published
pub fn clean_question(text: &str) -> String {
    text.trim().to_string()
}
