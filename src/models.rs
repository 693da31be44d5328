// Core data structures for the quiz harvester

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A link discovered on the listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub position: usize, // 1-based order of appearance
    pub url: String,
}

impl LinkEntry {
    pub fn new(position: usize, url: impl Into<String>) -> Self {
        Self {
            position,
            url: url.into(),
        }
    }
}

/// One accepted multiple-choice question
///
/// Only constructed by the extractor once the options list has at least
/// two entries and `correct_index` points into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question_text: String, // includes the published ordinal label
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Letter of the correct option (A, B, ...)
    pub fn correct_letter(&self) -> char {
        index_to_letter(self.correct_index)
    }

    /// Text of the correct option
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// Map an option index to its display letter
pub fn index_to_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map(char::from)
        .unwrap_or('?')
}

/// Questions accumulated during one run, ready for publishing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizBatch {
    pub questions: Vec<QuizQuestion>,
    /// Counter value before this batch; numbering starts at `start_index + 1`
    pub start_index: u64,
    /// Most recent link that produced questions
    pub source_url: String,
}

impl QuizBatch {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// What a publisher did with a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Number of records that made it into the document
    pub rendered: usize,
    pub document: PathBuf,
    pub delivered: bool,
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every discovered link was already processed
    NothingNew,
    /// New links existed but none yielded a question
    NoQuestions,
    /// A document was produced and delivered
    Published,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::NothingNew => "nothing_new",
            RunOutcome::NoQuestions => "no_questions",
            RunOutcome::Published => "published",
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of a single pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub links_discovered: usize,
    pub links_new: usize,
    pub links_processed: usize,
    pub links_empty: usize,
    pub questions: usize,
    pub counter_before: u64,
    pub counter_after: u64,
    pub reset_applied: bool,
    pub document: Option<PathBuf>,
}

impl RunReport {
    pub(crate) fn new(counter_before: u64, reset_applied: bool) -> Self {
        Self {
            outcome: RunOutcome::NothingNew,
            links_discovered: 0,
            links_new: 0,
            links_processed: 0,
            links_empty: 0,
            questions: 0,
            counter_before,
            counter_after: counter_before,
            reset_applied,
            document: None,
        }
    }
}

/// Snapshot of persisted progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub processed_links: usize,
    pub counter: u64,
    pub last_processed_at: Option<DateTime<Utc>>,
}
