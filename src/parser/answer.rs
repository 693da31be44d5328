//! Correct answer resolution
//!
//! Answers are resolved by an ordered chain of pure strategies. The first
//! strategy that yields an index wins; later strategies are never consulted.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static STATED_ANSWER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:correct\s+answer)\s*:\s*\[?\s*([A-D])\b").unwrap()
});

/// Raw text available to the strategies for one question
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerEvidence<'a> {
    /// Text of the stated-answer element in the answer block
    pub stated: Option<&'a str>,
    /// Text of the alternate marker inside the question block
    pub marker: Option<&'a str>,
}

/// Which strategy produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerSource {
    Stated,
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnswer {
    pub index: usize,
    pub source: AnswerSource,
}

type Strategy = fn(&AnswerEvidence<'_>) -> Option<usize>;

const STRATEGIES: &[(AnswerSource, Strategy)] = &[
    (AnswerSource::Stated, from_stated_answer),
    (AnswerSource::Marker, from_marker),
];

/// Run the strategy chain; `None` means the answer is unresolved
pub fn resolve(evidence: &AnswerEvidence<'_>) -> Option<ResolvedAnswer> {
    STRATEGIES.iter().find_map(|(source, strategy)| {
        strategy(evidence).map(|index| ResolvedAnswer {
            index,
            source: *source,
        })
    })
}

/// Primary strategy: "Correct Answer: X" in the stated-answer text
pub fn from_stated_answer(evidence: &AnswerEvidence<'_>) -> Option<usize> {
    let text = evidence.stated?;
    let caps = STATED_ANSWER_REGEX.captures(text)?;
    let letter = caps.get(1)?.as_str().chars().next()?;
    letter_to_index(letter)
}

/// Fallback strategy: first non-whitespace character of the marker
pub fn from_marker(evidence: &AnswerEvidence<'_>) -> Option<usize> {
    let first = evidence.marker?.trim().chars().next()?;
    letter_to_index(first)
}

/// Map an uppercase option letter to its zero-based index (A→0 … D→3)
pub fn letter_to_index(letter: char) -> Option<usize> {
    match letter {
        'A' => Some(0),
        'B' => Some(1),
        'C' => Some(2),
        'D' => Some(3),
        _ => None,
    }
}
