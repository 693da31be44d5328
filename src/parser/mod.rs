//! HTML parsing and quiz extraction
//!
//! This module handles parsing quiz article pages and extracting
//! structured multiple-choice questions.

pub mod answer;
pub mod markup;
pub mod quiz;
pub mod sanitize;
pub mod selectors;

pub use answer::{AnswerEvidence, AnswerSource, ResolvedAnswer};
pub use quiz::{Extraction, QuestionExtractor, QuestionPreview, SkippedBlock, MIN_OPTIONS};
